//! Transactional email port and message rendering.

use std::sync::Arc;

use async_trait::async_trait;

use accountgate_core::{AppError, AppResult};
use accountgate_domain::EmailAddress;

/// Port for sending emails. Infrastructure provides console, SMTP and
/// SendGrid implementations.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends a plain-text or HTML email.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()>;
}

/// Subject line of the welcome email.
pub const WELCOME_SUBJECT: &str = "Welcome to MOBA Authorization!";

/// Subject line of the transport check email.
pub const TEST_SUBJECT: &str = "MOBA Authorization - Email Test";

/// Caller-composed message for a direct send.
#[derive(Debug, Clone, Default)]
pub struct OutgoingEmail {
    /// Recipient address; validated before sending.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body. Required by every transport.
    pub text_body: String,
    /// Optional HTML alternative.
    pub html_body: Option<String>,
}

/// Renders account notifications and hands them to the email transport.
#[derive(Clone)]
pub struct NotificationService {
    email_service: Arc<dyn EmailService>,
}

impl NotificationService {
    /// Creates a new notification service.
    #[must_use]
    pub fn new(email_service: Arc<dyn EmailService>) -> Self {
        Self { email_service }
    }

    /// Sends the welcome message to a newly registered user.
    pub async fn send_welcome(
        &self,
        recipient: &EmailAddress,
        first_name: Option<&str>,
    ) -> AppResult<()> {
        let name = first_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("there");

        let text_body = format!(
            "Hello {name},\n\n\
             Welcome to MOBA Authorization system. Your account has been created successfully."
        );
        let html_body = format!(
            "<h1>Welcome to MOBA Authorization!</h1>\
             <p>Hello {},</p>\
             <p>Your account has been created successfully.</p>",
            escape_html(name)
        );

        self.email_service
            .send_email(
                recipient.as_str(),
                WELCOME_SUBJECT,
                &text_body,
                Some(&html_body),
            )
            .await
    }

    /// Validates and sends a caller-composed message. Returns the canonical
    /// recipient.
    pub async fn send_message(&self, message: OutgoingEmail) -> AppResult<EmailAddress> {
        let recipient = EmailAddress::new(message.to)?;
        let subject = message.subject.trim();
        if subject.is_empty() {
            return Err(AppError::Validation(
                "email subject must not be empty".to_owned(),
            ));
        }
        if message.text_body.trim().is_empty() {
            return Err(AppError::Validation(
                "email text body must not be empty".to_owned(),
            ));
        }
        let html_body = message
            .html_body
            .as_deref()
            .filter(|html| !html.trim().is_empty());

        self.email_service
            .send_email(recipient.as_str(), subject, &message.text_body, html_body)
            .await?;

        Ok(recipient)
    }

    /// Sends a fixed message that confirms the transport delivers mail.
    pub async fn send_test(&self, recipient: &EmailAddress) -> AppResult<()> {
        self.email_service
            .send_email(
                recipient.as_str(),
                TEST_SUBJECT,
                "This is a test email from MOBA Authorization system.",
                Some(
                    "<h2>Email Test</h2>\
                     <p>This is a test email from MOBA Authorization system.</p>\
                     <p>If you received this email, your email configuration is working correctly.</p>",
                ),
            )
            .await
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

#[cfg(test)]
mod tests;
