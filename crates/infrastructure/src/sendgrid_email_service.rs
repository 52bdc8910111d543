//! SendGrid v3 HTTP API email service.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use accountgate_application::EmailService;
use accountgate_core::{AppError, AppResult};

/// Default SendGrid API base URL.
pub const SENDGRID_API_BASE_URL: &str = "https://api.sendgrid.com";

/// SendGrid service configuration.
#[derive(Clone)]
pub struct SendGridEmailConfig {
    /// API base URL.
    pub api_base_url: Url,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Sender email address.
    pub from_address: String,
    /// Sender display name.
    pub from_name: String,
}

/// Email service that posts to SendGrid's `mail/send` endpoint.
#[derive(Clone)]
pub struct SendGridEmailService {
    http_client: reqwest::Client,
    config: SendGridEmailConfig,
}

#[derive(Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl SendGridEmailService {
    /// Creates a new SendGrid email service.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: SendGridEmailConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl EmailService for SendGridEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        let mut content = vec![Content {
            content_type: "text/plain",
            value: text_body,
        }];
        if let Some(html_body) = html_body {
            content.push(Content {
                content_type: "text/html",
                value: html_body,
            });
        }

        let request = MailSendRequest {
            personalizations: [Personalization {
                to: [Address {
                    email: to,
                    name: None,
                }],
            }],
            from: Address {
                email: self.config.from_address.as_str(),
                name: Some(self.config.from_name.as_str()),
            },
            subject,
            content,
        };

        let url = self
            .config
            .api_base_url
            .join("/v3/mail/send")
            .map_err(|error| AppError::Internal(format!("invalid SendGrid url: {error}")))?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.config.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("SendGrid request failed: {error}")))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(AppError::Upstream(format!(
            "SendGrid rejected email with status {status}: {body}"
        )))
    }
}
