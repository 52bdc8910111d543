//! Console email service for development. Logs emails to tracing output.

use async_trait::async_trait;
use tracing::info;

use accountgate_application::EmailService;
use accountgate_core::AppResult;

/// Development email service that logs emails instead of sending them.
#[derive(Clone, Default)]
pub struct ConsoleEmailService;

impl ConsoleEmailService {
    /// Creates a new console email service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
    ) -> AppResult<()> {
        info!(
            to,
            subject,
            has_html = html_body.is_some(),
            "--- EMAIL (console) ---\n{text_body}\n--- END EMAIL ---"
        );

        Ok(())
    }
}
