use accountgate_application::OutgoingEmail;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a direct email send.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/send-email-request.ts"
)]
pub struct SendEmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Query of the welcome email endpoint.
#[derive(Debug, Deserialize)]
pub struct WelcomeEmailQuery {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Query of the transport check endpoint.
#[derive(Debug, Deserialize)]
pub struct TestEmailQuery {
    pub to: Option<String>,
}

/// Email transport status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/email-status-response.ts"
)]
pub struct EmailStatusResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub endpoints: Vec<&'static str>,
}

impl From<SendEmailRequest> for OutgoingEmail {
    fn from(value: SendEmailRequest) -> Self {
        Self {
            to: value.to,
            subject: value.subject,
            text_body: value.text_body,
            html_body: value.html_body,
        }
    }
}
