use accountgate_application::OutgoingEmail;
use accountgate_core::{AppError, CallerIdentity};
use accountgate_domain::EmailAddress;
use axum::Json;
use axum::extract::{Extension, Query, State};
use tracing::info;

use crate::dto::{
    EmailStatusResponse, GenericMessageResponse, SendEmailRequest, TestEmailQuery,
    WelcomeEmailQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

const SEND_ENDPOINTS: [&str; 3] = ["POST /email/send", "POST /email/welcome", "POST /email/test"];

pub async fn send_email_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<SendEmailRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state.ensure_exposed(state.expose_email_endpoints, "email endpoint")?;

    let recipient = state
        .notification_service
        .send_message(OutgoingEmail::from(payload))
        .await
        .map_err(|error| state.api_error(error))?;

    info!(caller = %caller.subject(), recipient = %recipient, "email sent");
    Ok(Json(GenericMessageResponse {
        message: format!("email sent to {recipient}"),
    }))
}

pub async fn welcome_email_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(query): Query<WelcomeEmailQuery>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state.ensure_exposed(state.expose_email_endpoints, "email endpoint")?;

    let recipient =
        required_recipient(query.email, "email").map_err(|error| state.api_error(error))?;
    state
        .notification_service
        .send_welcome(&recipient, query.name.as_deref())
        .await
        .map_err(|error| state.api_error(error))?;

    info!(caller = %caller.subject(), recipient = %recipient, "welcome email sent");
    Ok(Json(GenericMessageResponse {
        message: format!("welcome email sent to {recipient}"),
    }))
}

pub async fn test_email_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(query): Query<TestEmailQuery>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state.ensure_exposed(state.expose_email_endpoints, "email endpoint")?;

    let recipient = required_recipient(query.to, "to").map_err(|error| state.api_error(error))?;
    state
        .notification_service
        .send_test(&recipient)
        .await
        .map_err(|error| state.api_error(error))?;

    info!(
        caller = %caller.subject(),
        recipient = %recipient,
        provider = state.email_provider,
        "test email sent"
    );
    Ok(Json(GenericMessageResponse {
        message: format!("test email sent to {recipient} via {}", state.email_provider),
    }))
}

pub async fn email_status_handler(State(state): State<AppState>) -> Json<EmailStatusResponse> {
    let mut endpoints = vec!["GET /email/status"];
    if state.expose_email_endpoints {
        endpoints.extend(SEND_ENDPOINTS);
    }

    Json(EmailStatusResponse {
        status: "running",
        provider: state.email_provider,
        endpoints,
    })
}

fn required_recipient(value: Option<String>, parameter: &str) -> Result<EmailAddress, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => EmailAddress::new(value),
        _ => Err(AppError::Validation(format!(
            "query parameter '{parameter}' is required"
        ))),
    }
}
