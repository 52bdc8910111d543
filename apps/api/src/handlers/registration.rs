use accountgate_application::RegistrationOutcome;
use accountgate_domain::RegistrationRequest;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{RegisterUserRequest, RegistrationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_identity_first_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<RegistrationResponse>)> {
    let request = RegistrationRequest::try_from(payload).map_err(|error| state.api_error(error))?;

    let outcome = state
        .registration_service
        .register_identity_first(request)
        .await
        .map_err(|error| state.api_error(error))?;

    let status = outcome_status(&outcome);
    Ok((
        status,
        Json(RegistrationResponse::from_outcome(
            outcome,
            state.expose_error_details,
        )),
    ))
}

fn outcome_status(outcome: &RegistrationOutcome) -> StatusCode {
    match outcome {
        RegistrationOutcome::Created { .. } => StatusCode::CREATED,
        RegistrationOutcome::Conflict { .. } => StatusCode::CONFLICT,
        RegistrationOutcome::IdentityProviderFailure { .. } => StatusCode::BAD_GATEWAY,
        RegistrationOutcome::LocalPersistFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
