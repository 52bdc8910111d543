use accountgate_application::UserUpdateRequest;
use accountgate_core::CallerIdentity;
use accountgate_domain::{LocalUserId, ProviderUserId};
use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tracing::info;

use crate::dto::{AdminTokenResponse, UpdateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_lifecycle_service
        .get_by_id(LocalUserId::new(user_id))
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let request = UserUpdateRequest::try_from(payload).map_err(|error| state.api_error(error))?;

    let user = state
        .user_lifecycle_service
        .update_by_id(LocalUserId::new(user_id), request)
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_identity_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Path(provider_id): Path<String>,
) -> ApiResult<StatusCode> {
    let provider_id = ProviderUserId::new(provider_id).map_err(|error| state.api_error(error))?;

    state
        .user_lifecycle_service
        .delete_identity_by_id(&provider_id)
        .await
        .map_err(|error| state.api_error(error))?;

    info!(caller = %caller.subject(), provider_id = %provider_id, "identity deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_own_identity_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> ApiResult<StatusCode> {
    state
        .user_lifecycle_service
        .delete_own_identity(&caller)
        .await
        .map_err(|error| state.api_error(error))?;

    info!(caller = %caller.subject(), "own account deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_token_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> ApiResult<Json<AdminTokenResponse>> {
    state.ensure_exposed(state.expose_admin_token_endpoint, "admin token endpoint")?;

    info!(caller = %caller.subject(), "admin token issued");
    let credential = state
        .user_lifecycle_service
        .admin_token()
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(AdminTokenResponse::from(credential)))
}
