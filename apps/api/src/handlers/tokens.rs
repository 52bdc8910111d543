use axum::Json;
use axum::extract::State;

use crate::dto::{
    GenericMessageResponse, IntrospectTokenRequest, LoginRequest, LogoutRequest,
    RefreshTokenRequest, TokenIntrospectionResponse, TokenResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let tokens = state
        .user_lifecycle_service
        .login(&payload.username, &payload.password)
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(TokenResponse::from(tokens)))
}

pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let tokens = state
        .user_lifecycle_service
        .refresh(&payload.refresh_token)
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(TokenResponse::from(tokens)))
}

pub async fn introspect_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<IntrospectTokenRequest>,
) -> ApiResult<Json<TokenIntrospectionResponse>> {
    let introspection = state
        .user_lifecycle_service
        .introspect(&payload.token)
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(TokenIntrospectionResponse::from(introspection)))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .user_lifecycle_service
        .logout(&payload.refresh_token)
        .await
        .map_err(|error| state.api_error(error))?;

    Ok(Json(GenericMessageResponse {
        message: "logged out".to_owned(),
    }))
}
