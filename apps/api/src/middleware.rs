use accountgate_core::{AppError, CallerIdentity};
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the bearer token into a [`CallerIdentity`] request extension.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(&request)
        .ok_or_else(|| state.api_error(AppError::Unauthorized("bearer token required".to_owned())))?
        .to_owned();

    let introspection = state
        .user_lifecycle_service
        .introspect(&token)
        .await
        .map_err(|error| state.api_error(error))?;

    let subject = match introspection.subject {
        Some(subject) if introspection.active => subject,
        _ => {
            return Err(state.api_error(AppError::Unauthorized(
                "token is not active".to_owned(),
            )));
        }
    };

    request.extensions_mut().insert(CallerIdentity::new(
        subject,
        introspection.username,
        introspection.email,
    ));
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
