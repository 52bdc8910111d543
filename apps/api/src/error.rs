use accountgate_core::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// HTTP API error wrapper around core application errors.
///
/// Detail text of upstream and internal failures is replaced by a generic
/// message unless `expose_details` is set.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub expose_details: bool,
}

impl ApiError {
    #[must_use]
    pub fn with_details(mut self, expose_details: bool) -> Self {
        self.expose_details = expose_details;
        self
    }

    fn status(&self) -> StatusCode {
        status_for(&self.error)
    }

    fn message(&self) -> String {
        match &self.error {
            AppError::Upstream(_) if !self.expose_details => "upstream service failure".to_owned(),
            AppError::Internal(_) if !self.expose_details => "internal server error".to_owned(),
            error => error.detail().to_owned(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self {
            error: value,
            expose_details: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = Json(ErrorResponse {
            code: self.error.code().to_owned(),
            message: self.message(),
        });

        (status, payload).into_response()
    }
}

pub fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use accountgate_core::AppError;
    use axum::http::StatusCode;

    use super::ApiError;

    #[test]
    fn upstream_detail_is_hidden_by_default() {
        let error = ApiError::from(AppError::Upstream("keycloak said 503".to_owned()));
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error.message(), "upstream service failure");
    }

    #[test]
    fn upstream_detail_is_shown_when_exposed() {
        let error =
            ApiError::from(AppError::Upstream("keycloak said 503".to_owned())).with_details(true);
        assert_eq!(error.message(), "keycloak said 503");
    }

    #[test]
    fn validation_detail_is_always_shown() {
        let error = ApiError::from(AppError::Validation("email is required".to_owned()));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "email is required");
    }
}
