use accountgate_application::{NotificationService, RegistrationService, UserLifecycleService};
use accountgate_core::AppError;

use crate::error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registration_service: RegistrationService,
    pub user_lifecycle_service: UserLifecycleService,
    pub notification_service: NotificationService,
    pub email_provider: &'static str,
    pub expose_error_details: bool,
    pub expose_admin_token_endpoint: bool,
    pub expose_email_endpoints: bool,
}

impl AppState {
    /// Wraps an application error with the configured detail policy.
    pub fn api_error(&self, error: AppError) -> ApiError {
        ApiError::from(error).with_details(self.expose_error_details)
    }

    /// Answers 404 for an operator endpoint that is switched off.
    pub fn ensure_exposed(&self, exposed: bool, endpoint: &str) -> ApiResult<()> {
        if exposed {
            return Ok(());
        }

        Err(self.api_error(AppError::NotFound(format!("{endpoint} is not available"))))
    }
}
