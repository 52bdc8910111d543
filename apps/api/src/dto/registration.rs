use accountgate_application::RegistrationOutcome;
use accountgate_core::AppError;
use accountgate_domain::{AccountType, CompanyDetails, PlainPassword, RegistrationRequest};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::users::UserResponse;

/// Company details supplied with a business registration.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-company-request.ts"
)]
pub struct RegisterCompanyRequest {
    #[serde(default)]
    pub company_name: String,
    pub tax_id: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// Incoming payload for identity-first registration.
///
/// Required fields default to empty so that missing values surface as
/// validation errors instead of body rejections.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-user-request.ts"
)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub account_type: Option<String>,
    pub company: Option<RegisterCompanyRequest>,
}

/// Per-side-effect progress of a registration.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/registration-steps-response.ts"
)]
pub struct RegistrationStepsResponse {
    pub identity: String,
    pub local_record: String,
    pub email: String,
}

/// Structured registration result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/registration-response.ts"
)]
pub struct RegistrationResponse {
    /// One of `created`, `conflict`, `identity_provider_failure`,
    /// `local_persist_failure`.
    pub status: String,
    pub message: String,
    pub user: Option<UserResponse>,
    pub provider_id: Option<String>,
    pub email_sent: Option<bool>,
    pub compensation: Option<String>,
    pub requires_manual_cleanup: bool,
    pub retry_safe: bool,
    pub steps: RegistrationStepsResponse,
}

impl TryFrom<RegisterUserRequest> for RegistrationRequest {
    type Error = AppError;

    fn try_from(value: RegisterUserRequest) -> Result<Self, Self::Error> {
        let account_type = match value.account_type {
            Some(account_type) => AccountType::parse(&account_type.trim().to_ascii_uppercase())?,
            None => AccountType::default(),
        };

        Ok(Self {
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            phone_number: value.phone_number,
            country: value.country,
            password: PlainPassword::new(value.password),
            account_type,
            company: value.company.map(|company| CompanyDetails {
                company_name: company.company_name,
                tax_id: company.tax_id,
                phone_number: company.phone_number,
                country: company.country,
                city: company.city,
                zip_code: company.zip_code,
            }),
        })
    }
}

impl RegistrationResponse {
    /// Renders an outcome. Failure detail is replaced by a generic message
    /// unless `expose_details` is set.
    #[must_use]
    pub fn from_outcome(outcome: RegistrationOutcome, expose_details: bool) -> Self {
        let steps = outcome.steps();
        let steps = RegistrationStepsResponse {
            identity: steps.identity.as_str().to_owned(),
            local_record: steps.local_record.as_str().to_owned(),
            email: steps.email.as_str().to_owned(),
        };
        let retry_safe = outcome.is_retry_safe();
        let requires_manual_cleanup = outcome.requires_manual_cleanup();

        let (status, message, user, provider_id, email_sent, compensation) = match outcome {
            RegistrationOutcome::Created {
                user,
                email_sent,
                identity,
            } => (
                "created",
                "user registered".to_owned(),
                Some(UserResponse::from(user)),
                identity.provider_id.map(|id| id.as_str().to_owned()),
                Some(email_sent),
                None,
            ),
            RegistrationOutcome::Conflict { reason } => (
                "conflict",
                reason.message().to_owned(),
                None,
                None,
                None,
                None,
            ),
            RegistrationOutcome::IdentityProviderFailure { detail } => (
                "identity_provider_failure",
                safe_message(detail, "identity provider failure", expose_details),
                None,
                None,
                None,
                None,
            ),
            RegistrationOutcome::LocalPersistFailure {
                detail,
                compensation,
            } => (
                "local_persist_failure",
                safe_message(detail, "failed to persist local user", expose_details),
                None,
                None,
                None,
                Some(compensation.as_str().to_owned()),
            ),
        };

        Self {
            status: status.to_owned(),
            message,
            user,
            provider_id,
            email_sent,
            compensation,
            requires_manual_cleanup,
            retry_safe,
            steps,
        }
    }
}

fn safe_message(detail: String, generic: &str, expose_details: bool) -> String {
    if expose_details {
        detail
    } else {
        generic.to_owned()
    }
}
