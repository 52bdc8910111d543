use accountgate_application::{CompanyRecord, CompanyUpdate, LocalUserRecord, UserUpdateRequest};
use accountgate_core::AppError;
use accountgate_domain::{AccountType, PlainPassword};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a company owned by a business account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/company-response.ts"
)]
pub struct CompanyResponse {
    pub id: i64,
    pub company_name: String,
    pub tax_id: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// API representation of a local user record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: i64,
    pub account_type: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub disabled: bool,
    pub company: Option<CompanyResponse>,
    /// RFC 3339 timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp.
    pub updated_at: String,
}

/// Company fields of a user update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-company-request.ts"
)]
pub struct UpdateCompanyRequest {
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// Incoming payload for a local user update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    pub account_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub disabled: Option<bool>,
    pub password: Option<String>,
    pub company: Option<UpdateCompanyRequest>,
}

impl From<CompanyRecord> for CompanyResponse {
    fn from(value: CompanyRecord) -> Self {
        Self {
            id: value.id,
            company_name: value.company_name,
            tax_id: value.tax_id,
            phone_number: value.phone_number,
            country: value.country,
            city: value.city,
            zip_code: value.zip_code,
        }
    }
}

impl From<LocalUserRecord> for UserResponse {
    fn from(value: LocalUserRecord) -> Self {
        Self {
            id: value.id.as_i64(),
            account_type: value.account_type.as_str().to_owned(),
            first_name: value.first_name,
            last_name: value.last_name,
            username: value.username,
            email: value.email,
            phone_number: value.phone_number,
            country: value.country,
            disabled: value.disabled,
            company: value.company.map(CompanyResponse::from),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<UpdateUserRequest> for UserUpdateRequest {
    type Error = AppError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            account_type: value
                .account_type
                .map(|value| AccountType::parse(&value.trim().to_ascii_uppercase()))
                .transpose()?,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone_number: value.phone_number,
            country: value.country,
            disabled: value.disabled,
            password: value.password.map(PlainPassword::new),
            company: value.company.map(|company| CompanyUpdate {
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
