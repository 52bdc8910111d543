//! PostgreSQL-backed local user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use accountgate_application::{
    CompanyRecord, LocalUserRecord, NewLocalUser, UserStore, UserUpdate,
};
use accountgate_core::{AppError, AppResult};
use accountgate_domain::{AccountType, EmailAddress, LocalUserId};

/// PostgreSQL implementation of the user store port.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_SELECT: &str = r#"
    SELECT u.id, u.account_type, u.first_name, u.last_name, u.username, u.email,
           u.phone_number, u.country, u.disabled, u.password_hash, u.created_at, u.updated_at,
           c.id AS company_id, c.company_name, c.tax_id,
           c.phone_number AS company_phone_number, c.country AS company_country,
           c.city AS company_city, c.zip_code AS company_zip_code
    FROM users u
    LEFT JOIN companies c ON c.id = u.company_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    account_type: String,
    first_name: Option<String>,
    last_name: Option<String>,
    username: String,
    email: String,
    phone_number: Option<String>,
    country: Option<String>,
    disabled: bool,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    company_id: Option<i64>,
    company_name: Option<String>,
    tax_id: Option<String>,
    company_phone_number: Option<String>,
    company_country: Option<String>,
    company_city: Option<String>,
    company_zip_code: Option<String>,
}

impl TryFrom<UserRow> for LocalUserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        let company = match (row.company_id, row.company_name) {
            (Some(id), Some(company_name)) => Some(CompanyRecord {
                id,
                company_name,
                tax_id: row.tax_id,
                phone_number: row.company_phone_number,
                country: row.company_country,
                city: row.company_city,
                zip_code: row.company_zip_code,
            }),
            _ => None,
        };

        Ok(Self {
            id: LocalUserId::new(row.id),
            account_type: AccountType::parse(&row.account_type).map_err(|error| {
                AppError::Internal(format!("invalid stored account type for user {}: {error}", row.id))
            })?,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            email: row.email,
            phone_number: row.phone_number,
            country: row.country,
            disabled: row.disabled,
            password_hash: row.password_hash,
            company,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

mod account;
mod lookup;

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<LocalUserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: LocalUserId) -> AppResult<Option<LocalUserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create_user_and_company(&self, user: NewLocalUser) -> AppResult<LocalUserRecord> {
        self.create_user_and_company_impl(user).await
    }

    async fn update_user(
        &self,
        user_id: LocalUserId,
        update: UserUpdate,
    ) -> AppResult<LocalUserRecord> {
        self.update_user_impl(user_id, update).await
    }

    async fn delete_by_id(&self, user_id: LocalUserId) -> AppResult<bool> {
        self.delete_by_id_impl(user_id).await
    }
}

fn unique_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        let field = match database_error.constraint() {
            Some("users_username_unique") => "username",
            Some("users_email_lower_unique") => "email",
            _ => "email or username",
        };
        return AppError::Conflict(format!("an account with this {field} already exists"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
