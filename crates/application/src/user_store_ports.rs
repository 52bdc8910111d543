//! Local user store and password hashing ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use accountgate_core::AppResult;
use accountgate_domain::{AccountType, EmailAddress, LocalUserId, Username};

/// Company row owned by a local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    /// Surrogate company id.
    pub id: i64,
    /// Registered company name.
    pub company_name: String,
    /// Tax identification number.
    pub tax_id: Option<String>,
    /// Company phone number.
    pub phone_number: Option<String>,
    /// Company country.
    pub country: Option<String>,
    /// Company city.
    pub city: Option<String>,
    /// Company postal code.
    pub zip_code: Option<String>,
}

/// Durable local user representation.
///
/// Carries the password hash only; plaintext never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUserRecord {
    /// Store-assigned id.
    pub id: LocalUserId,
    /// Account kind.
    pub account_type: AccountType,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Username shared with the identity provider.
    pub username: String,
    /// Canonical email.
    pub email: String,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// Whether the account is disabled locally.
    pub disabled: bool,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Owned company, if any.
    pub company: Option<CompanyRecord>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Company values for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    /// Registered company name.
    pub company_name: String,
    /// Tax identification number.
    pub tax_id: Option<String>,
    /// Company phone number.
    pub phone_number: Option<String>,
    /// Company country.
    pub country: Option<String>,
    /// Company city.
    pub city: Option<String>,
    /// Company postal code.
    pub zip_code: Option<String>,
}

/// User values for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocalUser {
    /// Account kind.
    pub account_type: AccountType,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Username shared with the identity provider.
    pub username: Username,
    /// Canonical email.
    pub email: EmailAddress,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Company to insert in the same transaction.
    pub company: Option<NewCompany>,
}

/// Field-level company patch. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyUpdate {
    /// New company name.
    pub company_name: Option<String>,
    /// New tax id.
    pub tax_id: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New postal code.
    pub zip_code: Option<String>,
}

impl CompanyUpdate {
    /// Returns whether the patch touches no column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Field-level user patch. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// New account kind.
    pub account_type: Option<AccountType>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<EmailAddress>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New disabled flag.
    pub disabled: Option<bool>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// Patch for the owned company; ignored when the user owns none.
    pub company: Option<CompanyUpdate>,
}

/// Repository port for local users and their companies.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by canonical email.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<LocalUserRecord>>;

    /// Finds a user by id.
    async fn find_by_id(&self, user_id: LocalUserId) -> AppResult<Option<LocalUserRecord>>;

    /// Inserts the user and optional company in one transaction.
    ///
    /// A uniqueness violation returns `AppError::Conflict`.
    async fn create_user_and_company(&self, user: NewLocalUser) -> AppResult<LocalUserRecord>;

    /// Applies a patch to the user and owned company in one transaction.
    async fn update_user(
        &self,
        user_id: LocalUserId,
        update: UserUpdate,
    ) -> AppResult<LocalUserRecord>;

    /// Deletes the user and owned company. Returns whether a row was removed.
    async fn delete_by_id(&self, user_id: LocalUserId) -> AppResult<bool>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
