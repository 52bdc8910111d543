//! Local user value types and validation rules.

use std::fmt;

use accountgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Surrogate identifier assigned by the local store on persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalUserId(i64);

impl LocalUserId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for LocalUserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated, canonical (lowercase) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, exactly one `@`,
    /// non-empty local part, and a domain with at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Minimum username length.
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum username length (matches the `users.username` column).
pub const USERNAME_MAX_LENGTH: usize = 50;

/// Validated username shared by the identity provider and the local store.
///
/// The identity provider compares usernames case-insensitively and stores
/// them lowercase, so the canonical form here is lowercase as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let canonical = value.trim().to_lowercase();

        if canonical.is_empty() {
            return Err(AppError::Validation("username must not be empty".to_owned()));
        }

        let length = canonical.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if !canonical
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-'))
        {
            return Err(AppError::Validation(
                "username may only contain letters, digits, '.', '_' and '-'".to_owned(),
            ));
        }

        Ok(Self(canonical))
    }

    /// Returns the canonical username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Kind of account held by a local user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Individual account.
    #[default]
    Personal,
    /// Account owned by a company; usually carries a company record.
    Business,
}

impl AccountType {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Business => "BUSINESS",
        }
    }

    /// Parses a storage string into an account type.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "PERSONAL" => Ok(Self::Personal),
            "BUSINESS" => Ok(Self::Business),
            _ => Err(AppError::Validation(format!(
                "unknown account type '{value}'"
            ))),
        }
    }
}

/// Plaintext password held only for the duration of a request.
///
/// `Debug` is redacted so the value cannot leak through structured logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlainPassword(String);

impl PlainPassword {
    /// Wraps a plaintext password.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the plaintext for hashing or forwarding to the identity provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PlainPassword([REDACTED])")
    }
}

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length (protects the Argon2id hasher from oversized input).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password against the local length rules.
///
/// The identity provider applies its own realm policy on top of this.
pub fn validate_password(password: &PlainPassword) -> AppResult<()> {
    let char_count = password.expose().chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn valid_email_is_canonicalized() {
        let email = EmailAddress::new("  Alice@Example.COM ");
        assert_eq!(
            email.map(|value| value.as_str().to_owned()).ok().as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn email_with_two_at_signs_is_rejected() {
        assert!(EmailAddress::new("a@b@example.com").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
    }

    #[test]
    fn username_is_lowercased() {
        let username = Username::new("Alice_01");
        assert_eq!(
            username.map(|value| value.as_str().to_owned()).ok().as_deref(),
            Some("alice_01")
        );
    }

    #[test]
    fn username_with_spaces_is_rejected() {
        assert!(Username::new("alice smith").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password(&PlainPassword::new("short")).is_err());
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = PlainPassword::new("Secret123");
        assert!(!format!("{password:?}").contains("Secret123"));
    }

    #[test]
    fn account_type_round_trips_storage_string() {
        assert_eq!(
            AccountType::parse(AccountType::Business.as_str()).ok(),
            Some(AccountType::Business)
        );
        assert!(AccountType::parse("ENTERPRISE").is_err());
    }

    proptest! {
        #[test]
        fn usernames_from_allowed_alphabet_are_accepted(value in "[a-z0-9._-]{3,50}") {
            prop_assert!(Username::new(value).is_ok());
        }

        #[test]
        fn emails_never_keep_uppercase(local in "[A-Za-z0-9]{1,20}", domain in "[A-Za-z]{1,20}") {
            let email = EmailAddress::new(format!("{local}@{domain}.com"));
            prop_assert!(email.is_ok());
            if let Ok(email) = email {
                prop_assert_eq!(email.as_str().to_owned(), email.as_str().to_lowercase());
            }
        }
    }
}
