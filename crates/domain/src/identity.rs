//! Identity-provider side representations.

use std::fmt;

use accountgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::registration::ValidatedRegistration;
use crate::user::{EmailAddress, PlainPassword, Username};

/// Identifier assigned to a user by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderUserId(String);

impl ProviderUserId {
    /// Creates a validated provider user id.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "provider user id must not be empty".to_owned(),
            ));
        }
        if trimmed.contains('/') {
            return Err(AppError::Validation(
                "provider user id must not contain '/'".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProviderUserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Credential entry attached to an identity record.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityCredential {
    value: PlainPassword,
    temporary: bool,
}

impl IdentityCredential {
    /// Credential type understood by the identity provider.
    pub const PASSWORD_TYPE: &'static str = "password";

    /// Creates a password credential.
    #[must_use]
    pub fn password(value: PlainPassword, temporary: bool) -> Self {
        Self { value, temporary }
    }

    /// Returns the credential type.
    #[must_use]
    pub fn credential_type(&self) -> &'static str {
        Self::PASSWORD_TYPE
    }

    /// Returns the secret value.
    #[must_use]
    pub fn value(&self) -> &PlainPassword {
        &self.value
    }

    /// Returns whether the user must replace the credential on first login.
    #[must_use]
    pub fn temporary(&self) -> bool {
        self.temporary
    }
}

impl fmt::Debug for IdentityCredential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("IdentityCredential")
            .field("type", &Self::PASSWORD_TYPE)
            .field("value", &self.value)
            .field("temporary", &self.temporary)
            .finish()
    }
}

/// User representation submitted to the identity provider on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    username: Username,
    email: EmailAddress,
    first_name: Option<String>,
    last_name: Option<String>,
    enabled: bool,
    email_verified: bool,
    credentials: Vec<IdentityCredential>,
}

impl IdentityRecord {
    /// Builds the provider-side record for a validated registration.
    ///
    /// The identity is enabled immediately with an unverified email and a
    /// single password credential.
    #[must_use]
    pub fn from_registration(registration: &ValidatedRegistration, temporary_password: bool) -> Self {
        Self {
            username: registration.username().clone(),
            email: registration.email().clone(),
            first_name: registration.first_name().map(ToOwned::to_owned),
            last_name: registration.last_name().map(ToOwned::to_owned),
            enabled: true,
            email_verified: false,
            credentials: vec![IdentityCredential::password(
                registration.password().clone(),
                temporary_password,
            )],
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns whether the identity is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether the email is marked verified.
    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Returns the credential entries.
    #[must_use]
    pub fn credentials(&self) -> &[IdentityCredential] {
        &self.credentials
    }
}

/// Short-lived administrative bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    access_token: String,
    expires_in: u64,
}

impl AdminCredential {
    /// Creates an admin credential from a token endpoint response.
    pub fn new(access_token: impl Into<String>, expires_in: u64) -> AppResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(AppError::Upstream(
                "identity provider returned an empty admin token".to_owned(),
            ));
        }

        Ok(Self {
            access_token,
            expires_in,
        })
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the token lifetime in seconds.
    #[must_use]
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AdminCredential")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Token set issued to an end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token, when the grant issues one.
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_expires_in: Option<u64>,
    /// Token type, normally `Bearer`.
    pub token_type: String,
    /// Granted scopes.
    pub scope: Option<String>,
}

/// Result of introspecting a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIntrospection {
    /// Whether the token is currently valid.
    pub active: bool,
    /// Provider user id of the token subject.
    pub subject: Option<String>,
    /// Preferred username claim.
    pub username: Option<String>,
    /// Email claim.
    pub email: Option<String>,
    /// Expiry as a unix timestamp.
    pub expires_at: Option<i64>,
}

impl TokenIntrospection {
    /// Introspection result for a token the provider does not accept.
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            active: false,
            subject: None,
            username: None,
            email: None,
            expires_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationRequest;
    use crate::user::AccountType;

    fn registration() -> AppResult<ValidatedRegistration> {
        RegistrationRequest {
            username: "Alice".to_owned(),
            email: "alice@x.com".to_owned(),
            first_name: Some("Alice".to_owned()),
            last_name: Some("Doe".to_owned()),
            phone_number: None,
            country: None,
            password: PlainPassword::new("Secret123"),
            account_type: AccountType::Personal,
            company: None,
        }
        .validate()
    }

    #[test]
    fn identity_record_is_enabled_and_unverified() -> AppResult<()> {
        let record = IdentityRecord::from_registration(&registration()?, true);

        assert!(record.enabled());
        assert!(!record.email_verified());
        assert_eq!(record.username().as_str(), "alice");
        assert_eq!(record.credentials().len(), 1);
        assert_eq!(record.credentials()[0].credential_type(), "password");
        assert!(record.credentials()[0].temporary());
        Ok(())
    }

    #[test]
    fn identity_record_debug_hides_password() -> AppResult<()> {
        let record = IdentityRecord::from_registration(&registration()?, false);

        assert!(!format!("{record:?}").contains("Secret123"));
        Ok(())
    }

    #[test]
    fn admin_credential_debug_hides_token() -> AppResult<()> {
        let credential = AdminCredential::new("eyJhbGciOi.secret", 60)?;

        assert!(!format!("{credential:?}").contains("secret"));
        Ok(())
    }

    #[test]
    fn provider_user_id_rejects_path_segments() {
        assert!(ProviderUserId::new("abc/../def").is_err());
        assert!(ProviderUserId::new("  ").is_err());
    }
}
