//! Identity provider port.

use async_trait::async_trait;

use accountgate_core::AppResult;
use accountgate_domain::{
    AdminCredential, IdentityRecord, ProviderUserId, TokenIntrospection, TokenSet, Username,
};

/// Result of submitting a new identity to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCreation {
    /// The provider created the identity.
    Created {
        /// Provider id when the response exposed it.
        provider_id: Option<ProviderUserId>,
    },
    /// An identity with the same username or email already exists.
    Conflict,
}

/// Result of deleting an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityDeletion {
    /// The identity was removed.
    Deleted,
    /// No identity with that id exists.
    NotFound,
}

/// Port over the external identity provider.
///
/// Unexpected statuses, transport errors and timeouts surface as
/// `AppError::Upstream`. Expected answers (conflict, not found) are values.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Obtains a fresh administrative credential.
    async fn fetch_admin_credential(&self) -> AppResult<AdminCredential>;

    /// Creates an identity.
    async fn create_identity(
        &self,
        credential: &AdminCredential,
        record: &IdentityRecord,
    ) -> AppResult<IdentityCreation>;

    /// Deletes an identity by provider id.
    async fn delete_identity(
        &self,
        credential: &AdminCredential,
        provider_id: &ProviderUserId,
    ) -> AppResult<IdentityDeletion>;

    /// Resolves the provider id for an exact username match.
    async fn find_identity_by_username(
        &self,
        credential: &AdminCredential,
        username: &Username,
    ) -> AppResult<Option<ProviderUserId>>;

    /// Issues end-user tokens with the password grant.
    async fn issue_user_token(&self, username: &str, password: &str) -> AppResult<TokenSet>;

    /// Exchanges a refresh token for a new token set.
    async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenSet>;

    /// Introspects an access token.
    async fn introspect_token(&self, token: &str) -> AppResult<TokenIntrospection>;

    /// Ends the session bound to a refresh token.
    async fn logout(&self, refresh_token: &str) -> AppResult<()>;
}
