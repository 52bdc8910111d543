//! Keycloak adapter for the identity provider port.
//!
//! Talks to the OpenID Connect token endpoints of one realm and to the admin
//! REST API for user management. Expected answers (201, 409, 404) become
//! values; any other status, a transport error or a timeout becomes
//! `AppError::Upstream`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

use accountgate_application::{IdentityCreation, IdentityDeletion, IdentityProvider};
use accountgate_core::{AppError, AppResult};
use accountgate_domain::{
    AdminCredential, IdentityRecord, ProviderUserId, TokenIntrospection, TokenSet, Username,
};

mod tokens;
mod users;

/// Keycloak connection settings.
#[derive(Clone)]
pub struct KeycloakConfig {
    /// Server base URL, e.g. `https://sso.example.com`.
    pub base_url: Url,
    /// Realm holding the managed users.
    pub realm: String,
    /// Confidential client id.
    pub client_id: String,
    /// Confidential client secret.
    pub client_secret: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for KeycloakConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("KeycloakConfig")
            .field("base_url", &self.base_url.as_str())
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Identity provider backed by a Keycloak realm.
#[derive(Clone)]
pub struct KeycloakIdentityProvider {
    http_client: reqwest::Client,
    config: KeycloakConfig,
}

impl KeycloakIdentityProvider {
    /// Creates an adapter with its own HTTP client bounded by the configured timeout.
    pub fn new(config: KeycloakConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build identity provider client: {error}"))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "identity provider base url '{}' cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn openid_endpoint(&self, tail: &[&str]) -> AppResult<Url> {
        let mut segments = vec!["realms", self.config.realm.as_str(), "protocol", "openid-connect"];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    fn admin_users_endpoint(&self, tail: &[&str]) -> AppResult<Url> {
        let mut segments = vec!["admin", "realms", self.config.realm.as_str(), "users"];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    error_description: Option<String>,
}

fn transport_error(operation: &str, error: &reqwest::Error) -> AppError {
    if error.is_timeout() {
        return AppError::Upstream(format!("identity provider {operation} timed out"));
    }
    AppError::Upstream(format!("identity provider {operation} request failed: {error}"))
}

async fn unexpected_status(operation: &str, response: Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
    let body: String = body.chars().take(512).collect();

    AppError::Upstream(format!(
        "identity provider {operation} failed with status {status}: {body}"
    ))
}

/// Maps a rejected token request to `Unauthorized` when Keycloak reports a
/// bad grant, otherwise to `Upstream`.
async fn token_rejection(operation: &str, response: Response) -> AppError {
    let status = response.status();
    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
        let body = response.text().await.unwrap_or_default();
        if let Ok(error_body) = serde_json::from_str::<OAuthErrorBody>(&body)
            && error_body.error == "invalid_grant"
        {
            return AppError::Unauthorized(
                error_body
                    .error_description
                    .unwrap_or_else(|| "invalid credentials".to_owned()),
            );
        }
        return AppError::Upstream(format!(
            "identity provider {operation} failed with status {status}"
        ));
    }

    unexpected_status(operation, response).await
}

#[async_trait]
impl IdentityProvider for KeycloakIdentityProvider {
    async fn fetch_admin_credential(&self) -> AppResult<AdminCredential> {
        self.fetch_admin_credential_impl().await
    }

    async fn create_identity(
        &self,
        credential: &AdminCredential,
        record: &IdentityRecord,
    ) -> AppResult<IdentityCreation> {
        self.create_identity_impl(credential, record).await
    }

    async fn delete_identity(
        &self,
        credential: &AdminCredential,
        provider_id: &ProviderUserId,
    ) -> AppResult<IdentityDeletion> {
        self.delete_identity_impl(credential, provider_id).await
    }

    async fn find_identity_by_username(
        &self,
        credential: &AdminCredential,
        username: &Username,
    ) -> AppResult<Option<ProviderUserId>> {
        self.find_identity_by_username_impl(credential, username)
            .await
    }

    async fn issue_user_token(&self, username: &str, password: &str) -> AppResult<TokenSet> {
        self.issue_user_token_impl(username, password).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenSet> {
        self.refresh_token_impl(refresh_token).await
    }

    async fn introspect_token(&self, token: &str) -> AppResult<TokenIntrospection> {
        self.introspect_token_impl(token).await
    }

    async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        self.logout_impl(refresh_token).await
    }
}

#[cfg(test)]
mod tests;
