use accountgate_domain::{AdminCredential, TokenIntrospection, TokenSet};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for username/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Incoming payload for a refresh-token exchange.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/refresh-token-request.ts"
)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Incoming payload for token introspection.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/introspect-token-request.ts"
)]
pub struct IntrospectTokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Incoming payload for logout.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/logout-request.ts"
)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Tokens issued to an end user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/token-response.ts"
)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub refresh_expires_in: Option<u64>,
    pub token_type: String,
    pub scope: Option<String>,
}

/// Token introspection result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/token-introspection-response.ts"
)]
pub struct TokenIntrospectionResponse {
    pub active: bool,
    pub subject: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub expires_at: Option<i64>,
}

/// Administrative access token for diagnostics.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/admin-token-response.ts"
)]
pub struct AdminTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

impl From<TokenSet> for TokenResponse {
    fn from(value: TokenSet) -> Self {
        Self {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            expires_in: value.expires_in,
            refresh_expires_in: value.refresh_expires_in,
            token_type: value.token_type,
            scope: value.scope,
        }
    }
}

impl From<TokenIntrospection> for TokenIntrospectionResponse {
    fn from(value: TokenIntrospection) -> Self {
        Self {
            active: value.active,
            subject: value.subject,
            username: value.username,
            email: value.email,
            expires_at: value.expires_at,
        }
    }
}

impl From<AdminCredential> for AdminTokenResponse {
    fn from(value: AdminCredential) -> Self {
        Self {
            access_token: value.access_token().to_owned(),
            expires_in: value.expires_in(),
        }
    }
}
