use accountgate_core::{AppError, AppResult};
use accountgate_domain::{TokenIntrospection, TokenSet};

use super::UserLifecycleService;

fn required<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

impl UserLifecycleService {
    /// Issues tokens for a username and password.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<TokenSet> {
        let username = required(username, "username")?;
        if password.is_empty() {
            return Err(AppError::Validation("password is required".to_owned()));
        }

        self.identity_provider
            .issue_user_token(username, password)
            .await
    }

    /// Exchanges a refresh token for a new token set.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenSet> {
        let refresh_token = required(refresh_token, "refresh token")?;
        self.identity_provider.refresh_token(refresh_token).await
    }

    /// Introspects an access token.
    pub async fn introspect(&self, token: &str) -> AppResult<TokenIntrospection> {
        let token = required(token, "token")?;
        self.identity_provider.introspect_token(token).await
    }

    /// Ends the session bound to a refresh token.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let refresh_token = required(refresh_token, "refresh token")?;
        self.identity_provider.logout(refresh_token).await
    }
}
