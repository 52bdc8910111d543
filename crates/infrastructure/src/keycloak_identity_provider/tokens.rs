use serde::Deserialize;

use super::*;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    refresh_expires_in: Option<u64>,
    refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    token_type: String,
    scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            refresh_expires_in: response.refresh_expires_in,
            token_type: response.token_type,
            scope: response.scope,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    active: bool,
    sub: Option<String>,
    preferred_username: Option<String>,
    username: Option<String>,
    email: Option<String>,
    exp: Option<i64>,
}

impl KeycloakIdentityProvider {
    async fn post_token_form(
        &self,
        operation: &str,
        tail: &[&str],
        form: &[(&str, &str)],
    ) -> AppResult<Response> {
        let url = self.openid_endpoint(tail)?;
        let mut fields = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        fields.extend_from_slice(form);

        self.http_client
            .post(url)
            .form(&fields)
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))
    }

    async fn token_set(&self, operation: &str, form: &[(&str, &str)]) -> AppResult<TokenSet> {
        let response = self.post_token_form(operation, &["token"], form).await?;
        if !response.status().is_success() {
            return Err(token_rejection(operation, response).await);
        }

        let body = response.json::<TokenResponse>().await.map_err(|error| {
            AppError::Upstream(format!("failed to parse {operation} response: {error}"))
        })?;
        Ok(body.into())
    }

    pub(super) async fn fetch_admin_credential_impl(&self) -> AppResult<AdminCredential> {
        let operation = "admin token";
        let response = self
            .post_token_form(operation, &["token"], &[("grant_type", "client_credentials")])
            .await?;
        if !response.status().is_success() {
            return Err(unexpected_status(operation, response).await);
        }

        let body = response.json::<TokenResponse>().await.map_err(|error| {
            AppError::Upstream(format!("failed to parse admin token response: {error}"))
        })?;
        AdminCredential::new(body.access_token, body.expires_in)
    }

    pub(super) async fn issue_user_token_impl(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<TokenSet> {
        self.token_set(
            "login",
            &[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ],
        )
        .await
    }

    pub(super) async fn refresh_token_impl(&self, refresh_token: &str) -> AppResult<TokenSet> {
        self.token_set(
            "token refresh",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }

    pub(super) async fn introspect_token_impl(&self, token: &str) -> AppResult<TokenIntrospection> {
        let operation = "token introspection";
        let response = self
            .post_token_form(operation, &["token", "introspect"], &[("token", token)])
            .await?;
        if !response.status().is_success() {
            return Err(unexpected_status(operation, response).await);
        }

        let body = response
            .json::<IntrospectionResponse>()
            .await
            .map_err(|error| {
                AppError::Upstream(format!("failed to parse introspection response: {error}"))
            })?;

        if !body.active {
            return Ok(TokenIntrospection::inactive());
        }

        Ok(TokenIntrospection {
            active: true,
            subject: body.sub,
            username: body.preferred_username.or(body.username),
            email: body.email,
            expires_at: body.exp,
        })
    }

    pub(super) async fn logout_impl(&self, refresh_token: &str) -> AppResult<()> {
        let operation = "logout";
        let response = self
            .post_token_form(operation, &["logout"], &[("refresh_token", refresh_token)])
            .await?;
        if response.status().is_success() {
            return Ok(());
        }

        Err(token_rejection(operation, response).await)
    }
}
