use std::time::Duration;

use accountgate_application::{IdentityCreation, IdentityDeletion, IdentityProvider};
use accountgate_core::{AppError, AppResult};
use accountgate_domain::{
    AccountType, AdminCredential, IdentityRecord, PlainPassword, ProviderUserId,
    RegistrationRequest, Username,
};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{KeycloakConfig, KeycloakIdentityProvider};

fn provider(server: &MockServer) -> AppResult<KeycloakIdentityProvider> {
    let base_url = Url::parse(&server.uri())
        .map_err(|error| AppError::Internal(format!("invalid mock server url: {error}")))?;
    KeycloakIdentityProvider::new(KeycloakConfig {
        base_url,
        realm: "moba".to_owned(),
        client_id: "gateway".to_owned(),
        client_secret: "client-secret".to_owned(),
        timeout: Duration::from_millis(500),
    })
}

fn admin() -> AppResult<AdminCredential> {
    AdminCredential::new("admin-token", 60)
}

fn record() -> AppResult<IdentityRecord> {
    let registration = RegistrationRequest {
        username: "alice".to_owned(),
        email: "alice@x.com".to_owned(),
        first_name: Some("Alice".to_owned()),
        last_name: None,
        phone_number: None,
        country: None,
        password: PlainPassword::new("Secret123"),
        account_type: AccountType::Personal,
        company: None,
    }
    .validate()?;
    Ok(IdentityRecord::from_registration(&registration, true))
}

#[tokio::test]
async fn admin_credential_uses_client_credentials_grant() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=gateway"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "admin-jwt",
            "expires_in": 60,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = provider(&server)?.fetch_admin_credential().await?;

    assert_eq!(credential.access_token(), "admin-jwt");
    assert_eq!(credential.expires_in(), 60);
    Ok(())
}

#[tokio::test]
async fn admin_credential_rejection_is_upstream_failure() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized_client"
        })))
        .mount(&server)
        .await;

    let result = provider(&server)?.fetch_admin_credential().await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    Ok(())
}

#[tokio::test]
async fn create_identity_returns_id_from_location() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/moba/users"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_partial_json(json!({
            "username": "alice",
            "email": "alice@x.com",
            "enabled": true,
            "emailVerified": false,
            "credentials": [{"type": "password", "value": "Secret123", "temporary": true}]
        })))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            format!("{}/admin/realms/moba/users/0f6c-11aa", server.uri()).as_str(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let creation = provider(&server)?
        .create_identity(&admin()?, &record()?)
        .await?;

    assert_eq!(
        creation,
        IdentityCreation::Created {
            provider_id: Some(ProviderUserId::new("0f6c-11aa")?)
        }
    );
    Ok(())
}

#[tokio::test]
async fn create_identity_conflict_is_a_value() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/moba/users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "errorMessage": "User exists with same username"
        })))
        .mount(&server)
        .await;

    let creation = provider(&server)?
        .create_identity(&admin()?, &record()?)
        .await?;

    assert_eq!(creation, IdentityCreation::Conflict);
    Ok(())
}

#[tokio::test]
async fn create_identity_server_error_is_upstream() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/moba/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = provider(&server)?
        .create_identity(&admin()?, &record()?)
        .await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    Ok(())
}

#[tokio::test]
async fn slow_provider_times_out_as_upstream() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/moba/users"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = provider(&server)?
        .create_identity(&admin()?, &record()?)
        .await;

    assert!(
        matches!(result, Err(AppError::Upstream(ref message)) if message.contains("timed out"))
    );
    Ok(())
}

#[tokio::test]
async fn find_identity_by_username_requests_exact_match() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/moba/users"))
        .and(query_param("username", "alice"))
        .and(query_param("exact", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "kc-1", "username": "alice"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let found = provider(&server)?
        .find_identity_by_username(&admin()?, &Username::new("alice")?)
        .await?;

    assert_eq!(found, Some(ProviderUserId::new("kc-1")?));
    Ok(())
}

#[tokio::test]
async fn find_identity_by_username_returns_none_for_empty_list() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/moba/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let found = provider(&server)?
        .find_identity_by_username(&admin()?, &Username::new("ghost")?)
        .await?;

    assert_eq!(found, None);
    Ok(())
}

#[tokio::test]
async fn delete_identity_maps_404_to_not_found() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/realms/moba/users/kc-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/realms/moba/users/kc-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let keycloak = provider(&server)?;
    let deleted = keycloak
        .delete_identity(&admin()?, &ProviderUserId::new("kc-1")?)
        .await?;
    let missing = keycloak
        .delete_identity(&admin()?, &ProviderUserId::new("kc-404")?)
        .await?;

    assert_eq!(deleted, IdentityDeletion::Deleted);
    assert_eq!(missing, IdentityDeletion::NotFound);
    Ok(())
}

#[tokio::test]
async fn login_with_bad_password_is_unauthorized() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid user credentials"
        })))
        .mount(&server)
        .await;

    let result = provider(&server)?
        .issue_user_token("alice", "wrong")
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    Ok(())
}

#[tokio::test]
async fn login_returns_token_set() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/token"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 300,
            "refresh_expires_in": 1800,
            "token_type": "Bearer",
            "not-before-policy": 0,
            "scope": "openid email profile"
        })))
        .mount(&server)
        .await;

    let tokens = provider(&server)?
        .issue_user_token("alice", "Secret123")
        .await?;

    assert_eq!(tokens.access_token, "access");
    assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(tokens.refresh_expires_in, Some(1800));
    Ok(())
}

#[tokio::test]
async fn introspection_maps_claims() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/token/introspect"))
        .and(body_string_contains("token=access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "active": true,
            "sub": "kc-1",
            "preferred_username": "alice",
            "email": "alice@x.com",
            "exp": 1_900_000_000
        })))
        .mount(&server)
        .await;

    let introspection = provider(&server)?.introspect_token("access").await?;

    assert!(introspection.active);
    assert_eq!(introspection.subject.as_deref(), Some("kc-1"));
    assert_eq!(introspection.username.as_deref(), Some("alice"));
    assert_eq!(introspection.expires_at, Some(1_900_000_000));
    Ok(())
}

#[tokio::test]
async fn inactive_introspection_drops_claims() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/token/introspect"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": false})))
        .mount(&server)
        .await;

    let introspection = provider(&server)?.introspect_token("expired").await?;

    assert!(!introspection.active);
    assert!(introspection.subject.is_none());
    Ok(())
}

#[tokio::test]
async fn logout_posts_refresh_token() -> AppResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/moba/protocol/openid-connect/logout"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server)?.logout("refresh-1").await
}

#[test]
fn config_debug_redacts_client_secret() -> AppResult<()> {
    let config = KeycloakConfig {
        base_url: Url::parse("https://sso.example.com")
            .map_err(|error| AppError::Internal(error.to_string()))?,
        realm: "moba".to_owned(),
        client_id: "gateway".to_owned(),
        client_secret: "super-secret".to_owned(),
        timeout: Duration::from_secs(10),
    };

    assert!(!format!("{config:?}").contains("super-secret"));
    Ok(())
}
