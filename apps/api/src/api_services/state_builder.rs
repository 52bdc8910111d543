use std::sync::Arc;

use accountgate_application::{
    IdentityCleanup, IdentityProvider, NotificationService, PasswordHasher, RegistrationService,
    RegistrationTimeouts, UserLifecycleService, UserStore,
};
use accountgate_core::AppError;
use accountgate_infrastructure::{
    Argon2PasswordHasher, KeycloakConfig, KeycloakIdentityProvider, PostgresUserStore,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::email::build_email_service;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let identity_provider: Arc<dyn IdentityProvider> =
        Arc::new(KeycloakIdentityProvider::new(KeycloakConfig {
            base_url: config.keycloak.base_url.clone(),
            realm: config.keycloak.realm.clone(),
            client_id: config.keycloak.client_id.clone(),
            client_secret: config.keycloak.client_secret.clone(),
            timeout: config.keycloak.timeout,
        })?);
    let user_store: Arc<dyn UserStore> = Arc::new(PostgresUserStore::new(pool));
    let password_hasher: Arc<dyn PasswordHasher> =
        Arc::new(Argon2PasswordHasher::with_settings(config.password_hashing)?);
    let notifications = NotificationService::new(build_email_service(config)?);

    let timeouts = RegistrationTimeouts::uniform(config.registration_step_timeout);
    info!(
        realm = %config.keycloak.realm,
        temporary_password = config.keycloak.temporary_password,
        step_timeout_secs = config.registration_step_timeout.as_secs(),
        "identity provider configured"
    );
    info!(
        email_provider = config.email_provider.name(),
        admin_token_endpoint = config.expose_admin_token_endpoint,
        email_endpoints = config.expose_email_endpoints,
        "operator endpoints configured"
    );

    Ok(AppState {
        registration_service: RegistrationService::new(
            identity_provider.clone(),
            user_store.clone(),
            password_hasher.clone(),
            notifications.clone(),
        )
        .with_timeouts(timeouts)
        .with_temporary_password(config.keycloak.temporary_password),
        user_lifecycle_service: UserLifecycleService::new(
            identity_provider.clone(),
            user_store,
            password_hasher,
            IdentityCleanup::new(identity_provider, timeouts.compensation),
        ),
        notification_service: notifications,
        email_provider: config.email_provider.name(),
        expose_error_details: config.expose_error_details,
        expose_admin_token_endpoint: config.expose_admin_token_endpoint,
        expose_email_endpoints: config.expose_email_endpoints,
    })
}
