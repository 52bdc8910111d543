//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_email_service;
mod keycloak_identity_provider;
mod postgres_user_store;
mod sendgrid_email_service;
mod smtp_email_service;

pub use argon2_password_hasher::{Argon2PasswordHasher, Argon2Settings};
pub use console_email_service::ConsoleEmailService;
pub use keycloak_identity_provider::{KeycloakConfig, KeycloakIdentityProvider};
pub use postgres_user_store::PostgresUserStore;
pub use sendgrid_email_service::{
    SENDGRID_API_BASE_URL, SendGridEmailConfig, SendGridEmailService,
};
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
