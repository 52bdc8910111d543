use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use accountgate_core::AppError;
use accountgate_infrastructure::Argon2Settings;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct SmtpRuntimeConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct SendGridRuntimeConfig {
    pub api_key: String,
    pub from_address: String,
    pub from_name: String,
}

#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    Console,
    Smtp(SmtpRuntimeConfig),
    SendGrid(SendGridRuntimeConfig),
}

impl EmailProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Smtp(_) => "smtp",
            Self::SendGrid(_) => "sendgrid",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeycloakRuntimeConfig {
    pub base_url: Url,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
    pub temporary_password: bool,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub keycloak: KeycloakRuntimeConfig,
    pub registration_step_timeout: Duration,
    pub email_provider: EmailProviderConfig,
    pub password_hashing: Argon2Settings,
    pub expose_error_details: bool,
    pub expose_admin_token_endpoint: bool,
    pub expose_email_endpoints: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(10);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8081);

        let keycloak = load_keycloak_config()?;
        let registration_step_timeout =
            Duration::from_secs(parse_seconds("REGISTRATION_STEP_TIMEOUT_SECS", 15)?);
        let email_provider = load_email_provider()?;
        let password_hashing = load_password_hashing()?;
        let expose_error_details = parse_flag("EXPOSE_ERROR_DETAILS", false);
        let expose_admin_token_endpoint = parse_flag("EXPOSE_ADMIN_TOKEN_ENDPOINT", false);
        let expose_email_endpoints = parse_flag("EXPOSE_EMAIL_ENDPOINTS", false);

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            keycloak,
            registration_step_timeout,
            email_provider,
            password_hashing,
            expose_error_details,
            expose_admin_token_endpoint,
            expose_email_endpoints,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_keycloak_config() -> Result<KeycloakRuntimeConfig, AppError> {
    let base_url = required_non_empty_env("KEYCLOAK_BASE_URL")?;
    let base_url = Url::parse(base_url.trim())
        .map_err(|error| AppError::Validation(format!("invalid KEYCLOAK_BASE_URL: {error}")))?;

    Ok(KeycloakRuntimeConfig {
        base_url,
        realm: env::var("KEYCLOAK_REALM")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "moba".to_owned()),
        client_id: required_non_empty_env("KEYCLOAK_CLIENT_ID")?,
        client_secret: required_non_empty_env("KEYCLOAK_CLIENT_SECRET")?,
        timeout: Duration::from_secs(parse_seconds("KEYCLOAK_TIMEOUT_SECS", 10)?),
        temporary_password: parse_flag("KEYCLOAK_TEMPORARY_PASSWORD", true),
    })
}

fn load_email_provider() -> Result<EmailProviderConfig, AppError> {
    match env::var("EMAIL_PROVIDER")
        .unwrap_or_else(|_| "console".to_owned())
        .as_str()
    {
        "console" => Ok(EmailProviderConfig::Console),
        "smtp" => {
            let port = required_non_empty_env("SMTP_PORT")?
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;
            Ok(EmailProviderConfig::Smtp(SmtpRuntimeConfig {
                host: required_non_empty_env("SMTP_HOST")?,
                port,
                username: required_non_empty_env("SMTP_USERNAME")?,
                password: required_non_empty_env("SMTP_PASSWORD")?,
                from_address: required_non_empty_env("SMTP_FROM_ADDRESS")?,
            }))
        }
        "sendgrid" => Ok(EmailProviderConfig::SendGrid(SendGridRuntimeConfig {
            api_key: required_non_empty_env("SENDGRID_API_KEY")?,
            from_address: required_non_empty_env("SENDGRID_FROM_ADDRESS")?,
            from_name: env::var("SENDGRID_FROM_NAME")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "Account Gateway".to_owned()),
        })),
        other => Err(AppError::Validation(format!(
            "EMAIL_PROVIDER must be one of 'console', 'smtp' or 'sendgrid', got '{other}'"
        ))),
    }
}

fn load_password_hashing() -> Result<Argon2Settings, AppError> {
    let defaults = Argon2Settings::default();

    Ok(Argon2Settings {
        memory_kib: parse_positive("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
        iterations: parse_positive("ARGON2_ITERATIONS", defaults.iterations)?,
        parallelism: parse_positive("ARGON2_PARALLELISM", defaults.parallelism)?,
    })
}

fn parse_positive(name: &str, default: u32) -> Result<u32, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            let parsed = value
                .trim()
                .parse::<u32>()
                .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;
            if parsed == 0 {
                return Err(AppError::Validation(format!(
                    "{name} must be greater than zero"
                )));
            }
            Ok(parsed)
        }
        _ => Ok(default),
    }
}

fn parse_seconds(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            let seconds = value
                .trim()
                .parse::<u64>()
                .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;
            if seconds == 0 {
                return Err(AppError::Validation(format!(
                    "{name} must be greater than zero"
                )));
            }
            Ok(seconds)
        }
        _ => Ok(default),
    }
}

fn parse_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
