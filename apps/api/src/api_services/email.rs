use std::sync::Arc;

use accountgate_application::EmailService;
use accountgate_core::AppError;
use accountgate_infrastructure::{
    ConsoleEmailService, SENDGRID_API_BASE_URL, SendGridEmailConfig, SendGridEmailService,
    SmtpEmailConfig, SmtpEmailService,
};
use url::Url;

use crate::api_config::{ApiConfig, EmailProviderConfig};

pub(super) fn build_email_service(config: &ApiConfig) -> Result<Arc<dyn EmailService>, AppError> {
    let service: Arc<dyn EmailService> = match &config.email_provider {
        EmailProviderConfig::Console => Arc::new(ConsoleEmailService::new()),
        EmailProviderConfig::Smtp(smtp) => Arc::new(SmtpEmailService::new(SmtpEmailConfig {
            host: smtp.host.clone(),
            port: smtp.port,
            username: smtp.username.clone(),
            password: smtp.password.clone(),
            from_address: smtp.from_address.clone(),
        })),
        EmailProviderConfig::SendGrid(sendgrid) => {
            let api_base_url = Url::parse(SENDGRID_API_BASE_URL).map_err(|error| {
                AppError::Internal(format!("invalid SendGrid base url: {error}"))
            })?;
            let http_client = reqwest::Client::builder()
                .timeout(config.keycloak.timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build SendGrid http client: {error}"))
                })?;

            Arc::new(SendGridEmailService::new(
                http_client,
                SendGridEmailConfig {
                    api_base_url,
                    api_key: sendgrid.api_key.clone(),
                    from_address: sendgrid.from_address.clone(),
                    from_name: sendgrid.from_name.clone(),
                },
            ))
        }
    };

    Ok(service)
}
