use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use accountgate_core::{AppError, AppResult};
use accountgate_domain::{EmailAddress, IdentityRecord, ValidatedRegistration};

use crate::{IdentityCreation, LocalUserRecord, NewCompany, NewLocalUser};

use super::RegistrationService;

async fn bounded<T>(
    limit: Duration,
    on_timeout: impl FnOnce(String) -> AppError,
    step: &str,
    future: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(format!(
            "{step} timed out after {}s",
            limit.as_secs()
        ))),
    }
}

impl RegistrationService {
    pub(super) async fn find_existing(
        &self,
        email: &EmailAddress,
    ) -> AppResult<Option<LocalUserRecord>> {
        bounded(
            self.timeouts.duplicate_check,
            AppError::Internal,
            "duplicate check",
            self.user_store.find_by_email(email),
        )
        .await
    }

    pub(super) async fn create_identity(
        &self,
        record: &IdentityRecord,
    ) -> AppResult<IdentityCreation> {
        bounded(
            self.timeouts.identity_creation,
            AppError::Upstream,
            "identity creation",
            async {
                let credential = self.identity_provider.fetch_admin_credential().await?;
                self.identity_provider
                    .create_identity(&credential, record)
                    .await
            },
        )
        .await
    }

    pub(super) async fn persist_local(
        &self,
        registration: &ValidatedRegistration,
    ) -> AppResult<LocalUserRecord> {
        bounded(
            self.timeouts.local_persist,
            AppError::Internal,
            "local persist",
            async {
                let password_hash = self.hash_password(registration).await?;
                self.user_store
                    .create_user_and_company(new_local_user(registration, password_hash))
                    .await
            },
        )
        .await
    }

    async fn hash_password(&self, registration: &ValidatedRegistration) -> AppResult<String> {
        let hasher = Arc::clone(&self.password_hasher);
        let password = registration.password().expose().to_owned();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|error| AppError::Internal(format!("password hashing task failed: {error}")))?
    }

    /// Re-reads the local record after a failed persist. A timeout or a lost
    /// reply can hide a commit that already happened.
    pub(super) async fn find_committed(
        &self,
        registration: &ValidatedRegistration,
    ) -> AppResult<Option<LocalUserRecord>> {
        let existing = bounded(
            self.timeouts.duplicate_check,
            AppError::Internal,
            "committed record check",
            self.user_store.find_by_email(registration.email()),
        )
        .await?;

        Ok(existing.filter(|user| user.username == registration.username().as_str()))
    }

    pub(super) async fn send_welcome(&self, registration: &ValidatedRegistration) -> bool {
        let result = bounded(
            self.timeouts.email,
            AppError::Upstream,
            "welcome email",
            self.notifications
                .send_welcome(registration.email(), registration.first_name()),
        )
        .await;

        match result {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    username = %registration.username(),
                    error = %error,
                    "welcome email was not sent"
                );
                false
            }
        }
    }
}

fn new_local_user(registration: &ValidatedRegistration, password_hash: String) -> NewLocalUser {
    NewLocalUser {
        account_type: registration.account_type(),
        first_name: registration.first_name().map(ToOwned::to_owned),
        last_name: registration.last_name().map(ToOwned::to_owned),
        username: registration.username().clone(),
        email: registration.email().clone(),
        phone_number: registration.phone_number().map(ToOwned::to_owned),
        country: registration.country().map(ToOwned::to_owned),
        password_hash,
        company: registration.company().map(|company| NewCompany {
            company_name: company.company_name().to_owned(),
            tax_id: company.tax_id().map(ToOwned::to_owned),
            phone_number: company.phone_number().map(ToOwned::to_owned),
            country: company.country().map(ToOwned::to_owned),
            city: company.city().map(ToOwned::to_owned),
            zip_code: company.zip_code().map(ToOwned::to_owned),
        }),
    }
}
