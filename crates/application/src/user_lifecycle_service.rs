//! Single-call account operations.
//!
//! Each operation makes one call into the identity provider or the local
//! store and maps the result. Multi-system sequencing lives in
//! [`crate::RegistrationService`].

use std::sync::Arc;

use accountgate_core::{AppError, AppResult, CallerIdentity};
use accountgate_domain::{
    AccountType, AdminCredential, EmailAddress, LocalUserId, PlainPassword, ProviderUserId,
    validate_password,
};

use crate::{
    CompanyUpdate, IdentityCleanup, IdentityDeletion, IdentityProvider, LocalUserRecord,
    PasswordHasher, UserStore, UserUpdate,
};

mod tokens;

/// Raw patch for a local user. Absent fields stay unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateRequest {
    /// New account kind.
    pub account_type: Option<AccountType>,
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New disabled flag.
    pub disabled: Option<bool>,
    /// New plaintext password; hashed before storage.
    pub password: Option<PlainPassword>,
    /// Patch for the owned company.
    pub company: Option<CompanyUpdate>,
}

/// Application service for account reads, updates, deletion and tokens.
#[derive(Clone)]
pub struct UserLifecycleService {
    identity_provider: Arc<dyn IdentityProvider>,
    user_store: Arc<dyn UserStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    cleanup: IdentityCleanup,
}

impl UserLifecycleService {
    /// Creates a new lifecycle service.
    #[must_use]
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        user_store: Arc<dyn UserStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        cleanup: IdentityCleanup,
    ) -> Self {
        Self {
            identity_provider,
            user_store,
            password_hasher,
            cleanup,
        }
    }

    /// Returns a local user by id.
    pub async fn get_by_id(&self, user_id: LocalUserId) -> AppResult<LocalUserRecord> {
        self.user_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
    }

    /// Applies a field-level patch to a local user.
    pub async fn update_by_id(
        &self,
        user_id: LocalUserId,
        request: UserUpdateRequest,
    ) -> AppResult<LocalUserRecord> {
        let update = self.build_update(request)?;

        let existing = self
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;

        if existing.company.is_none()
            && update
                .company
                .as_ref()
                .is_some_and(|company| company.company_name.is_none())
        {
            return Err(AppError::Validation(
                "company name is required to add a company".to_owned(),
            ));
        }

        self.user_store.update_user(user_id, update).await
    }

    /// Deletes an identity at the provider.
    pub async fn delete_identity_by_id(&self, provider_id: &ProviderUserId) -> AppResult<()> {
        match self.cleanup.remove_by_id(provider_id).await? {
            IdentityDeletion::Deleted => Ok(()),
            IdentityDeletion::NotFound => Err(AppError::NotFound(format!(
                "identity {provider_id} not found"
            ))),
        }
    }

    /// Deletes the caller's own account.
    ///
    /// The local record goes first so that no local user outlives its
    /// identity. Repeating the call after a provider failure is safe.
    pub async fn delete_own_identity(&self, caller: &CallerIdentity) -> AppResult<()> {
        let provider_id = ProviderUserId::new(caller.subject())?;

        if let Some(email) = caller.email() {
            let email = EmailAddress::new(email)?;
            if let Some(user) = self.user_store.find_by_email(&email).await? {
                self.user_store.delete_by_id(user.id).await?;
            }
        }

        self.delete_identity_by_id(&provider_id).await
    }

    /// Returns a fresh administrative credential.
    pub async fn admin_token(&self) -> AppResult<AdminCredential> {
        self.identity_provider.fetch_admin_credential().await
    }

    fn build_update(&self, request: UserUpdateRequest) -> AppResult<UserUpdate> {
        let email = request.email.map(EmailAddress::new).transpose()?;

        let password_hash = match request.password {
            Some(password) => {
                validate_password(&password)?;
                Some(self.password_hasher.hash_password(password.expose())?)
            }
            None => None,
        };

        if let Some(company) = &request.company
            && company
                .company_name
                .as_deref()
                .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AppError::Validation(
                "company name must not be empty".to_owned(),
            ));
        }

        Ok(UserUpdate {
            account_type: request.account_type,
            first_name: trimmed(request.first_name),
            last_name: trimmed(request.last_name),
            email,
            phone_number: trimmed(request.phone_number),
            country: trimmed(request.country),
            disabled: request.disabled,
            password_hash,
            company: request.company.filter(|company| !company.is_empty()),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_owned())
}
