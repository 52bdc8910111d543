//! Identity-first registration.
//!
//! The identity is created at the provider first, then the local record is
//! persisted, then a welcome email is sent. A failed local persist triggers
//! a compensating delete of the identity, unless a re-read shows the record
//! was committed anyway. A failed email only clears `email_sent`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use accountgate_core::AppResult;
use accountgate_domain::{IdentityRecord, RegistrationRequest};

use crate::{
    CompensationResult, IdentityCleanup, IdentityCreation, IdentityProvider, NotificationService, PasswordHasher,
    UserStore,
};

mod outcome;
mod steps;

pub use outcome::{ConflictReason, IdentityStatus, RegistrationOutcome, StepReport, StepState};

/// Upper bound for each network step of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationTimeouts {
    /// Duplicate check against the local store.
    pub duplicate_check: Duration,
    /// Admin credential fetch plus identity creation.
    pub identity_creation: Duration,
    /// Password hashing plus the local store transaction.
    pub local_persist: Duration,
    /// Whole compensation routine.
    pub compensation: Duration,
    /// Welcome email delivery.
    pub email: Duration,
}

impl RegistrationTimeouts {
    /// Uses the same bound for every step.
    #[must_use]
    pub fn uniform(limit: Duration) -> Self {
        Self {
            duplicate_check: limit,
            identity_creation: limit,
            local_persist: limit,
            compensation: limit,
            email: limit,
        }
    }
}

impl Default for RegistrationTimeouts {
    fn default() -> Self {
        Self::uniform(Duration::from_secs(15))
    }
}

/// Orchestrates registration across the identity provider, the local store
/// and the email transport.
#[derive(Clone)]
pub struct RegistrationService {
    identity_provider: Arc<dyn IdentityProvider>,
    user_store: Arc<dyn UserStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    notifications: NotificationService,
    cleanup: IdentityCleanup,
    timeouts: RegistrationTimeouts,
    temporary_password: bool,
}

impl RegistrationService {
    /// Creates a registration service with default timeouts and temporary
    /// provider passwords.
    #[must_use]
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        user_store: Arc<dyn UserStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        notifications: NotificationService,
    ) -> Self {
        let timeouts = RegistrationTimeouts::default();
        Self {
            cleanup: IdentityCleanup::new(identity_provider.clone(), timeouts.compensation),
            identity_provider,
            user_store,
            password_hasher,
            notifications,
            timeouts,
            temporary_password: true,
        }
    }

    /// Overrides the per-step timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: RegistrationTimeouts) -> Self {
        self.cleanup = IdentityCleanup::new(self.identity_provider.clone(), timeouts.compensation);
        self.timeouts = timeouts;
        self
    }

    /// Sets whether the provider password is marked temporary.
    #[must_use]
    pub fn with_temporary_password(mut self, temporary_password: bool) -> Self {
        self.temporary_password = temporary_password;
        self
    }

    /// Registers a user at the identity provider first, then locally.
    ///
    /// Returns `Err` only for a malformed request or a failed duplicate
    /// check. Both happen before any side effect. Every later failure is a
    /// [`RegistrationOutcome`] variant.
    pub async fn register_identity_first(
        &self,
        request: RegistrationRequest,
    ) -> AppResult<RegistrationOutcome> {
        let registration = request.validate()?;
        let username = registration.username().clone();
        info!(username = %username, "registration started");

        if self.find_existing(registration.email()).await?.is_some() {
            info!(username = %username, "registration rejected, email already registered");
            return Ok(RegistrationOutcome::Conflict {
                reason: ConflictReason::EmailAlreadyRegistered,
            });
        }

        let identity_record = IdentityRecord::from_registration(&registration, self.temporary_password);
        let provider_id = match self.create_identity(&identity_record).await {
            Ok(IdentityCreation::Created { provider_id }) => provider_id,
            Ok(IdentityCreation::Conflict) => {
                info!(username = %username, "registration rejected, identity already exists");
                return Ok(RegistrationOutcome::Conflict {
                    reason: ConflictReason::IdentityAlreadyExists,
                });
            }
            Err(failure) => {
                warn!(username = %username, error = %failure, "identity creation failed");
                return Ok(RegistrationOutcome::IdentityProviderFailure {
                    detail: failure.to_string(),
                });
            }
        };

        let user = match self.persist_local(&registration).await {
            Ok(user) => user,
            Err(failure) => match self.find_committed(&registration).await {
                Ok(Some(user)) => {
                    warn!(
                        username = %username,
                        user_id = %user.id,
                        error = %failure,
                        "local persist reported failure after commit, keeping identity"
                    );
                    user
                }
                Ok(None) => {
                    warn!(
                        username = %username,
                        error = %failure,
                        "local persist failed, removing created identity"
                    );
                    let compensation = self.cleanup.remove_by_username(&username).await;
                    if compensation.requires_manual_cleanup() {
                        error!(
                            username = %username,
                            provider_id = ?provider_id.as_ref().map(ToString::to_string),
                            compensation = compensation.as_str(),
                            requires_manual_cleanup = true,
                            "identity left without local record"
                        );
                    }
                    return Ok(RegistrationOutcome::LocalPersistFailure {
                        detail: failure.to_string(),
                        compensation,
                    });
                }
                Err(lookup_failure) => {
                    error!(
                        username = %username,
                        provider_id = ?provider_id.as_ref().map(ToString::to_string),
                        error = %failure,
                        lookup_error = %lookup_failure,
                        requires_manual_cleanup = true,
                        "local record state unknown after persist failure, identity kept"
                    );
                    return Ok(RegistrationOutcome::LocalPersistFailure {
                        detail: failure.to_string(),
                        compensation: CompensationResult::Failed {
                            detail: format!(
                                "identity kept, local record state unknown: {lookup_failure}"
                            ),
                        },
                    });
                }
            },
        };

        let email_sent = self.send_welcome(&registration).await;

        info!(username = %username, user_id = %user.id, email_sent, "registration completed");
        Ok(RegistrationOutcome::Created {
            user,
            email_sent,
            identity: IdentityStatus {
                username,
                provider_id,
            },
        })
    }
}
