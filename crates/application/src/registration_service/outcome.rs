use accountgate_domain::{ProviderUserId, Username};

use crate::{CompensationResult, LocalUserRecord};

/// Why a registration was rejected as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// A local record already uses the email.
    EmailAlreadyRegistered,
    /// The identity provider already holds the username or email.
    IdentityAlreadyExists,
}

impl ConflictReason {
    /// Returns the caller-facing message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmailAlreadyRegistered => "email already registered",
            Self::IdentityAlreadyExists => "identity already exists",
        }
    }
}

/// Identity created at the provider for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityStatus {
    /// Username the identity was registered under.
    pub username: Username,
    /// Provider id when the create response exposed it.
    pub provider_id: Option<ProviderUserId>,
}

/// Terminal result of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Identity and local record exist.
    Created {
        /// Persisted local record.
        user: LocalUserRecord,
        /// Whether the welcome email was delivered to the transport.
        email_sent: bool,
        /// Provider-side identity.
        identity: IdentityStatus,
    },
    /// A duplicate was detected; nothing was created.
    Conflict {
        /// Where the duplicate was found.
        reason: ConflictReason,
    },
    /// The identity provider could not create the identity.
    IdentityProviderFailure {
        /// Failure detail.
        detail: String,
    },
    /// The identity was created but the local record was not.
    LocalPersistFailure {
        /// Failure detail.
        detail: String,
        /// Result of removing the created identity.
        compensation: CompensationResult,
    },
}

/// Progress of one registration side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// The step completed.
    Succeeded,
    /// The step ran and failed.
    Failed,
    /// The step never ran.
    Skipped,
    /// The step completed and was undone.
    RolledBack,
}

impl StepState {
    /// Returns the stable wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::RolledBack => "rolled_back",
        }
    }
}

/// Per-side-effect summary of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Identity creation at the provider.
    pub identity: StepState,
    /// Local record persistence.
    pub local_record: StepState,
    /// Welcome email delivery.
    pub email: StepState,
}

impl RegistrationOutcome {
    /// Returns whether repeating the same request cannot collide with state
    /// left behind by this attempt.
    #[must_use]
    pub fn is_retry_safe(&self) -> bool {
        match self {
            Self::Created { .. } => false,
            Self::Conflict { .. } | Self::IdentityProviderFailure { .. } => true,
            Self::LocalPersistFailure { compensation, .. } => {
                !compensation.requires_manual_cleanup()
            }
        }
    }

    /// Returns whether an identity may remain without a local record.
    #[must_use]
    pub fn requires_manual_cleanup(&self) -> bool {
        matches!(
            self,
            Self::LocalPersistFailure { compensation, .. } if compensation.requires_manual_cleanup()
        )
    }

    /// Reports what happened to each side effect.
    #[must_use]
    pub fn steps(&self) -> StepReport {
        match self {
            Self::Created { email_sent, .. } => StepReport {
                identity: StepState::Succeeded,
                local_record: StepState::Succeeded,
                email: if *email_sent {
                    StepState::Succeeded
                } else {
                    StepState::Failed
                },
            },
            Self::Conflict { reason } => StepReport {
                identity: match reason {
                    ConflictReason::EmailAlreadyRegistered => StepState::Skipped,
                    ConflictReason::IdentityAlreadyExists => StepState::Failed,
                },
                local_record: StepState::Skipped,
                email: StepState::Skipped,
            },
            Self::IdentityProviderFailure { .. } => StepReport {
                identity: StepState::Failed,
                local_record: StepState::Skipped,
                email: StepState::Skipped,
            },
            Self::LocalPersistFailure { compensation, .. } => StepReport {
                identity: match compensation {
                    CompensationResult::Succeeded | CompensationResult::SkippedNotFound => {
                        StepState::RolledBack
                    }
                    CompensationResult::Failed { .. } => StepState::Succeeded,
                },
                local_record: StepState::Failed,
                email: StepState::Skipped,
            },
        }
    }
}
