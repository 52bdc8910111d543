//! Identity deletion shared by registration compensation and account removal.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use accountgate_core::{AppError, AppResult};
use accountgate_domain::{ProviderUserId, Username};

use crate::{IdentityDeletion, IdentityProvider};

/// Result of removing an identity that registration created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompensationResult {
    /// The identity was deleted.
    Succeeded,
    /// No identity with the username exists anymore.
    SkippedNotFound,
    /// The identity could not be removed and may still exist.
    Failed {
        /// Failure detail.
        detail: String,
    },
}

impl CompensationResult {
    /// Returns the stable wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::SkippedNotFound => "skipped-not-found",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns whether an operator must remove a dangling identity.
    #[must_use]
    pub fn requires_manual_cleanup(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Deletes identities with a freshly fetched admin credential.
#[derive(Clone)]
pub struct IdentityCleanup {
    identity_provider: Arc<dyn IdentityProvider>,
    timeout: Duration,
}

impl IdentityCleanup {
    /// Creates a cleanup helper bounded by `timeout` per invocation.
    #[must_use]
    pub fn new(identity_provider: Arc<dyn IdentityProvider>, timeout: Duration) -> Self {
        Self {
            identity_provider,
            timeout,
        }
    }

    /// Removes the identity registered under `username`.
    ///
    /// The provider id is always re-resolved by username. Never returns an
    /// error: every failure, including a timeout, becomes `Failed`.
    pub async fn remove_by_username(&self, username: &Username) -> CompensationResult {
        match tokio::time::timeout(self.timeout, self.remove_by_username_inner(username)).await {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => CompensationResult::Failed {
                detail: error.to_string(),
            },
            Err(_) => CompensationResult::Failed {
                detail: format!(
                    "identity cleanup timed out after {}s",
                    self.timeout.as_secs()
                ),
            },
        }
    }

    /// Removes an identity by provider id.
    pub async fn remove_by_id(&self, provider_id: &ProviderUserId) -> AppResult<IdentityDeletion> {
        match tokio::time::timeout(self.timeout, self.remove_by_id_inner(provider_id)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Upstream(format!(
                "identity deletion timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn remove_by_username_inner(&self, username: &Username) -> AppResult<CompensationResult> {
        let credential = self.identity_provider.fetch_admin_credential().await?;

        let Some(provider_id) = self
            .identity_provider
            .find_identity_by_username(&credential, username)
            .await?
        else {
            warn!(username = %username, "identity to clean up was not found");
            return Ok(CompensationResult::SkippedNotFound);
        };

        match self
            .identity_provider
            .delete_identity(&credential, &provider_id)
            .await?
        {
            IdentityDeletion::Deleted => {
                info!(username = %username, provider_id = %provider_id, "identity removed");
                Ok(CompensationResult::Succeeded)
            }
            IdentityDeletion::NotFound => Ok(CompensationResult::SkippedNotFound),
        }
    }

    async fn remove_by_id_inner(&self, provider_id: &ProviderUserId) -> AppResult<IdentityDeletion> {
        let credential = self.identity_provider.fetch_admin_credential().await?;
        self.identity_provider
            .delete_identity(&credential, provider_id)
            .await
    }
}
