//! Identity-provider user synchronisation.
//!
//! Deliveries are at-least-once and may arrive out of order, so every
//! handler converges on the same row regardless of repetition:
//!
//! - `user.created` inserts unless a row exists; a uniqueness violation from a
//!   concurrent insert counts as success.
//! - `user.updated` refreshes the row, creating it when the created event was
//!   missed.
//! - `user.deleted` follows the configured [`DeletionPolicy`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{IdentitySync, SyncOutcome, UserPersistenceError, UserRepository};
use crate::domain::{
    DeletedProviderUser, Error, IdentityEvent, IdentityEventError, IdentityId, ProviderUser,
    UserProfile,
};

/// Store effect of a `user.deleted` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    /// Log only; the row is kept for attribution.
    #[default]
    Retain,
    /// Set the row's deletion marker.
    SoftDelete,
    /// Remove the row.
    HardDelete,
}

/// Raised when configuration names an unknown policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deletion policy {value:?}; expected retain, soft or hard")]
pub struct UnknownDeletionPolicy {
    pub value: String,
}

impl DeletionPolicy {
    /// Configuration spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retain => "retain",
            Self::SoftDelete => "soft",
            Self::HardDelete => "hard",
        }
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionPolicy {
    type Err = UnknownDeletionPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "soft" => Ok(Self::SoftDelete),
            "hard" => Ok(Self::HardDelete),
            _ => Err(UnknownDeletionPolicy {
                value: s.to_owned(),
            }),
        }
    }
}

/// Service implementing [`IdentitySync`].
#[derive(Clone)]
pub struct IdentitySyncService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    deletion_policy: DeletionPolicy,
}

impl<U> IdentitySyncService<U> {
    /// Create a service with the default retain-on-delete policy.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            clock,
            deletion_policy: DeletionPolicy::default(),
        }
    }

    /// Override the deletion policy.
    #[must_use]
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { message } => {
            Error::internal(format!("unexpected user uniqueness conflict: {message}"))
        }
    }
}

fn map_event_error(error: IdentityEventError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Whether a duplicate-key constraint name points at the identity id column
/// rather than some other unique column such as email.
fn is_identity_conflict(constraint: &str) -> bool {
    constraint.contains("identity_id")
}

impl<U: UserRepository> IdentitySyncService<U> {
    async fn create(&self, profile: UserProfile) -> Result<SyncOutcome, Error> {
        if self
            .users
            .find_by_identity_id(&profile.identity_id)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            debug!(identity_id = %profile.identity_id, "user already present");
            return Ok(SyncOutcome::AlreadyPresent);
        }

        let user = profile.into_new_user(self.clock.utc());
        match self.users.insert(&user).await {
            Ok(()) => {
                info!(identity_id = %user.identity_id, user_id = %user.id, "user created");
                Ok(SyncOutcome::Created)
            }
            Err(UserPersistenceError::Duplicate { message }) => {
                if is_identity_conflict(&message) {
                    debug!(
                        identity_id = %user.identity_id,
                        constraint = %message,
                        "concurrent insert won; treating as created"
                    );
                } else {
                    warn!(
                        identity_id = %user.identity_id,
                        constraint = %message,
                        "insert collided with another account; no row stored for this identity"
                    );
                }
                Ok(SyncOutcome::AlreadyPresent)
            }
            Err(err) => Err(map_user_error(err)),
        }
    }

    async fn on_user_created(&self, user: &ProviderUser) -> Result<SyncOutcome, Error> {
        let profile = user.to_profile().map_err(map_event_error)?;
        self.create(profile).await
    }

    async fn on_user_updated(&self, user: &ProviderUser) -> Result<SyncOutcome, Error> {
        let profile = user.to_profile().map_err(map_event_error)?;
        let existing = self
            .users
            .find_by_identity_id(&profile.identity_id)
            .await
            .map_err(map_user_error)?;
        if existing.is_none() {
            debug!(identity_id = %profile.identity_id, "update for unknown user; creating");
            return self.create(profile).await;
        }

        let updated = self
            .users
            .update_profile(&profile, self.clock.utc())
            .await
            .map_err(map_user_error)?;
        if !updated {
            warn!(identity_id = %profile.identity_id, "user vanished during update; recreating");
            return self.create(profile).await;
        }
        info!(identity_id = %profile.identity_id, role = %profile.role, "user updated");
        Ok(SyncOutcome::Updated)
    }

    async fn on_user_deleted(&self, deleted: &DeletedProviderUser) -> Result<SyncOutcome, Error> {
        let identity_id = deleted
            .id
            .as_deref()
            .map(IdentityId::new)
            .transpose()
            .map_err(|err| Error::invalid_request(format!("invalid deleted user id: {err}")))?;
        info!(
            identity_id = deleted.id.as_deref(),
            policy = %self.deletion_policy,
            "user deletion received"
        );

        let Some(identity_id) = identity_id else {
            return match self.deletion_policy {
                DeletionPolicy::Retain => Ok(SyncOutcome::Retained),
                _ => Err(Error::invalid_request("user.deleted event carries no user id")),
            };
        };
        let removed = match self.deletion_policy {
            DeletionPolicy::Retain => return Ok(SyncOutcome::Retained),
            DeletionPolicy::SoftDelete => self
                .users
                .soft_delete(&identity_id, self.clock.utc())
                .await
                .map_err(map_user_error)?
                .then_some(SyncOutcome::SoftDeleted),
            DeletionPolicy::HardDelete => self
                .users
                .hard_delete(&identity_id)
                .await
                .map_err(map_user_error)?
                .then_some(SyncOutcome::HardDeleted),
        };
        Ok(removed.unwrap_or(SyncOutcome::UnknownUser))
    }
}

#[async_trait]
impl<U: UserRepository> IdentitySync for IdentitySyncService<U> {
    async fn handle(&self, event: IdentityEvent) -> Result<SyncOutcome, Error> {
        match &event {
            IdentityEvent::UserCreated(user) => self.on_user_created(user).await,
            IdentityEvent::UserUpdated(user) => self.on_user_updated(user).await,
            IdentityEvent::UserDeleted(deleted) => self.on_user_deleted(deleted).await,
            IdentityEvent::Unhandled { event_type } => {
                info!(event_type = %event_type, "ignoring unhandled identity event");
                Ok(SyncOutcome::Ignored)
            }
        }
    }
}

#[cfg(test)]
#[path = "identity_sync_service_tests.rs"]
mod tests;
