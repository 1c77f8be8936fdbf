//! Driving port for identity-provider lifecycle events.

use async_trait::async_trait;

use crate::domain::{Error, IdentityEvent};

/// What a handled event did to the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    /// A row already existed, or a concurrent insert won the race.
    AlreadyPresent,
    Updated,
    SoftDeleted,
    HardDeleted,
    /// Deletion acknowledged without mutation.
    Retained,
    /// Deletion for an identity with no local row.
    UnknownUser,
    /// Event type this service does not act on.
    Ignored,
}

impl SyncOutcome {
    /// Human-readable acknowledgement returned to the provider.
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "User created",
            Self::AlreadyPresent => "User already exists",
            Self::Updated => "User updated",
            Self::SoftDeleted => "User marked deleted",
            Self::HardDeleted => "User deleted",
            Self::Retained => "User deletion acknowledged",
            Self::UnknownUser => "No local user for deletion",
            Self::Ignored => "Event ignored",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentitySync: Send + Sync {
    /// Apply a verified, decoded event idempotently.
    async fn handle(&self, event: IdentityEvent) -> Result<SyncOutcome, Error>;
}
