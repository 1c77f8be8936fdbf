//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{IdentityId, User, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique constraint (identity id or email) rejected the insert.
        Duplicate { message: String } => "user already exists: {message}",
    }
}

/// Storage for identity-linked user rows.
///
/// Rows are keyed by the identity-provider id. Lookups return soft-deleted
/// rows too; callers decide what a deletion marker means for them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identity-provider id.
    async fn find_by_identity_id(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new row, failing with [`UserPersistenceError::Duplicate`] on
    /// a uniqueness violation.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Refresh email, display name and role of the row matching
    /// `profile.identity_id`. Returns `false` when no row matched.
    async fn update_profile(
        &self,
        profile: &UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;

    /// Mark the row deleted. Returns `false` when no row matched.
    async fn soft_delete(
        &self,
        identity_id: &IdentityId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;

    /// Remove the row. Returns `false` when no row matched.
    async fn hard_delete(&self, identity_id: &IdentityId) -> Result<bool, UserPersistenceError>;
}
