//! Port for the read-through profile cache.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::IdentityId;

use super::{ProfileView, define_port_error};

define_port_error! {
    /// Errors surfaced by profile cache adapters.
    pub enum ProfileCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "profile cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "profile cache serialisation failed: {message}",
    }
}

/// Profiles cached by identity id.
///
/// Entries are never purged on update; staleness is bounded by the TTL
/// supplied to [`ProfileCache::put`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCache: Send + Sync {
    /// Read the cached profile for `identity_id`, if fresh.
    async fn get(&self, identity_id: &IdentityId)
    -> Result<Option<ProfileView>, ProfileCacheError>;

    /// Store `profile` under its identity id for `ttl`.
    async fn put(&self, profile: &ProfileView, ttl: Duration) -> Result<(), ProfileCacheError>;
}
