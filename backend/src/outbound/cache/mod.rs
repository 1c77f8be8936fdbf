//! Profile cache adapters.
//!
//! - [`RedisProfileCache`]: shared cache backed by `bb8-redis`, used when a
//!   Redis URL is configured.
//! - [`InMemoryProfileCache`]: process-local fallback with the same TTL
//!   semantics.
//!
//! Entries are JSON-encoded [`crate::domain::ports::ProfileView`] values keyed
//! by `profile:v1:<identity id>`.

mod memory;
mod redis_cache;

pub use memory::InMemoryProfileCache;
pub use redis_cache::{RedisProfileCache, RedisProfileCacheError};

use crate::domain::IdentityId;

const KEY_PREFIX: &str = "profile:v1:";

pub(crate) fn profile_key(identity_id: &IdentityId) -> String {
    format!("{KEY_PREFIX}{identity_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn keys_are_namespaced_by_version() {
        let id = IdentityId::new("user_2abc").expect("id");
        assert_eq!(profile_key(&id), "profile:v1:user_2abc");
    }
}
