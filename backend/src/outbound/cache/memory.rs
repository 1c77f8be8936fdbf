//! Process-local profile cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::IdentityId;
use crate::domain::ports::{ProfileCache, ProfileCacheError, ProfileView};

/// TTL cache held in a mutex-guarded map.
///
/// Expired entries are dropped lazily on read.
pub struct InMemoryProfileCache {
    entries: Mutex<HashMap<IdentityId, (ProfileView, DateTime<Utc>)>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryProfileCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl ProfileCache for InMemoryProfileCache {
    async fn get(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<ProfileView>, ProfileCacheError> {
        let now = self.clock.utc();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(identity_id) {
            Some((profile, expires_at)) if *expires_at > now => Ok(Some(profile.clone())),
            Some(_) => {
                entries.remove(identity_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, profile: &ProfileView, ttl: Duration) -> Result<(), ProfileCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| ProfileCacheError::backend(format!("invalid cache ttl: {err}")))?;
        let expires_at = self.clock.utc() + ttl;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.id.clone(), (profile.clone(), expires_at));
        Ok(())
    }
}
