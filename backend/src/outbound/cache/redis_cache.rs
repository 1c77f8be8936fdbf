//! Redis-backed profile cache.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::{self, RedisError};
use tracing::debug;

use crate::domain::IdentityId;
use crate::domain::ports::{ProfileCache, ProfileCacheError, ProfileView};

use super::profile_key;

/// Errors raised while connecting to Redis.
#[derive(Debug, thiserror::Error)]
pub enum RedisProfileCacheError {
    #[error("failed to build redis pool: {0}")]
    Build(#[from] RedisError),
}

/// Shared profile cache stored as `SET key value EX ttl`.
#[derive(Clone)]
pub struct RedisProfileCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisProfileCache {
    /// Connect to `url` with a pool of at most `max_size` connections.
    pub async fn connect(url: &str, max_size: u32) -> Result<Self, RedisProfileCacheError> {
        let manager = RedisConnectionManager::new(url)?;
        let pool = Pool::builder().max_size(max_size).build(manager).await?;
        Ok(Self { pool })
    }

    async fn connection(
        &self,
    ) -> Result<bb8_redis::bb8::PooledConnection<'_, RedisConnectionManager>, ProfileCacheError>
    {
        self.pool
            .get()
            .await
            .map_err(|err| ProfileCacheError::backend(err.to_string()))
    }
}

fn backend_error(err: &RedisError) -> ProfileCacheError {
    ProfileCacheError::backend(err.to_string())
}

#[async_trait]
impl ProfileCache for RedisProfileCache {
    async fn get(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<ProfileView>, ProfileCacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(profile_key(identity_id))
            .query_async(&mut *conn)
            .await
            .map_err(|err| backend_error(&err))?;
        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|err| ProfileCacheError::serialization(err.to_string()))
        })
        .transpose()
    }

    async fn put(&self, profile: &ProfileView, ttl: Duration) -> Result<(), ProfileCacheError> {
        let json = serde_json::to_string(profile)
            .map_err(|err| ProfileCacheError::serialization(err.to_string()))?;
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(profile_key(&profile.id))
            .arg(json)
            .arg("EX")
            .arg(seconds)
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| backend_error(&err))?;
        debug!(identity_id = %profile.id, ttl_seconds = seconds, "profile cached");
        Ok(())
    }
}
