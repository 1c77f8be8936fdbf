//! HTTP server configuration object and its construction from settings.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use patternhub::domain::ports::TokenVerifier;
use patternhub::domain::{DeletionPolicy, PROFILE_CACHE_TTL, WebhookSecret};
use patternhub::inbound::http::identity_config::IdentitySettings;
use patternhub::outbound::auth::{DisabledTokenVerifier, JwtTokenVerifier};
use patternhub::outbound::cache::RedisProfileCache;
use patternhub::outbound::persistence::{DbPool, PoolConfig};
use patternhub::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) redis_cache: Option<RedisProfileCache>,
    pub(crate) cache_ttl: Duration,
    pub(crate) deletion_policy: DeletionPolicy,
    pub(crate) tokens: Arc<dyn TokenVerifier>,
    pub(crate) webhook_secret: Option<WebhookSecret>,
}

impl ServerConfig {
    /// Construct a configuration with the in-process profile cache, the
    /// default cache lifetime, the `retain` deletion policy and no webhook
    /// secret.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, tokens: Arc<dyn TokenVerifier>) -> Self {
        Self {
            bind_addr,
            db_pool,
            redis_cache: None,
            cache_ttl: PROFILE_CACHE_TTL,
            deletion_policy: DeletionPolicy::default(),
            tokens,
            webhook_secret: None,
        }
    }

    /// Share profile reads through Redis instead of the in-process cache.
    #[must_use]
    pub fn with_redis_cache(mut self, cache: Option<RedisProfileCache>) -> Self {
        self.redis_cache = cache;
        self
    }

    /// Override the profile cache lifetime.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Choose the store effect of `user.deleted` events.
    #[must_use]
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    /// Attach the webhook signing secret.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: Option<WebhookSecret>) -> Self {
        self.webhook_secret = secret;
        self
    }

    /// Resolve settings and identity secrets into live adapters.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the database URL is missing, a pool
    /// cannot be built, the token key is unusable, or the deletion policy is
    /// unknown.
    pub async fn from_settings(
        settings: &AppSettings,
        identity: IdentitySettings,
    ) -> std::io::Result<Self> {
        let database_url = settings
            .database_url
            .as_deref()
            .ok_or_else(|| std::io::Error::other("PATTERNS_DATABASE_URL must be set"))?;
        let pool_config = PoolConfig::new(database_url).with_max_size(settings.db_pool_size());
        info!(config = ?pool_config, "connecting to database");
        let db_pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;

        let deletion_policy = settings
            .deletion_policy()
            .map_err(std::io::Error::other)?;

        let tokens: Arc<dyn TokenVerifier> = match identity.jwt_public_key.as_deref() {
            Some(pem) => Arc::new(
                JwtTokenVerifier::from_rsa_pem(pem, settings.jwt_issuer.as_deref()).map_err(
                    |err| std::io::Error::other(format!("invalid identity JWT public key: {err}")),
                )?,
            ),
            None => {
                warn!("no identity JWT public key configured; bearer tokens will be rejected");
                Arc::new(DisabledTokenVerifier)
            }
        };

        let redis_cache = match settings.redis_url.as_deref() {
            Some(url) => Some(
                RedisProfileCache::connect(url, settings.db_pool_size())
                    .await
                    .map_err(std::io::Error::other)?,
            ),
            None => None,
        };

        Ok(Self::new(settings.bind_addr(), db_pool, tokens)
            .with_redis_cache(redis_cache)
            .with_cache_ttl(settings.profile_cache_ttl())
            .with_deletion_policy(deletion_policy)
            .with_webhook_secret(identity.webhook_secret))
    }
}
