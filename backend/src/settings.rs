//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PATTERNS_*` environment variables and an
//! optional config file. Identity-provider secrets are not part of these
//! settings; see [`crate::inbound::http::identity_config`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DeletionPolicy, PROFILE_CACHE_TTL, UnknownDeletionPolicy};
use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PATTERNS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Redis URL for the profile cache; the in-process cache is used when
    /// unset.
    pub redis_url: Option<String>,
    /// Profile cache lifetime in seconds.
    pub profile_cache_ttl_secs: Option<u64>,
    /// Store effect of `user.deleted` events: `retain`, `soft` or `hard`.
    pub deletion_policy: Option<String>,
    /// Expected `iss` claim of bearer tokens.
    pub jwt_issuer: Option<String>,
}

impl AppSettings {
    /// Return the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the pool bound, falling back to the pool default.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Return the profile cache lifetime, falling back to 900 seconds.
    pub fn profile_cache_ttl(&self) -> Duration {
        self.profile_cache_ttl_secs
            .map_or(PROFILE_CACHE_TTL, Duration::from_secs)
    }

    /// Parse the configured deletion policy, defaulting to `retain`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownDeletionPolicy`] for any other spelling.
    pub fn deletion_policy(&self) -> Result<DeletionPolicy, UnknownDeletionPolicy> {
        self.deletion_policy
            .as_deref()
            .map_or(Ok(DeletionPolicy::default()), str::parse)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and fallbacks.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "PATTERNS_BIND_ADDR",
        "PATTERNS_DATABASE_URL",
        "PATTERNS_DB_POOL_SIZE",
        "PATTERNS_REDIS_URL",
        "PATTERNS_PROFILE_CACHE_TTL_SECS",
        "PATTERNS_DELETION_POLICY",
        "PATTERNS_JWT_ISSUER",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("patternhub")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert!(settings.database_url.is_none());
        assert_eq!(settings.db_pool_size(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.profile_cache_ttl(), Duration::from_secs(900));
        assert_eq!(settings.deletion_policy(), Ok(DeletionPolicy::Retain));
        assert!(settings.jwt_issuer.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PATTERNS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "PATTERNS_DATABASE_URL",
                Some("postgres://localhost/patterns".to_owned()),
            ),
            ("PATTERNS_DB_POOL_SIZE", Some("4".to_owned())),
            ("PATTERNS_REDIS_URL", Some("redis://localhost:6379".to_owned())),
            ("PATTERNS_PROFILE_CACHE_TTL_SECS", Some("60".to_owned())),
            ("PATTERNS_DELETION_POLICY", Some("soft".to_owned())),
            (
                "PATTERNS_JWT_ISSUER",
                Some("https://identity.example.com".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/patterns")
        );
        assert_eq!(settings.db_pool_size(), 4);
        assert_eq!(settings.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(settings.profile_cache_ttl(), Duration::from_secs(60));
        assert_eq!(settings.deletion_policy(), Ok(DeletionPolicy::SoftDelete));
        assert_eq!(
            settings.jwt_issuer.as_deref(),
            Some("https://identity.example.com")
        );
    }

    #[rstest]
    fn unknown_deletion_policy_is_an_error() {
        let _guard = lock_env([("PATTERNS_DELETION_POLICY", Some("purge".to_owned()))]);

        let settings = load_from_empty_args();

        assert!(settings.deletion_policy().is_err());
    }
}
