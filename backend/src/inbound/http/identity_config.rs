//! Identity-provider secret loading.
//!
//! The webhook signing secret and the JWT verification key come from the
//! environment (or a mounted file) rather than the layered settings, so they
//! never appear in config files or CLI history.

use std::path::PathBuf;

use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::domain::{WebhookSecret, WebhookSecretError};

const WEBHOOK_SECRET_ENV: &str = "IDENTITY_WEBHOOK_SECRET";
const JWT_PUBLIC_KEY_ENV: &str = "IDENTITY_JWT_PUBLIC_KEY";
const JWT_PUBLIC_KEY_FILE_ENV: &str = "IDENTITY_JWT_PUBLIC_KEY_FILE";

/// Build mode for identity configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds start without a token key and log a warning.
    Debug,
    /// Release builds refuse to start without a token key.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Secrets shared with the identity provider.
#[derive(Debug, Default)]
pub struct IdentitySettings {
    /// Key for webhook signature checks; `None` disables the webhook.
    pub webhook_secret: Option<WebhookSecret>,
    /// PEM-encoded RSA public key for bearer tokens; `None` rejects every
    /// token.
    pub jwt_public_key: Option<String>,
}

/// Errors raised while loading identity secrets.
#[derive(thiserror::Error, Debug)]
pub enum IdentityConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// The webhook secret is present but unusable.
    #[error("invalid value for {name}: {source}")]
    InvalidWebhookSecret {
        name: &'static str,
        #[source]
        source: WebhookSecretError,
    },
    /// Reading the public key file failed.
    #[error("failed to read identity public key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load identity secrets from environment variables.
///
/// `IDENTITY_JWT_PUBLIC_KEY` takes precedence over
/// `IDENTITY_JWT_PUBLIC_KEY_FILE`. A missing webhook secret is tolerated in
/// every mode; the webhook endpoint then answers 500.
///
/// # Examples
///
/// ```rust
/// use patternhub::inbound::http::identity_config::{identity_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "IDENTITY_WEBHOOK_SECRET" => Some("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw".to_owned()),
///     "IDENTITY_JWT_PUBLIC_KEY" => Some("-----BEGIN PUBLIC KEY-----".to_owned()),
///     _ => None,
/// });
///
/// let settings = identity_settings_from_env(&env, BuildMode::Release).expect("settings");
/// assert!(settings.webhook_secret.is_some());
/// ```
pub fn identity_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<IdentitySettings, IdentityConfigError> {
    Ok(IdentitySettings {
        webhook_secret: webhook_secret_from_env(env)?,
        jwt_public_key: jwt_public_key_from_env(env, mode)?,
    })
}

fn webhook_secret_from_env<E: Env>(env: &E) -> Result<Option<WebhookSecret>, IdentityConfigError> {
    let Some(mut raw) = env.string(WEBHOOK_SECRET_ENV) else {
        warn!("IDENTITY_WEBHOOK_SECRET not set; webhook deliveries will fail");
        return Ok(None);
    };

    let parsed = WebhookSecret::parse(&raw);
    raw.zeroize();
    let secret = parsed.map_err(|source| IdentityConfigError::InvalidWebhookSecret {
        name: WEBHOOK_SECRET_ENV,
        source,
    })?;
    info!(fingerprint = %secret.fingerprint(), "identity webhook secret loaded");
    Ok(Some(secret))
}

fn jwt_public_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<String>, IdentityConfigError> {
    if let Some(pem) = env.string(JWT_PUBLIC_KEY_ENV).filter(|v| !v.trim().is_empty()) {
        return Ok(Some(pem));
    }

    if let Some(path) = env.string(JWT_PUBLIC_KEY_FILE_ENV) {
        let path = PathBuf::from(path);
        return std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| IdentityConfigError::KeyRead { path, source });
    }

    if mode.is_debug() {
        warn!("no identity public key configured; bearer tokens will be rejected");
        Ok(None)
    } else {
        Err(IdentityConfigError::MissingEnv {
            name: JWT_PUBLIC_KEY_ENV,
        })
    }
}
