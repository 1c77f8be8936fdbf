//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::WebhookSecret;
use crate::domain::ports::{
    CallerDirectory, ContributionReview, ContributionSubmission, IdentitySync, TokenVerifier,
    UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub review: Arc<dyn ContributionReview>,
    pub submission: Arc<dyn ContributionSubmission>,
    pub identity_sync: Arc<dyn IdentitySync>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub callers: Arc<dyn CallerDirectory>,
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub review: Arc<dyn ContributionReview>,
    pub submission: Arc<dyn ContributionSubmission>,
    pub identity_sync: Arc<dyn IdentitySync>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub callers: Arc<dyn CallerDirectory>,
    pub tokens: Arc<dyn TokenVerifier>,
    /// Shared webhook signing key; `None` answers deliveries with 500.
    pub webhook_secret: Option<WebhookSecret>,
    /// Time source for webhook timestamp tolerance checks.
    pub clock: Arc<dyn Clock>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with no webhook secret and the system clock.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            review,
            submission,
            identity_sync,
            profile,
            callers,
            tokens,
        } = ports;
        Self {
            review,
            submission,
            identity_sync,
            profile,
            callers,
            tokens,
            webhook_secret: None,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Attach the webhook signing key.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: Option<WebhookSecret>) -> Self {
        self.webhook_secret = secret;
        self
    }

    /// Replace the clock, for deterministic signature tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
