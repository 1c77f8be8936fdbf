//! Fully wired application state over in-memory adapters.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{
    Contribution, ContributionId, ContributionReviewService, ContributionSubmissionService,
    DeletionPolicy, DisplayName, EmailAddress, IdentityId, IdentitySyncService, Implementation,
    ImplementationId, PatternDefinition, PatternId, ReviewStatus, User, UserAccountService,
    UserId, UserRole, VerifiedIdentity, WebhookSecret,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::cache::InMemoryProfileCache;

use super::{
    InMemoryContributionStore, InMemoryCreditLedger, InMemoryUserRepository, MutableClock,
    StaticTokenVerifier,
};

/// Stores, clock and credentials behind one [`HttpState`].
pub struct Harness {
    pub users: Arc<InMemoryUserRepository>,
    pub contributions: Arc<InMemoryContributionStore>,
    pub ledger: Arc<InMemoryCreditLedger>,
    pub cache: Arc<InMemoryProfileCache>,
    pub clock: Arc<MutableClock>,
    tokens: StaticTokenVerifier,
    webhook_secret: Option<WebhookSecret>,
    deletion_policy: DeletionPolicy,
}

impl Default for Harness {
    fn default() -> Self {
        let clock = Arc::new(MutableClock::at_fixture_time());
        let cache_clock: Arc<dyn Clock> = clock.clone();
        Self {
            users: Arc::default(),
            contributions: Arc::default(),
            ledger: Arc::default(),
            cache: Arc::new(InMemoryProfileCache::new(cache_clock)),
            clock,
            tokens: StaticTokenVerifier::default(),
            webhook_secret: None,
            deletion_policy: DeletionPolicy::default(),
        }
    }
}

fn valid<T, E: std::fmt::Debug>(value: Result<T, E>, what: &str) -> T {
    match value {
        Ok(value) => value,
        Err(err) => panic!("invalid fixture {what}: {err:?}"),
    }
}

impl Harness {
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: WebhookSecret) -> Self {
        self.webhook_secret = Some(secret);
        self
    }

    #[must_use]
    pub fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    /// Accept `token` as a bearer credential for `identity`.
    pub fn accept_token(&mut self, token: &str, identity: VerifiedIdentity) {
        self.tokens = std::mem::take(&mut self.tokens).with_token(token, identity);
    }

    /// Accept `token` for an existing user, with subject claim only.
    pub fn sign_in(&mut self, token: &str, user: &User) {
        self.accept_token(token, VerifiedIdentity::subject_only(user.identity_id.clone()));
    }

    /// Store a user whose email and name derive from `identity_id`.
    pub fn user(&self, identity_id: &str, role: UserRole) -> User {
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            identity_id: valid(IdentityId::new(identity_id), "identity id"),
            email: valid(
                EmailAddress::new(format!("{identity_id}@example.com")),
                "email",
            ),
            display_name: valid(DisplayName::new(identity_id), "display name"),
            role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.put(user.clone());
        user
    }

    /// Seed a catalogue entry.
    pub fn pattern(&self, id: &str) -> PatternDefinition {
        let pattern = PatternDefinition {
            id: valid(PatternId::new(id), "pattern id"),
            category: "creational".to_owned(),
            title: format!("Pattern {id}"),
            problem: "Object creation is scattered.".to_owned(),
            usage: "Centralise construction.".to_owned(),
        };
        self.contributions.seed_pattern(pattern.clone());
        pattern
    }

    /// Seed a pending implementation and its contribution.
    pub fn pending_contribution(&self, author: &User, pattern: &PatternDefinition) -> Contribution {
        let now = self.clock.utc();
        let implementation = Implementation {
            id: ImplementationId::random(),
            pattern_id: pattern.id.clone(),
            author_id: Some(author.id),
            author_name: Some(author.display_name.to_string()),
            code: "fn build() {}".to_owned(),
            alternative_code: Vec::new(),
            considerations: Vec::new(),
            variations: Vec::new(),
            status: ReviewStatus::Pending,
            premium: false,
            created_at: now,
            updated_at: now,
        };
        let contribution = Contribution {
            id: ContributionId::random(),
            pattern_id: pattern.id.clone(),
            implementation_id: implementation.id,
            submitted_by: author.id,
            status: ReviewStatus::Pending,
            quality_score: None,
            reviewer_id: None,
            reviewed_at: None,
            credits_awarded: 0,
            rejection_reason: None,
            submitted_at: now,
        };
        self.contributions
            .seed_submission(implementation, contribution.clone());
        contribution
    }

    /// Build handler state over the shared stores.
    pub fn http_state(&self) -> HttpState {
        let clock: Arc<dyn Clock> = self.clock.clone();
        let accounts = Arc::new(UserAccountService::new(
            self.users.clone(),
            self.cache.clone(),
            clock.clone(),
        ));
        HttpState::new(HttpStatePorts {
            review: Arc::new(ContributionReviewService::new(
                self.contributions.clone(),
                self.ledger.clone(),
                clock.clone(),
            )),
            submission: Arc::new(ContributionSubmissionService::new(
                self.contributions.clone(),
                self.contributions.clone(),
                clock.clone(),
            )),
            identity_sync: Arc::new(
                IdentitySyncService::new(self.users.clone(), clock.clone())
                    .with_deletion_policy(self.deletion_policy),
            ),
            profile: accounts.clone(),
            callers: accounts,
            tokens: Arc::new(self.tokens.clone()),
        })
        .with_webhook_secret(self.webhook_secret.clone())
        .with_clock(clock)
    }
}
