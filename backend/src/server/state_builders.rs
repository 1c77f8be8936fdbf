//! Builders wiring Diesel and cache adapters into the HTTP state.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use patternhub::domain::ports::{CallerDirectory, ProfileCache, UserProfileQuery, UserRepository};
use patternhub::domain::{
    ContributionReviewService, ContributionSubmissionService, IdentitySyncService,
    UserAccountService,
};
use patternhub::inbound::http::state::{HttpState, HttpStatePorts};
use patternhub::outbound::cache::InMemoryProfileCache;
use patternhub::outbound::persistence::{
    DieselContributionRepository, DieselCreditLedger, DieselPatternRepository,
    DieselUserRepository,
};

use super::ServerConfig;

type AccountPorts = (Arc<dyn UserProfileQuery>, Arc<dyn CallerDirectory>);

/// One account service serves both the profile read and caller lookups, so
/// they share a cache.
fn build_account_ports<U, K>(
    users: Arc<U>,
    cache: Arc<K>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
) -> AccountPorts
where
    U: UserRepository + 'static,
    K: ProfileCache + 'static,
{
    let service = Arc::new(UserAccountService::new(users, cache, clock).with_cache_ttl(ttl));
    (service.clone(), service)
}

/// Build the handler state over PostgreSQL and the configured cache.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let pool = &config.db_pool;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let contributions = Arc::new(DieselContributionRepository::new(pool.clone()));

    let (profile, callers) = match &config.redis_cache {
        Some(redis) => build_account_ports(
            users.clone(),
            Arc::new(redis.clone()),
            clock.clone(),
            config.cache_ttl,
        ),
        None => build_account_ports(
            users.clone(),
            Arc::new(InMemoryProfileCache::new(clock.clone())),
            clock.clone(),
            config.cache_ttl,
        ),
    };

    let ports = HttpStatePorts {
        review: Arc::new(ContributionReviewService::new(
            contributions.clone(),
            Arc::new(DieselCreditLedger::new(pool.clone())),
            clock.clone(),
        )),
        submission: Arc::new(ContributionSubmissionService::new(
            contributions,
            Arc::new(DieselPatternRepository::new(pool.clone())),
            clock.clone(),
        )),
        identity_sync: Arc::new(
            IdentitySyncService::new(users, clock.clone())
                .with_deletion_policy(config.deletion_policy),
        ),
        profile,
        callers,
        tokens: config.tokens.clone(),
    };

    web::Data::new(
        HttpState::new(ports)
            .with_webhook_secret(config.webhook_secret.clone())
            .with_clock(clock),
    )
}
