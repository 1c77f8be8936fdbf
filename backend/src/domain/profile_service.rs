//! Caller account lookup and profile reads.
//!
//! Both ports share one lookup path: find the row by identity id and, when it
//! is missing, create it from the token's email and name claims. The profile
//! read is cached; caller resolution for authorization never is.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CallerDirectory, ProfileCache, ProfileView, UserPersistenceError, UserProfileQuery,
    UserRepository,
};
use crate::domain::{Error, User, VerifiedIdentity};

/// Default lifetime of a cached profile.
pub const PROFILE_CACHE_TTL: Duration = Duration::from_secs(900);

/// Service implementing [`UserProfileQuery`] and [`CallerDirectory`].
#[derive(Clone)]
pub struct UserAccountService<U, K> {
    users: Arc<U>,
    cache: Arc<K>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<U, K> UserAccountService<U, K> {
    /// Create a service using [`PROFILE_CACHE_TTL`].
    pub fn new(users: Arc<U>, cache: Arc<K>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            cache,
            clock,
            ttl: PROFILE_CACHE_TTL,
        }
    }

    /// Override the cache lifetime.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("user repository error: {error}"))
}

impl<U, K> UserAccountService<U, K>
where
    U: UserRepository,
    K: ProfileCache,
{
    async fn find_or_provision(&self, identity: &VerifiedIdentity) -> Result<Option<User>, Error> {
        if let Some(user) = self
            .users
            .find_by_identity_id(&identity.subject)
            .await
            .map_err(map_user_error)?
        {
            return Ok(Some(user));
        }

        let Some(profile) = identity.provisional_profile() else {
            debug!(identity_id = %identity.subject, "no local user and no email claim");
            return Ok(None);
        };
        let user = profile.into_new_user(self.clock.utc());
        match self.users.insert(&user).await {
            Ok(()) => {
                info!(identity_id = %user.identity_id, user_id = %user.id, "user created on first request");
                Ok(Some(user))
            }
            Err(UserPersistenceError::Duplicate { .. }) => self
                .users
                .find_by_identity_id(&identity.subject)
                .await
                .map_err(map_user_error),
            Err(err) => Err(map_user_error(err)),
        }
    }
}

#[async_trait]
impl<U, K> UserProfileQuery for UserAccountService<U, K>
where
    U: UserRepository,
    K: ProfileCache,
{
    async fn fetch_profile(&self, identity: &VerifiedIdentity) -> Result<ProfileView, Error> {
        match self.cache.get(&identity.subject).await {
            Ok(Some(view)) => return Ok(view),
            Ok(None) => {}
            Err(err) => warn!(
                identity_id = %identity.subject,
                error = %err,
                "profile cache read failed; falling back to store"
            ),
        }

        let user = self
            .find_or_provision(identity)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| Error::not_found("User not found"))?;
        let view = ProfileView::from(&user);
        if let Err(err) = self.cache.put(&view, self.ttl).await {
            warn!(identity_id = %identity.subject, error = %err, "profile cache write failed");
        }
        Ok(view)
    }
}

#[async_trait]
impl<U, K> CallerDirectory for UserAccountService<U, K>
where
    U: UserRepository,
    K: ProfileCache,
{
    async fn resolve_caller(&self, identity: &VerifiedIdentity) -> Result<User, Error> {
        match self.find_or_provision(identity).await? {
            Some(user) if !user.is_deleted() => Ok(user),
            Some(_) => Err(Error::forbidden("Account has been deleted")),
            None => Err(Error::forbidden("No account for this identity")),
        }
    }
}
