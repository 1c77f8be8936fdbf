//! In-memory driven-port adapters.
//!
//! They honour the same contracts as the Diesel adapters (uniqueness,
//! conditional review commits) so workflow tests exercise real semantics
//! without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ContributionPersistenceError, ContributionRepository, CreditLedger, CreditLedgerError,
    PatternRepository, PatternRepositoryError, ReviewCommit, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Contribution, ContributionId, CreditAward, IdentityId, Implementation, ImplementationId,
    PatternDefinition, PatternId, ReviewRecord, ReviewStatus, User, UserProfile,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// User rows keyed by identity id, with email uniqueness enforced.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<IdentityId, User>>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let rows = users
            .into_iter()
            .map(|user| (user.identity_id.clone(), user))
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Insert or replace a row without uniqueness checks.
    pub fn put(&self, user: User) {
        lock(&self.rows).insert(user.identity_id.clone(), user);
    }

    pub fn get(&self, identity_id: &IdentityId) -> Option<User> {
        lock(&self.rows).get(identity_id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_identity_id(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.get(identity_id))
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut rows = lock(&self.rows);
        if rows.contains_key(&user.identity_id) {
            return Err(UserPersistenceError::duplicate("users_identity_id_key"));
        }
        if rows.values().any(|row| row.email == user.email) {
            return Err(UserPersistenceError::duplicate("users_email_key"));
        }
        rows.insert(user.identity_id.clone(), user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        profile: &UserProfile,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows.get_mut(&profile.identity_id) else {
            return Ok(false);
        };
        row.email = profile.email.clone();
        row.display_name = profile.display_name.clone();
        row.role = profile.role;
        row.updated_at = updated_at;
        Ok(true)
    }

    async fn soft_delete(
        &self,
        identity_id: &IdentityId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        match rows.get_mut(identity_id) {
            Some(row) if row.deleted_at.is_none() => {
                row.deleted_at = Some(deleted_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn hard_delete(&self, identity_id: &IdentityId) -> Result<bool, UserPersistenceError> {
        Ok(lock(&self.rows).remove(identity_id).is_some())
    }
}

#[derive(Default)]
struct ContributionState {
    patterns: HashMap<PatternId, PatternDefinition>,
    implementations: HashMap<ImplementationId, Implementation>,
    contributions: HashMap<ContributionId, Contribution>,
}

/// Pattern catalogue plus implementation and contribution rows.
#[derive(Default)]
pub struct InMemoryContributionStore {
    state: Mutex<ContributionState>,
}

impl InMemoryContributionStore {
    pub fn seed_pattern(&self, pattern: PatternDefinition) {
        lock(&self.state).patterns.insert(pattern.id.clone(), pattern);
    }

    pub fn seed_submission(&self, implementation: Implementation, contribution: Contribution) {
        let mut state = lock(&self.state);
        state
            .implementations
            .insert(implementation.id, implementation);
        state.contributions.insert(contribution.id, contribution);
    }

    pub fn contribution(&self, id: &ContributionId) -> Option<Contribution> {
        lock(&self.state).contributions.get(id).cloned()
    }

    pub fn implementation(&self, id: &ImplementationId) -> Option<Implementation> {
        lock(&self.state).implementations.get(id).cloned()
    }
}

#[async_trait]
impl ContributionRepository for InMemoryContributionStore {
    async fn find_by_id(
        &self,
        id: &ContributionId,
    ) -> Result<Option<Contribution>, ContributionPersistenceError> {
        Ok(self.contribution(id))
    }

    async fn find_implementation(
        &self,
        id: &ImplementationId,
    ) -> Result<Option<Implementation>, ContributionPersistenceError> {
        Ok(self.implementation(id))
    }

    async fn record_review(
        &self,
        record: &ReviewRecord,
    ) -> Result<ReviewCommit, ContributionPersistenceError> {
        let mut state = lock(&self.state);
        let Some(current) = state.contributions.get(&record.contribution_id).cloned() else {
            return Ok(ReviewCommit::Missing);
        };
        if current.status != ReviewStatus::Pending {
            return Ok(ReviewCommit::Stale {
                current: current.status,
            });
        }
        let Some(implementation) = state.implementations.get_mut(&current.implementation_id)
        else {
            return Err(ContributionPersistenceError::integrity(format!(
                "implementation {} missing for contribution {}",
                current.implementation_id, current.id
            )));
        };
        implementation.status = record.outcome.status();
        implementation.updated_at = record.reviewed_at;

        let reviewed = current.with_review(record);
        state.contributions.insert(reviewed.id, reviewed.clone());
        Ok(ReviewCommit::Applied(reviewed))
    }

    async fn create_submission(
        &self,
        implementation: &Implementation,
        contribution: &Contribution,
    ) -> Result<(), ContributionPersistenceError> {
        let mut state = lock(&self.state);
        if !state.patterns.contains_key(&implementation.pattern_id) {
            return Err(ContributionPersistenceError::query(format!(
                "foreign key violation: pattern {} does not exist",
                implementation.pattern_id
            )));
        }
        state
            .implementations
            .insert(implementation.id, implementation.clone());
        state
            .contributions
            .insert(contribution.id, contribution.clone());
        Ok(())
    }
}

#[async_trait]
impl PatternRepository for InMemoryContributionStore {
    async fn find_by_id(
        &self,
        id: &PatternId,
    ) -> Result<Option<PatternDefinition>, PatternRepositoryError> {
        Ok(lock(&self.state).patterns.get(id).cloned())
    }
}

/// Ledger that records awards and can be told to fail.
#[derive(Default)]
pub struct InMemoryCreditLedger {
    awards: Mutex<Vec<CreditAward>>,
    failing: AtomicBool,
}

impl InMemoryCreditLedger {
    /// Make subsequent awards fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn awards(&self) -> Vec<CreditAward> {
        lock(&self.awards).clone()
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn award(&self, award: &CreditAward) -> Result<(), CreditLedgerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CreditLedgerError::write("ledger unavailable"));
        }
        lock(&self.awards).push(award.clone());
        Ok(())
    }
}
