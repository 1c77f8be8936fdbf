//! Port for contribution and implementation persistence.
//!
//! Reviews are committed with a conditional update so two concurrent
//! reviewers cannot both move the same contribution out of `pending`.
use async_trait::async_trait;

use crate::domain::{
    Contribution, ContributionId, Implementation, ImplementationId, ReviewRecord, ReviewStatus,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by contribution repository adapters.
    pub enum ContributionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "contribution repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "contribution repository query failed: {message}",
        /// Stored rows violate a domain invariant (unknown status, missing
        /// implementation row).
        Integrity { message: String } => "contribution data is inconsistent: {message}",
    }
}

/// Result of [`ContributionRepository::record_review`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommit {
    /// Both rows moved; carries the post-review contribution.
    Applied(Contribution),
    /// The contribution had already left `pending`; nothing was written.
    Stale { current: ReviewStatus },
    /// No contribution with that id exists.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionRepository: Send + Sync {
    /// Fetch a contribution by id.
    async fn find_by_id(
        &self,
        id: &ContributionId,
    ) -> Result<Option<Contribution>, ContributionPersistenceError>;

    /// Fetch an implementation by id.
    async fn find_implementation(
        &self,
        id: &ImplementationId,
    ) -> Result<Option<Implementation>, ContributionPersistenceError>;

    /// Apply `record` to the contribution and its implementation in one
    /// transaction, guarded on the contribution still being `pending`.
    async fn record_review(
        &self,
        record: &ReviewRecord,
    ) -> Result<ReviewCommit, ContributionPersistenceError>;

    /// Insert a new implementation and its contribution wrapper together.
    async fn create_submission(
        &self,
        implementation: &Implementation,
        contribution: &Contribution,
    ) -> Result<(), ContributionPersistenceError>;
}
