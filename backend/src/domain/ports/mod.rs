//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod contribution_repository;
mod contribution_review;
mod contribution_submission;
mod credit_ledger;
mod identity_sync;
mod pattern_repository;
mod profile_cache;
mod token_verifier;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use contribution_repository::MockContributionRepository;
pub use contribution_repository::{
    ContributionPersistenceError, ContributionRepository, ReviewCommit,
};
#[cfg(test)]
pub use contribution_review::MockContributionReview;
pub use contribution_review::{
    ApprovalReceipt, ApproveContributionRequest, ContributionReview, RejectContributionRequest,
    RejectionReceipt,
};
#[cfg(test)]
pub use contribution_submission::MockContributionSubmission;
pub use contribution_submission::{
    ContributionSubmission, SubmissionReceipt, SubmitImplementationRequest,
};
#[cfg(test)]
pub use credit_ledger::MockCreditLedger;
pub use credit_ledger::{CreditLedger, CreditLedgerError};
#[cfg(test)]
pub use identity_sync::MockIdentitySync;
pub use identity_sync::{IdentitySync, SyncOutcome};
#[cfg(test)]
pub use pattern_repository::MockPatternRepository;
pub use pattern_repository::{PatternRepository, PatternRepositoryError};
#[cfg(test)]
pub use profile_cache::MockProfileCache;
pub use profile_cache::{ProfileCache, ProfileCacheError};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerificationError, TokenVerifier};
#[cfg(test)]
pub use user_profile_query::{MockCallerDirectory, MockUserProfileQuery};
pub use user_profile_query::{CallerDirectory, ProfileView, UserProfileQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
