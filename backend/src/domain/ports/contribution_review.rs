//! Driving port for the admin review workflow.

use async_trait::async_trait;

use crate::domain::{ContributionId, Error, QualityScore, UserId};

/// Request to approve a pending contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveContributionRequest {
    pub contribution_id: ContributionId,
    pub reviewer_id: UserId,
    pub quality_score: Option<QualityScore>,
}

/// Request to reject a pending contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectContributionRequest {
    pub contribution_id: ContributionId,
    pub reviewer_id: UserId,
    /// Free-text reason; blank or missing falls back to the default.
    pub reason: Option<String>,
}

/// Outcome of a successful approval.
///
/// `credit_award_failed` is set when the review committed but the ledger
/// write did not; the contribution stays approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalReceipt {
    pub user_id: UserId,
    pub credits_awarded: u32,
    pub credit_award_failed: bool,
}

/// Outcome of a successful rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionReceipt {
    pub user_id: UserId,
    pub reason: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionReview: Send + Sync {
    /// Move a pending contribution to `approved` and award credits.
    async fn approve(&self, request: ApproveContributionRequest)
    -> Result<ApprovalReceipt, Error>;

    /// Move a pending contribution to `rejected`.
    async fn reject(&self, request: RejectContributionRequest) -> Result<RejectionReceipt, Error>;
}
