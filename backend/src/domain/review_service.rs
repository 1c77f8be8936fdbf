//! Contribution review workflow.
//!
//! Approval and rejection share one lookup-then-commit path. The store's
//! conditional update is the real guard; the pre-check only gives a fast,
//! well-worded answer for the common case. Credits are awarded after the
//! review commits, and a failed award is logged and reported rather than
//! undoing the review.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    ApprovalReceipt, ApproveContributionRequest, ContributionPersistenceError,
    ContributionRepository, ContributionReview, CreditLedger, RejectContributionRequest,
    RejectionReceipt, ReviewCommit,
};
use crate::domain::{
    APPROVAL_CREDITS, AlreadyReviewed, Contribution, ContributionId, CreditAward,
    CreditProvenance, CreditReason, Error, ReviewDecision, ReviewOutcome, ReviewRecord, UserId,
    rejection_reason_or_default,
};

/// Review service implementing [`ContributionReview`].
#[derive(Clone)]
pub struct ContributionReviewService<C, L> {
    contributions: Arc<C>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<C, L> ContributionReviewService<C, L> {
    /// Create a service over a contribution store and a credit ledger.
    pub fn new(contributions: Arc<C>, ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            contributions,
            ledger,
            clock,
        }
    }
}

fn map_contribution_error(error: ContributionPersistenceError) -> Error {
    match error {
        ContributionPersistenceError::Connection { message } => {
            Error::internal(format!("contribution repository unavailable: {message}"))
        }
        ContributionPersistenceError::Query { message } => {
            Error::internal(format!("contribution repository error: {message}"))
        }
        ContributionPersistenceError::Integrity { message } => {
            Error::internal(format!("contribution data is inconsistent: {message}"))
        }
    }
}

fn not_found(id: &ContributionId) -> Error {
    Error::not_found("Contribution not found").with_details(serde_json::json!({
        "contributionId": id.to_string(),
    }))
}

fn already_reviewed(err: AlreadyReviewed) -> Error {
    Error::invalid_state(err.to_string()).with_details(serde_json::json!({
        "status": err.current.as_str(),
    }))
}

impl<C, L> ContributionReviewService<C, L>
where
    C: ContributionRepository,
    L: CreditLedger,
{
    async fn commit(
        &self,
        contribution_id: ContributionId,
        reviewer_id: UserId,
        decision: ReviewDecision,
        outcome: ReviewOutcome,
    ) -> Result<Contribution, Error> {
        let current = self
            .contributions
            .find_by_id(&contribution_id)
            .await
            .map_err(map_contribution_error)?
            .ok_or_else(|| not_found(&contribution_id))?;
        current.status.transition(decision).map_err(already_reviewed)?;

        let record = ReviewRecord {
            contribution_id,
            reviewer_id,
            reviewed_at: self.clock.utc(),
            outcome,
        };
        match self
            .contributions
            .record_review(&record)
            .await
            .map_err(map_contribution_error)?
        {
            ReviewCommit::Applied(contribution) => Ok(contribution),
            ReviewCommit::Stale { current } => Err(already_reviewed(AlreadyReviewed { current })),
            ReviewCommit::Missing => Err(not_found(&contribution_id)),
        }
    }

    /// Award approval credits. Returns `false` when the ledger refused.
    async fn award_credits(&self, contribution: &Contribution) -> bool {
        let award = CreditAward {
            user_id: contribution.submitted_by,
            amount: contribution.credits_awarded,
            reason: CreditReason::ContributionApproved,
            provenance: CreditProvenance {
                pattern_id: contribution.pattern_id.clone(),
                implementation_id: contribution.implementation_id,
                contribution_id: contribution.id,
            },
            awarded_at: self.clock.utc(),
        };
        match self.ledger.award(&award).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    contribution_id = %contribution.id,
                    user_id = %contribution.submitted_by,
                    amount = award.amount,
                    error_kind = err.kind(),
                    error = %err,
                    "credit award failed after approval committed"
                );
                false
            }
        }
    }
}

#[async_trait]
impl<C, L> ContributionReview for ContributionReviewService<C, L>
where
    C: ContributionRepository,
    L: CreditLedger,
{
    async fn approve(
        &self,
        request: ApproveContributionRequest,
    ) -> Result<ApprovalReceipt, Error> {
        let outcome = ReviewOutcome::Approved {
            quality_score: request.quality_score,
            credits: APPROVAL_CREDITS,
        };
        let contribution = self
            .commit(
                request.contribution_id,
                request.reviewer_id,
                ReviewDecision::Approve,
                outcome,
            )
            .await?;
        info!(
            contribution_id = %contribution.id,
            reviewer_id = %request.reviewer_id,
            "contribution approved"
        );

        let awarded = self.award_credits(&contribution).await;
        Ok(ApprovalReceipt {
            user_id: contribution.submitted_by,
            credits_awarded: contribution.credits_awarded,
            credit_award_failed: !awarded,
        })
    }

    async fn reject(&self, request: RejectContributionRequest) -> Result<RejectionReceipt, Error> {
        let reason = rejection_reason_or_default(request.reason.as_deref());
        let contribution = self
            .commit(
                request.contribution_id,
                request.reviewer_id,
                ReviewDecision::Reject,
                ReviewOutcome::Rejected {
                    reason: reason.clone(),
                },
            )
            .await?;
        info!(
            contribution_id = %contribution.id,
            reviewer_id = %request.reviewer_id,
            "contribution rejected"
        );

        Ok(RejectionReceipt {
            user_id: contribution.submitted_by,
            reason,
        })
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
