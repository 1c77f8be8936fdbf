//! Contribution submission service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ContributionPersistenceError, ContributionRepository, ContributionSubmission,
    PatternRepository, PatternRepositoryError, SubmissionReceipt, SubmitImplementationRequest,
};
use crate::domain::{
    Contribution, ContributionId, ContributionValidationError, Error, Implementation,
    ImplementationId, ReviewStatus,
};

/// Service implementing [`ContributionSubmission`].
#[derive(Clone)]
pub struct ContributionSubmissionService<C, P> {
    contributions: Arc<C>,
    patterns: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> ContributionSubmissionService<C, P> {
    /// Create a service over the contribution store and pattern catalogue.
    pub fn new(contributions: Arc<C>, patterns: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            contributions,
            patterns,
            clock,
        }
    }
}

fn map_pattern_error(error: PatternRepositoryError) -> Error {
    match error {
        PatternRepositoryError::Connection { message } => {
            Error::internal(format!("pattern repository unavailable: {message}"))
        }
        PatternRepositoryError::Query { message } => {
            Error::internal(format!("pattern repository error: {message}"))
        }
    }
}

fn map_contribution_error(error: ContributionPersistenceError) -> Error {
    Error::internal(format!("failed to store submission: {error}"))
}

#[async_trait]
impl<C, P> ContributionSubmission for ContributionSubmissionService<C, P>
where
    C: ContributionRepository,
    P: PatternRepository,
{
    async fn submit(
        &self,
        request: SubmitImplementationRequest,
    ) -> Result<SubmissionReceipt, Error> {
        let SubmitImplementationRequest {
            author,
            pattern_id,
            code,
            alternative_code,
            considerations,
            variations,
            premium,
        } = request;

        if author.is_deleted() || !author.role.can_contribute() {
            return Err(Error::forbidden("Your account may not submit contributions"));
        }
        if code.trim().is_empty() {
            return Err(Error::invalid_request(
                ContributionValidationError::EmptyCode.to_string(),
            )
            .with_details(serde_json::json!({ "field": "code", "code": "empty_code" })));
        }
        self.patterns
            .find_by_id(&pattern_id)
            .await
            .map_err(map_pattern_error)?
            .ok_or_else(|| {
                Error::not_found(format!("Pattern {pattern_id} not found"))
                    .with_details(serde_json::json!({ "patternId": pattern_id.as_ref() }))
            })?;

        let now = self.clock.utc();
        let implementation = Implementation {
            id: ImplementationId::random(),
            pattern_id: pattern_id.clone(),
            author_id: Some(author.id),
            author_name: Some(author.display_name.to_string()),
            code,
            alternative_code,
            considerations,
            variations,
            status: ReviewStatus::Pending,
            premium,
            created_at: now,
            updated_at: now,
        };
        let contribution = Contribution {
            id: ContributionId::random(),
            pattern_id,
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
            .create_submission(&implementation, &contribution)
            .await
            .map_err(map_contribution_error)?;
        info!(
            contribution_id = %contribution.id,
            pattern_id = %contribution.pattern_id,
            user_id = %author.id,
            "contribution submitted"
        );

        Ok(SubmissionReceipt {
            contribution_id: contribution.id,
            implementation_id: implementation.id,
            status: contribution.status,
        })
    }
}
