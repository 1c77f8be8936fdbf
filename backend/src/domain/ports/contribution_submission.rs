//! Driving port for submitting implementations into the review queue.

use async_trait::async_trait;

use crate::domain::{
    CodeSnippet, ContributionId, Error, ImplementationId, PatternId, ReviewStatus, User,
};

/// A new implementation offered for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitImplementationRequest {
    pub author: User,
    pub pattern_id: PatternId,
    pub code: String,
    pub alternative_code: Vec<CodeSnippet>,
    pub considerations: Vec<String>,
    pub variations: Vec<String>,
    pub premium: bool,
}

/// Identifiers of the rows created by a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub contribution_id: ContributionId,
    pub implementation_id: ImplementationId,
    pub status: ReviewStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionSubmission: Send + Sync {
    /// Create a pending implementation and its contribution wrapper.
    async fn submit(&self, request: SubmitImplementationRequest)
    -> Result<SubmissionReceipt, Error>;
}
