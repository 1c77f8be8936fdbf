//! Contribution submission and admin review handlers.
//!
//! ```text
//! POST /api/v1/contributions
//! POST /api/v1/admin/contributions/approve
//! POST /api/v1/admin/contributions/reject
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    ApprovalReceipt, ApproveContributionRequest, RejectContributionRequest, RejectionReceipt,
    SubmissionReceipt, SubmitImplementationRequest,
};
use crate::domain::{CodeSnippet, ContributionId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerIdentity, require_admin, require_caller};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, empty_field_error, parse_pattern_id, parse_quality_score, parse_uuid, require,
};

const CONTRIBUTION_ID: FieldName = FieldName::new("contributionId");

fn parse_contribution_id(value: Option<String>) -> ApiResult<ContributionId> {
    let raw = require(value, CONTRIBUTION_ID)?;
    parse_uuid(raw, CONTRIBUTION_ID).map(ContributionId::from_uuid)
}

/// Request payload for approving a contribution.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveContributionBody {
    #[schema(format = "uuid")]
    pub contribution_id: Option<String>,
    /// Optional reviewer score, an integer from 1 to 5.
    #[schema(minimum = 1, maximum = 5)]
    pub quality_score: Option<i64>,
}

/// Response payload for an approval.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveContributionResponseBody {
    pub success: bool,
    pub credits_awarded: u32,
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Present and `true` when the approval committed but credits were not
    /// recorded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub credit_award_failed: bool,
}

impl From<ApprovalReceipt> for ApproveContributionResponseBody {
    fn from(value: ApprovalReceipt) -> Self {
        Self {
            success: true,
            credits_awarded: value.credits_awarded,
            user_id: value.user_id.to_string(),
            credit_award_failed: value.credit_award_failed,
        }
    }
}

/// Request payload for rejecting a contribution.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectContributionBody {
    #[schema(format = "uuid")]
    pub contribution_id: Option<String>,
    pub reason: Option<String>,
}

/// Response payload for a rejection.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectContributionResponseBody {
    pub success: bool,
    #[schema(format = "uuid")]
    pub user_id: String,
    pub reason: String,
}

impl From<RejectionReceipt> for RejectContributionResponseBody {
    fn from(value: RejectionReceipt) -> Self {
        Self {
            success: true,
            user_id: value.user_id.to_string(),
            reason: value.reason,
        }
    }
}

/// Alternative snippet in another language.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippetBody {
    pub language: String,
    pub code: String,
}

/// Request payload for submitting an implementation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContributionBody {
    pub pattern_id: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub alternative_code: Vec<CodeSnippetBody>,
    #[serde(default)]
    pub considerations: Vec<String>,
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub premium: bool,
}

/// Response payload for a submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContributionResponseBody {
    pub success: bool,
    #[schema(format = "uuid")]
    pub contribution_id: String,
    #[schema(format = "uuid")]
    pub implementation_id: String,
    #[schema(example = "pending")]
    pub status: String,
}

impl From<SubmissionReceipt> for SubmitContributionResponseBody {
    fn from(value: SubmissionReceipt) -> Self {
        Self {
            success: true,
            contribution_id: value.contribution_id.to_string(),
            implementation_id: value.implementation_id.to_string(),
            status: value.status.as_str().to_owned(),
        }
    }
}

/// Approve a pending contribution and award credits to its author.
#[utoipa::path(
    post,
    path = "/api/v1/admin/contributions/approve",
    request_body = ApproveContributionBody,
    responses(
        (status = 200, description = "Contribution approved", body = ApproveContributionResponseBody),
        (status = 400, description = "Invalid request or contribution already reviewed", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Contribution not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "approveContribution",
    security(("BearerAuth" = []))
)]
#[post("/admin/contributions/approve")]
pub async fn approve_contribution(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<ApproveContributionBody>,
) -> ApiResult<web::Json<ApproveContributionResponseBody>> {
    let reviewer = require_admin(&state, &identity).await?;
    let ApproveContributionBody {
        contribution_id,
        quality_score,
    } = payload.into_inner();
    let request = ApproveContributionRequest {
        contribution_id: parse_contribution_id(contribution_id)?,
        reviewer_id: reviewer.id,
        quality_score: parse_quality_score(quality_score, FieldName::new("qualityScore"))?,
    };

    let receipt = state.review.approve(request).await?;
    Ok(web::Json(receipt.into()))
}

/// Reject a pending contribution.
#[utoipa::path(
    post,
    path = "/api/v1/admin/contributions/reject",
    request_body = RejectContributionBody,
    responses(
        (status = 200, description = "Contribution rejected", body = RejectContributionResponseBody),
        (status = 400, description = "Invalid request or contribution already reviewed", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Contribution not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "rejectContribution",
    security(("BearerAuth" = []))
)]
#[post("/admin/contributions/reject")]
pub async fn reject_contribution(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<RejectContributionBody>,
) -> ApiResult<web::Json<RejectContributionResponseBody>> {
    let reviewer = require_admin(&state, &identity).await?;
    let RejectContributionBody {
        contribution_id,
        reason,
    } = payload.into_inner();
    let request = RejectContributionRequest {
        contribution_id: parse_contribution_id(contribution_id)?,
        reviewer_id: reviewer.id,
        reason,
    };

    let receipt = state.review.reject(request).await?;
    Ok(web::Json(receipt.into()))
}

/// Submit an implementation for review.
#[utoipa::path(
    post,
    path = "/api/v1/contributions",
    request_body = SubmitContributionBody,
    responses(
        (status = 201, description = "Submission queued for review", body = SubmitContributionResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Account may not contribute", body = ErrorSchema),
        (status = 404, description = "Pattern not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["contributions"],
    operation_id = "submitContribution",
    security(("BearerAuth" = []))
)]
#[post("/contributions")]
pub async fn submit_contribution(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<SubmitContributionBody>,
) -> ApiResult<HttpResponse> {
    let author = require_caller(&state, &identity).await?;
    let SubmitContributionBody {
        pattern_id,
        code,
        alternative_code,
        considerations,
        variations,
        premium,
    } = payload.into_inner();

    let pattern_field = FieldName::new("patternId");
    let pattern_id = parse_pattern_id(require(pattern_id, pattern_field)?, pattern_field)?;
    let code_field = FieldName::new("code");
    let code = require(code, code_field)?;
    if code.trim().is_empty() {
        return Err(empty_field_error(code_field));
    }

    let receipt = state
        .submission
        .submit(SubmitImplementationRequest {
            author,
            pattern_id,
            code,
            alternative_code: alternative_code
                .into_iter()
                .map(|snippet| CodeSnippet {
                    language: snippet.language,
                    code: snippet.code,
                })
                .collect(),
            considerations,
            variations,
            premium,
        })
        .await?;

    Ok(HttpResponse::Created().json(SubmitContributionResponseBody::from(receipt)))
}

#[cfg(test)]
#[path = "contributions_tests.rs"]
mod tests;
