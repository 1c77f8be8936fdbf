//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and
//! persistence adapters, the ports those adapters implement, and the
//! services that drive the review and identity-sync workflows. Nothing here
//! depends on Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Contribution, Implementation, PatternDefinition: aggregates.
//! - ContributionReviewService, IdentitySyncService, UserAccountService,
//!   ContributionSubmissionService: driving-port implementations.

pub mod auth;
pub mod contribution;
pub mod credits;
pub mod error;
pub mod identity_event;
pub mod identity_sync_service;
pub mod pattern;
pub mod ports;
pub mod profile_service;
pub mod review_service;
pub mod submission_service;
pub mod trace_id;
pub mod user;
pub mod webhook_signature;

pub use self::auth::VerifiedIdentity;
pub use self::contribution::{
    APPROVAL_CREDITS, AlreadyReviewed, CodeSnippet, Contribution, ContributionId,
    ContributionValidationError, DEFAULT_REJECTION_REASON, Implementation, ImplementationId,
    QUALITY_SCORE_MAX, QUALITY_SCORE_MIN, QualityScore, ReviewDecision, ReviewOutcome,
    ReviewRecord, ReviewStatus, rejection_reason_or_default,
};
pub use self::credits::{CreditAward, CreditProvenance, CreditReason};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_event::{
    DeletedProviderUser, IdentityEvent, IdentityEventError, ProviderEmail, ProviderUser,
    USER_CREATED, USER_DELETED, USER_UPDATED,
};
pub use self::identity_sync_service::{DeletionPolicy, IdentitySyncService, UnknownDeletionPolicy};
pub use self::pattern::{PATTERN_ID_MAX, PatternDefinition, PatternId, PatternIdValidationError};
pub use self::profile_service::{PROFILE_CACHE_TTL, UserAccountService};
pub use self::review_service::ContributionReviewService;
pub use self::submission_service::ContributionSubmissionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, IdentityId, User, UserId, UserProfile, UserRole,
    UserValidationError,
};
pub use self::webhook_signature::{
    TIMESTAMP_TOLERANCE_SECONDS, WebhookHeaders, WebhookSecret, WebhookSecretError,
    WebhookSignatureError, verify_webhook_signature,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use patternhub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
