//! Implementation and contribution records plus the review state machine.
//!
//! An [`Implementation`] is the submitted content; a [`Contribution`] is the
//! review-tracking wrapper around exactly one implementation. Both carry a
//! [`ReviewStatus`] that must always agree.
//!
//! ```text
//!            approve
//!   pending ─────────▶ approved   (terminal)
//!      │
//!      └─────────────▶ rejected   (terminal)
//!            reject
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PatternId, UserId};

/// Credits granted to the author when a contribution is approved.
pub const APPROVAL_CREDITS: u32 = 25;

/// Reason recorded when a reviewer rejects without giving one.
pub const DEFAULT_REJECTION_REASON: &str = "No reason provided";

/// Lowest accepted quality score.
pub const QUALITY_SCORE_MIN: u8 = 1;
/// Highest accepted quality score.
pub const QUALITY_SCORE_MAX: u8 = 5;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $err:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse from the textual UUID form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, ContributionValidationError> {
                Uuid::parse_str(id.as_ref().trim())
                    .map(Self)
                    .map_err(|_| ContributionValidationError::InvalidId { field: $err })
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Validation errors for contribution values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContributionValidationError {
    #[error("{field} must be a valid UUID")]
    InvalidId { field: &'static str },
    #[error("quality score must be between {min} and {max}, got {value}")]
    QualityScoreOutOfRange { value: i64, min: u8, max: u8 },
    #[error("unknown review status: {value}")]
    UnknownStatus { value: String },
    #[error("implementation code must not be empty")]
    EmptyCode,
}

uuid_id!(
    /// Identifier of a submitted implementation.
    ImplementationId,
    "implementationId"
);

uuid_id!(
    /// Identifier of a contribution review record.
    ContributionId,
    "contributionId"
);

/// Review status shared by contributions and their implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Stable storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Approved and rejected are final.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply `decision`, failing when the status has already left `pending`.
    ///
    /// # Examples
    /// ```
    /// use patternhub::domain::{ReviewDecision, ReviewStatus};
    ///
    /// let next = ReviewStatus::Pending.transition(ReviewDecision::Approve);
    /// assert_eq!(next, Ok(ReviewStatus::Approved));
    ///
    /// let again = ReviewStatus::Approved.transition(ReviewDecision::Reject);
    /// assert!(again.is_err());
    /// ```
    pub fn transition(self, decision: ReviewDecision) -> Result<Self, AlreadyReviewed> {
        match self {
            Self::Pending => Ok(decision.target()),
            current => Err(AlreadyReviewed { current }),
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ContributionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ContributionValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// A reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    fn target(self) -> ReviewStatus {
        match self {
            Self::Approve => ReviewStatus::Approved,
            Self::Reject => ReviewStatus::Rejected,
        }
    }
}

/// Raised when a review is attempted on a contribution that already left
/// `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Contribution already {current}")]
pub struct AlreadyReviewed {
    pub current: ReviewStatus,
}

/// Reviewer-assigned quality score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct QualityScore(u8);

impl QualityScore {
    /// Validate and construct a [`QualityScore`].
    pub fn new(value: i64) -> Result<Self, ContributionValidationError> {
        let min = i64::from(QUALITY_SCORE_MIN);
        let max = i64::from(QUALITY_SCORE_MAX);
        if !(min..=max).contains(&value) {
            return Err(ContributionValidationError::QualityScoreOutOfRange {
                value,
                min: QUALITY_SCORE_MIN,
                max: QUALITY_SCORE_MAX,
            });
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ContributionValidationError::QualityScoreOutOfRange {
                value,
                min: QUALITY_SCORE_MIN,
                max: QUALITY_SCORE_MAX,
            })
    }

    /// The raw score.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for QualityScore {
    type Error = ContributionValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QualityScore> for u8 {
    fn from(value: QualityScore) -> Self {
        value.0
    }
}

/// Normalise a reviewer-supplied rejection reason, substituting
/// [`DEFAULT_REJECTION_REASON`] for missing or blank input.
pub fn rejection_reason_or_default(reason: Option<&str>) -> String {
    reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(DEFAULT_REJECTION_REASON)
        .to_owned()
}

/// Alternative language-tagged snippet attached to an implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub language: String,
    pub code: String,
}

/// Submitted code for a pattern.
///
/// `author_name` is a cached projection of the author's display name taken
/// at submission time; the user record remains authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implementation {
    pub id: ImplementationId,
    pub pattern_id: PatternId,
    pub author_id: Option<UserId>,
    pub author_name: Option<String>,
    pub code: String,
    pub alternative_code: Vec<CodeSnippet>,
    pub considerations: Vec<String>,
    pub variations: Vec<String>,
    pub status: ReviewStatus,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review-tracking record for one implementation submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub id: ContributionId,
    pub pattern_id: PatternId,
    pub implementation_id: ImplementationId,
    pub submitted_by: UserId,
    pub status: ReviewStatus,
    pub quality_score: Option<QualityScore>,
    pub reviewer_id: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub credits_awarded: u32,
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Outcome half of a [`ReviewRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Approved {
        quality_score: Option<QualityScore>,
        credits: u32,
    },
    Rejected {
        reason: String,
    },
}

impl ReviewOutcome {
    /// Status both rows move to.
    pub fn status(&self) -> ReviewStatus {
        match self {
            Self::Approved { .. } => ReviewStatus::Approved,
            Self::Rejected { .. } => ReviewStatus::Rejected,
        }
    }
}

/// The mutation a store applies when a review is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub contribution_id: ContributionId,
    pub reviewer_id: UserId,
    pub reviewed_at: DateTime<Utc>,
    pub outcome: ReviewOutcome,
}

impl Contribution {
    /// Project `record` onto this contribution.
    ///
    /// Used by stores to compute the post-review row; the caller is
    /// responsible for having checked the status guard.
    pub fn with_review(mut self, record: &ReviewRecord) -> Self {
        self.status = record.outcome.status();
        self.reviewer_id = Some(record.reviewer_id);
        self.reviewed_at = Some(record.reviewed_at);
        match &record.outcome {
            ReviewOutcome::Approved {
                quality_score,
                credits,
            } => {
                self.quality_score = *quality_score;
                self.credits_awarded = *credits;
            }
            ReviewOutcome::Rejected { reason } => {
                self.rejection_reason = Some(reason.clone());
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReviewDecision::Approve, ReviewStatus::Approved)]
    #[case(ReviewDecision::Reject, ReviewStatus::Rejected)]
    fn pending_moves_to_decision_target(
        #[case] decision: ReviewDecision,
        #[case] expected: ReviewStatus,
    ) {
        assert_eq!(ReviewStatus::Pending.transition(decision), Ok(expected));
    }

    #[rstest]
    #[case(ReviewStatus::Approved, ReviewDecision::Approve)]
    #[case(ReviewStatus::Approved, ReviewDecision::Reject)]
    #[case(ReviewStatus::Rejected, ReviewDecision::Approve)]
    #[case(ReviewStatus::Rejected, ReviewDecision::Reject)]
    fn terminal_states_refuse_every_decision(
        #[case] current: ReviewStatus,
        #[case] decision: ReviewDecision,
    ) {
        assert_eq!(current.transition(decision), Err(AlreadyReviewed { current }));
    }

    #[rstest]
    #[case(ReviewStatus::Approved, "Contribution already approved")]
    #[case(ReviewStatus::Rejected, "Contribution already rejected")]
    fn already_reviewed_message_names_status(
        #[case] current: ReviewStatus,
        #[case] expected: &str,
    ) {
        assert_eq!(AlreadyReviewed { current }.to_string(), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    fn quality_score_accepts_bounds(#[case] value: i64) {
        assert_eq!(QualityScore::new(value).map(QualityScore::get).ok(), u8::try_from(value).ok());
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-3)]
    fn quality_score_rejects_out_of_range(#[case] value: i64) {
        assert!(matches!(
            QualityScore::new(value),
            Err(ContributionValidationError::QualityScoreOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(None, DEFAULT_REJECTION_REASON)]
    #[case(Some("   "), DEFAULT_REJECTION_REASON)]
    #[case(Some(" Missing tests "), "Missing tests")]
    fn rejection_reason_defaults_when_blank(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(rejection_reason_or_default(input), expected);
    }

    #[rstest]
    fn status_round_trips_through_storage_strings() {
        for status in [
            ReviewStatus::Pending,
            ReviewStatus::Approved,
            ReviewStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ReviewStatus>(), Ok(status));
        }
        assert!("archived".parse::<ReviewStatus>().is_err());
    }

    #[rstest]
    fn invalid_ids_name_the_field() {
        let err = ContributionId::new("c1").expect_err("not a uuid");
        assert_eq!(err.to_string(), "contributionId must be a valid UUID");
    }
}
