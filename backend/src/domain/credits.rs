//! Credit award bookkeeping.
//!
//! Awards are append-only ledger entries; balances and spending live
//! elsewhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{ContributionId, ImplementationId, PatternId, UserId};

/// Reason code attached to a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditReason {
    ContributionApproved,
}

impl CreditReason {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContributionApproved => "contribution_approved",
        }
    }
}

/// Where an award came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditProvenance {
    pub pattern_id: PatternId,
    pub implementation_id: ImplementationId,
    pub contribution_id: ContributionId,
}

/// A single credit grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditAward {
    pub user_id: UserId,
    pub amount: u32,
    pub reason: CreditReason,
    pub provenance: CreditProvenance,
    pub awarded_at: DateTime<Utc>,
}

impl CreditAward {
    /// Provenance rendered as the JSON metadata stored with the ledger row.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use patternhub::domain::{
    ///     ContributionId, CreditAward, CreditProvenance, CreditReason, ImplementationId,
    ///     PatternId, UserId,
    /// };
    ///
    /// let award = CreditAward {
    ///     user_id: UserId::random(),
    ///     amount: 25,
    ///     reason: CreditReason::ContributionApproved,
    ///     provenance: CreditProvenance {
    ///         pattern_id: PatternId::new("CP-001").expect("valid"),
    ///         implementation_id: ImplementationId::random(),
    ///         contribution_id: ContributionId::random(),
    ///     },
    ///     awarded_at: Utc::now(),
    /// };
    /// assert_eq!(award.metadata()["patternId"], "CP-001");
    /// ```
    pub fn metadata(&self) -> Value {
        serde_json::to_value(&self.provenance).unwrap_or(Value::Null)
    }
}
