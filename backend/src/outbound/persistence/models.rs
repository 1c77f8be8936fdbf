//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain aggregates live in
//! the repository that reads them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{contributions, credit_transactions, implementations, pattern_definitions, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub identity_id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub identity_id: &'a str,
    pub email: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an identity event refreshes a user.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileUpdate<'a> {
    pub email: &'a str,
    pub display_name: &'a str,
    pub role: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pattern definitions
// ---------------------------------------------------------------------------

/// Row struct for reading from the pattern_definitions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pattern_definitions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatternDefinitionRow {
    pub id: String,
    pub category: String,
    pub title: String,
    pub problem: String,
    pub usage: String,
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// Row struct for reading from the implementations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = implementations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ImplementationRow {
    pub id: Uuid,
    pub pattern_id: String,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub code: String,
    pub alternative_code: serde_json::Value,
    pub considerations: Vec<String>,
    pub variations: Vec<String>,
    pub status: String,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new submissions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = implementations)]
pub(crate) struct NewImplementationRow<'a> {
    pub id: Uuid,
    pub pattern_id: &'a str,
    pub author_id: Option<Uuid>,
    pub author_name: Option<&'a str>,
    pub code: &'a str,
    pub alternative_code: serde_json::Value,
    pub considerations: &'a [String],
    pub variations: &'a [String],
    pub status: &'a str,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Contributions
// ---------------------------------------------------------------------------

/// Row struct for reading from the contributions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contributions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContributionRow {
    pub id: Uuid,
    pub pattern_id: String,
    pub implementation_id: Uuid,
    pub submitted_by: Uuid,
    pub status: String,
    pub quality_score: Option<i16>,
    pub reviewer_id: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub credits_awarded: i32,
    pub rejection_reason: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Insertable struct for new contribution wrappers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contributions)]
pub(crate) struct NewContributionRow<'a> {
    pub id: Uuid,
    pub pattern_id: &'a str,
    pub implementation_id: Uuid,
    pub submitted_by: Uuid,
    pub status: &'a str,
    pub credits_awarded: i32,
    pub submitted_at: DateTime<Utc>,
}

/// Review columns written by the guarded status transition.
///
/// `None` writes SQL `NULL`; the row is still pending when this applies, so
/// the review columns are empty beforehand.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contributions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ContributionReviewUpdate<'a> {
    pub status: &'a str,
    pub quality_score: Option<i16>,
    pub reviewer_id: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub credits_awarded: i32,
    pub rejection_reason: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Credit ledger
// ---------------------------------------------------------------------------

/// Insertable ledger entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credit_transactions)]
pub(crate) struct NewCreditTransactionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i32,
    pub reason: &'a str,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
