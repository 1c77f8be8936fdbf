//! PostgreSQL-backed contribution and implementation adapter.
//!
//! Both rows of a review move inside one transaction. The contribution update
//! is guarded on `status = 'pending'`, so a concurrent reviewer that loses the
//! race sees zero affected rows and gets the winner's status back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ContributionPersistenceError, ContributionRepository, ReviewCommit};
use crate::domain::{
    CodeSnippet, Contribution, ContributionId, Implementation, ImplementationId, PatternId,
    QualityScore, ReviewOutcome, ReviewRecord, ReviewStatus, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    ContributionReviewUpdate, ContributionRow, ImplementationRow, NewContributionRow,
    NewImplementationRow,
};
use super::pool::DbPool;
use super::schema::{contributions, implementations};

/// Diesel-backed implementation of the contribution repository port.
#[derive(Clone)]
pub struct DieselContributionRepository {
    pool: DbPool,
}

impl DieselContributionRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        ContributionPersistenceError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ContributionPersistenceError::connection))
    }
}

/// Failures raised inside the review transaction. Any of them rolls back.
#[derive(Debug, thiserror::Error)]
enum ReviewTxError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),
    #[error("implementation {0} for the reviewed contribution is missing")]
    MissingImplementation(Uuid),
}

fn map_error(error: diesel::result::Error, operation: &'static str) -> ContributionPersistenceError {
    map_diesel_error(
        error,
        operation,
        ContributionPersistenceError::query,
        ContributionPersistenceError::connection,
    )
}

fn parse_status(raw: &str) -> Result<ReviewStatus, ContributionPersistenceError> {
    raw.parse::<ReviewStatus>()
        .map_err(|err| ContributionPersistenceError::integrity(err.to_string()))
}

fn parse_pattern_id(raw: &str) -> Result<PatternId, ContributionPersistenceError> {
    PatternId::new(raw).map_err(|err| {
        ContributionPersistenceError::integrity(format!("stored pattern id {raw:?}: {err}"))
    })
}

fn row_to_contribution(row: ContributionRow) -> Result<Contribution, ContributionPersistenceError> {
    let quality_score = row
        .quality_score
        .map(|score| QualityScore::new(i64::from(score)))
        .transpose()
        .map_err(|err| ContributionPersistenceError::integrity(err.to_string()))?;
    let credits_awarded = u32::try_from(row.credits_awarded).map_err(|_| {
        ContributionPersistenceError::integrity(format!(
            "negative credits on contribution {}",
            row.id
        ))
    })?;
    Ok(Contribution {
        id: ContributionId::from_uuid(row.id),
        pattern_id: parse_pattern_id(&row.pattern_id)?,
        implementation_id: ImplementationId::from_uuid(row.implementation_id),
        submitted_by: UserId::from_uuid(row.submitted_by),
        status: parse_status(&row.status)?,
        quality_score,
        reviewer_id: row.reviewer_id.map(UserId::from_uuid),
        reviewed_at: row.reviewed_at,
        credits_awarded,
        rejection_reason: row.rejection_reason,
        submitted_at: row.submitted_at,
    })
}

fn row_to_implementation(
    row: ImplementationRow,
) -> Result<Implementation, ContributionPersistenceError> {
    let alternative_code: Vec<CodeSnippet> = serde_json::from_value(row.alternative_code)
        .map_err(|err| {
            ContributionPersistenceError::integrity(format!(
                "alternative code of implementation {}: {err}",
                row.id
            ))
        })?;
    Ok(Implementation {
        id: ImplementationId::from_uuid(row.id),
        pattern_id: parse_pattern_id(&row.pattern_id)?,
        author_id: row.author_id.map(UserId::from_uuid),
        author_name: row.author_name,
        code: row.code,
        alternative_code,
        considerations: row.considerations,
        variations: row.variations,
        status: parse_status(&row.status)?,
        premium: row.premium,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn review_update(
    record: &ReviewRecord,
) -> Result<ContributionReviewUpdate<'_>, ContributionPersistenceError> {
    let (quality_score, credits, reason) = match &record.outcome {
        ReviewOutcome::Approved {
            quality_score,
            credits,
        } => (
            quality_score.map(|score| i16::from(score.get())),
            *credits,
            None,
        ),
        ReviewOutcome::Rejected { reason } => (None, 0, Some(reason.as_str())),
    };
    Ok(ContributionReviewUpdate {
        status: record.outcome.status().as_str(),
        quality_score,
        reviewer_id: Some(*record.reviewer_id.as_uuid()),
        reviewed_at: Some(record.reviewed_at),
        credits_awarded: credits_column(credits)?,
        rejection_reason: reason,
    })
}

fn credits_column(credits: u32) -> Result<i32, ContributionPersistenceError> {
    i32::try_from(credits).map_err(|_| ContributionPersistenceError::query("credits out of range"))
}

/// Raw transaction result before status strings are parsed.
enum RawCommit {
    Applied(ContributionRow),
    Stale(String),
    Missing,
}

#[async_trait]
impl ContributionRepository for DieselContributionRepository {
    async fn find_by_id(
        &self,
        id: &ContributionId,
    ) -> Result<Option<Contribution>, ContributionPersistenceError> {
        let mut conn = self.connection().await?;
        let row = contributions::table
            .find(*id.as_uuid())
            .select(ContributionRow::as_select())
            .first::<ContributionRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_error(err, "find contribution"))?;
        row.map(row_to_contribution).transpose()
    }

    async fn find_implementation(
        &self,
        id: &ImplementationId,
    ) -> Result<Option<Implementation>, ContributionPersistenceError> {
        let mut conn = self.connection().await?;
        let row = implementations::table
            .find(*id.as_uuid())
            .select(ImplementationRow::as_select())
            .first::<ImplementationRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_error(err, "find implementation"))?;
        row.map(row_to_implementation).transpose()
    }

    async fn record_review(
        &self,
        record: &ReviewRecord,
    ) -> Result<ReviewCommit, ContributionPersistenceError> {
        let mut conn = self.connection().await?;
        let contribution_id = *record.contribution_id.as_uuid();
        let changes = review_update(record)?;
        let status = changes.status;
        let reviewed_at = record.reviewed_at;

        let raw = conn
            .transaction::<_, ReviewTxError, _>(|conn| {
                async move {
                    let updated = diesel::update(
                        contributions::table
                            .filter(contributions::id.eq(contribution_id))
                            .filter(contributions::status.eq(ReviewStatus::Pending.as_str())),
                    )
                    .set(&changes)
                    .returning(ContributionRow::as_returning())
                    .get_result::<ContributionRow>(conn)
                    .await
                    .optional()?;

                    let Some(row) = updated else {
                        let current = contributions::table
                            .find(contribution_id)
                            .select(contributions::status)
                            .first::<String>(conn)
                            .await
                            .optional()?;
                        return Ok(current.map_or(RawCommit::Missing, RawCommit::Stale));
                    };

                    let affected = diesel::update(implementations::table.find(row.implementation_id))
                        .set((
                            implementations::status.eq(status),
                            implementations::updated_at.eq(reviewed_at),
                        ))
                        .execute(conn)
                        .await?;
                    if affected == 0 {
                        return Err(ReviewTxError::MissingImplementation(row.implementation_id));
                    }

                    Ok(RawCommit::Applied(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match err {
                ReviewTxError::Diesel(error) => map_error(error, "record review"),
                missing @ ReviewTxError::MissingImplementation(_) => {
                    ContributionPersistenceError::integrity(missing.to_string())
                }
            })?;

        match raw {
            RawCommit::Applied(row) => row_to_contribution(row).map(ReviewCommit::Applied),
            RawCommit::Stale(current) => Ok(ReviewCommit::Stale {
                current: parse_status(&current)?,
            }),
            RawCommit::Missing => Ok(ReviewCommit::Missing),
        }
    }

    async fn create_submission(
        &self,
        implementation: &Implementation,
        contribution: &Contribution,
    ) -> Result<(), ContributionPersistenceError> {
        let alternative_code = serde_json::to_value(&implementation.alternative_code)
            .map_err(|err| ContributionPersistenceError::query(err.to_string()))?;
        let credits_awarded = credits_column(contribution.credits_awarded)?;
        let implementation_row = NewImplementationRow {
            id: *implementation.id.as_uuid(),
            pattern_id: implementation.pattern_id.as_ref(),
            author_id: implementation.author_id.map(|id| *id.as_uuid()),
            author_name: implementation.author_name.as_deref(),
            code: implementation.code.as_str(),
            alternative_code,
            considerations: &implementation.considerations,
            variations: &implementation.variations,
            status: implementation.status.as_str(),
            premium: implementation.premium,
            created_at: implementation.created_at,
            updated_at: implementation.updated_at,
        };
        let contribution_row = NewContributionRow {
            id: *contribution.id.as_uuid(),
            pattern_id: contribution.pattern_id.as_ref(),
            implementation_id: *contribution.implementation_id.as_uuid(),
            submitted_by: *contribution.submitted_by.as_uuid(),
            status: contribution.status.as_str(),
            credits_awarded,
            submitted_at: contribution.submitted_at,
        };

        let mut conn = self.connection().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(implementations::table)
                    .values(&implementation_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(contributions::table)
                    .values(&contribution_row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_error(err, "create submission"))
    }
}
