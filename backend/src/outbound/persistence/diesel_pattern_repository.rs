//! PostgreSQL-backed read adapter for the seeded pattern catalogue.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PatternRepository, PatternRepositoryError};
use crate::domain::{PatternDefinition, PatternId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::PatternDefinitionRow;
use super::pool::DbPool;
use super::schema::pattern_definitions;

/// Diesel-backed implementation of the pattern repository port.
#[derive(Clone)]
pub struct DieselPatternRepository {
    pool: DbPool,
}

impl DieselPatternRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_definition(row: PatternDefinitionRow) -> Result<PatternDefinition, PatternRepositoryError> {
    let id = PatternId::new(row.id.as_str()).map_err(|err| {
        PatternRepositoryError::query(format!("stored pattern id {:?} is invalid: {err}", row.id))
    })?;
    Ok(PatternDefinition {
        id,
        category: row.category,
        title: row.title,
        problem: row.problem,
        usage: row.usage,
    })
}

#[async_trait]
impl PatternRepository for DieselPatternRepository {
    async fn find_by_id(
        &self,
        id: &PatternId,
    ) -> Result<Option<PatternDefinition>, PatternRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PatternRepositoryError::connection))?;

        let row = pattern_definitions::table
            .find(id.as_ref())
            .select(PatternDefinitionRow::as_select())
            .first::<PatternDefinitionRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(
                    err,
                    "find pattern",
                    PatternRepositoryError::query,
                    PatternRepositoryError::connection,
                )
            })?;

        row.map(row_to_definition).transpose()
    }
}
