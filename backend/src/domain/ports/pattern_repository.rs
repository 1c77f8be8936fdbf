//! Read-only port over the seeded pattern catalogue.
use async_trait::async_trait;

use crate::domain::{PatternDefinition, PatternId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pattern catalogue adapters.
    pub enum PatternRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "pattern repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "pattern repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatternRepository: Send + Sync {
    /// Look up a pattern definition by its catalogue code.
    async fn find_by_id(
        &self,
        id: &PatternId,
    ) -> Result<Option<PatternDefinition>, PatternRepositoryError>;
}
