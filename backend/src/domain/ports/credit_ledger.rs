//! Driven port for recording credit awards.
use async_trait::async_trait;

use crate::domain::CreditAward;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credit ledger adapters.
    pub enum CreditLedgerError {
        /// Ledger backend could not be reached.
        Connection { message: String } => "credit ledger connection failed: {message}",
        /// The ledger refused or failed to write the entry.
        Write { message: String } => "credit ledger write failed: {message}",
    }
}

/// Append-only ledger of credit grants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Record a single award atomically.
    async fn award(&self, award: &CreditAward) -> Result<(), CreditLedgerError>;
}
