//! PostgreSQL-backed credit ledger appending `credit_transactions` rows.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::CreditAward;
use crate::domain::ports::{CreditLedger, CreditLedgerError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewCreditTransactionRow;
use super::pool::DbPool;
use super::schema::credit_transactions;

/// Diesel-backed implementation of the credit ledger port.
#[derive(Clone)]
pub struct DieselCreditLedger {
    pool: DbPool,
}

impl DieselCreditLedger {
    /// Create a ledger over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn ledger_row(award: &CreditAward) -> Result<NewCreditTransactionRow<'_>, CreditLedgerError> {
    let amount = i32::try_from(award.amount)
        .map_err(|_| CreditLedgerError::write(format!("award amount {} too large", award.amount)))?;
    Ok(NewCreditTransactionRow {
        id: Uuid::new_v4(),
        user_id: *award.user_id.as_uuid(),
        amount,
        reason: award.reason.as_str(),
        metadata: award.metadata(),
        created_at: award.awarded_at,
    })
}

#[async_trait]
impl CreditLedger for DieselCreditLedger {
    async fn award(&self, award: &CreditAward) -> Result<(), CreditLedgerError> {
        let row = ledger_row(award)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CreditLedgerError::connection))?;

        diesel::insert_into(credit_transactions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(
                    err,
                    "append credit transaction",
                    CreditLedgerError::write,
                    CreditLedgerError::connection,
                )
            })?;

        Ok(())
    }
}
