//! Ledger repository implementation
//!
//! Read side of the transaction history. Writes happen inside the atomic
//! units of the account and credit repositories.

use async_trait::async_trait;
use sqlx::PgPool;

use core_kernel::{AccountId, DomainPort};
use domain_ledger::{LedgerError, LedgerStore, Transaction};

use super::{db_err, TransactionRow, SELECT_TRANSACTION};

/// Repository for querying the immutable transaction history
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for LedgerRepository {}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn history_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_TRANSACTION} WHERE from_account = $1 OR to_account = $1 \
             ORDER BY posted_at DESC, transaction_id DESC"
        ))
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let entries = rows
            .into_iter()
            .map(TransactionRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_TRANSACTION} ORDER BY posted_at DESC, transaction_id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let entries = rows
            .into_iter()
            .map(TransactionRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
