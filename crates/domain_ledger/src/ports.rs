//! Ledger Domain Ports
//!
//! Read-side port for the transaction history. Writes never go through
//! this port: ledger entries are produced inside the atomic units of the
//! account and credit stores, so there is deliberately no standalone
//! `insert` here.

use async_trait::async_trait;

use core_kernel::{AccountId, DomainPort};

use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Query port for the immutable transaction history
#[async_trait]
pub trait LedgerStore: DomainPort {
    /// Returns every entry where the account is source or destination,
    /// ordered by posting time descending (most recent first). Entries
    /// posted in the same instant are ordered by their time-ordered id.
    async fn history_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Returns the full ledger, most recent first (admin snapshot)
    async fn list_all(&self) -> Result<Vec<Transaction>, LedgerError>;
}
