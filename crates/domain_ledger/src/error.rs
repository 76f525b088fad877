//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Ledger entries must move a strictly positive amount
    #[error("Transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Account not found when resolving an entry endpoint
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Storage-level failure
    #[error(transparent)]
    Store(#[from] PortError),
}
