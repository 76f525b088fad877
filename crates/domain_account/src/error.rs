//! Account domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{Currency, PortError};
use domain_ledger::LedgerError;

/// Errors that can occur in the account domain
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found by id or number
    #[error("Account not found: {0}")]
    NotFound(String),

    /// The balance does not cover the requested debit
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
    },

    /// Transfers require both accounts to share a currency
    #[error("Currency mismatch: cannot move {from} into {to}")]
    CurrencyMismatch { from: Currency, to: Currency },

    /// Amounts must be strictly positive
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    /// A transfer needs two distinct accounts
    #[error("Cannot transfer from an account to itself")]
    SameAccount,

    /// Ledger entry creation failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Storage-level failure
    #[error(transparent)]
    Store(#[from] PortError),
}
