//! Credit domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{ApplicationId, PortError};
use domain_account::AccountError;

/// Errors that can occur in the credit domain
#[derive(Debug, Error)]
pub enum CreditError {
    /// Application or customer not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The application has already left the pending state
    #[error("Application {0} has already been resolved")]
    AlreadyResolved(ApplicationId),

    /// Manual approval needs an account to disburse into
    #[error("Customer has no account to receive the disbursement")]
    NoDestinationAccount,

    /// Requested amounts must be strictly positive
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    /// At least one installment is required
    #[error("Invalid installment count: {0}")]
    InvalidInstallments(u32),

    /// Disbursement failed at the account level
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Storage-level failure
    #[error(transparent)]
    Store(#[from] PortError),
}
