//! Customer domain errors

use thiserror::Error;

use core_kernel::PortError;

use crate::identity::IdentityError;

/// Errors that can occur in the customer domain
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Customer not found
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// National id or email already registered
    #[error("Duplicate identity: {0} is already registered")]
    DuplicateIdentity(String),

    /// Malformed national identity number
    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),

    /// Storage-level failure
    #[error(transparent)]
    Store(#[from] PortError),
}
