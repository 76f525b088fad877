//! API error handling
//!
//! Every domain error maps onto a specific HTTP status and a structured
//! `{ error, message }` body; nothing is swallowed into a bare 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::PortError;
use domain_account::AccountError;
use domain_credit::CreditError;
use domain_customer::CustomerError;
use domain_ledger::LedgerError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

fn from_port(error: PortError) -> ApiError {
    match error {
        PortError::NotFound { .. } => ApiError::NotFound(error.to_string()),
        PortError::Validation { .. } => ApiError::Validation(error.to_string()),
        PortError::Conflict { .. } => ApiError::Conflict(error.to_string()),
        PortError::Connection { .. } | PortError::Internal { .. } => {
            ApiError::Internal(error.to_string())
        }
    }
}

impl From<PortError> for ApiError {
    fn from(error: PortError) -> Self {
        from_port(error)
    }
}

impl From<CustomerError> for ApiError {
    fn from(error: CustomerError) -> Self {
        match error {
            CustomerError::NotFound(_) => ApiError::NotFound(error.to_string()),
            CustomerError::DuplicateIdentity(_) => ApiError::Conflict(error.to_string()),
            CustomerError::InvalidIdentity(_) => ApiError::Validation(error.to_string()),
            CustomerError::Store(port) => from_port(port),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::NotFound(_) => ApiError::NotFound(error.to_string()),
            AccountError::InsufficientFunds { .. }
            | AccountError::CurrencyMismatch { .. }
            | AccountError::InvalidAmount(_)
            | AccountError::SameAccount => ApiError::Validation(error.to_string()),
            AccountError::Ledger(ledger) => ledger.into(),
            AccountError::Store(port) => from_port(port),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::NonPositiveAmount(_) => ApiError::Validation(error.to_string()),
            LedgerError::AccountNotFound(_) => ApiError::NotFound(error.to_string()),
            LedgerError::Store(port) => from_port(port),
        }
    }
}

impl From<CreditError> for ApiError {
    fn from(error: CreditError) -> Self {
        match error {
            CreditError::NotFound(_) => ApiError::NotFound(error.to_string()),
            CreditError::AlreadyResolved(_) => ApiError::Conflict(error.to_string()),
            CreditError::NoDestinationAccount
            | CreditError::InvalidAmount(_)
            | CreditError::InvalidInstallments(_) => ApiError::Validation(error.to_string()),
            CreditError::Account(account) => account.into(),
            CreditError::Store(port) => from_port(port),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::Unauthorized,
            AuthError::Hashing(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_insufficient_funds_maps_to_validation() {
        let error: ApiError = AccountError::InsufficientFunds {
            balance: Decimal::ONE,
            requested: Decimal::TEN,
        }
        .into();
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_already_resolved_maps_to_conflict() {
        let error: ApiError =
            CreditError::AlreadyResolved(core_kernel::ApplicationId::new()).into();
        assert!(matches!(error, ApiError::Conflict(_)));
    }

    #[test]
    fn test_duplicate_identity_maps_to_conflict() {
        let error: ApiError =
            CustomerError::DuplicateIdentity("email x@y".to_string()).into();
        assert!(matches!(error, ApiError::Conflict(_)));
    }
}
