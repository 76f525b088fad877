//! Money movement handlers
//!
//! Thin adapters over the account store; every balance check, currency
//! check, and atomicity guarantee lives behind the port.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::AccountId;
use domain_account::AccountNumber;

use crate::dto::transaction::{
    DepositRequest, TransactionResponse, TransferRequest, WithdrawRequest,
};
use crate::error::ApiError;
use crate::AppState;

/// Moves funds between two accounts
pub async fn transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let entry = state
        .accounts
        .transfer(
            &AccountNumber::from(request.from_account),
            &AccountNumber::from(request.to_account),
            request.amount,
            request.description,
        )
        .await?;

    Ok(Json(entry.into()))
}

/// Deposits funds into an account
pub async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let entry = state
        .accounts
        .deposit(
            &AccountNumber::from(request.to_account),
            request.amount,
            request.description,
        )
        .await?;

    Ok(Json(entry.into()))
}

/// Withdraws funds from an account
pub async fn withdraw(
    State(state): State<AppState>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let entry = state
        .accounts
        .withdraw(
            &AccountNumber::from(request.from_account),
            request.amount,
            request.description,
        )
        .await?;

    Ok(Json(entry.into()))
}

/// Returns an account's transaction history, most recent first
pub async fn history_for_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let history = state
        .ledger
        .history_for_account(AccountId::from(account_id))
        .await?;

    Ok(Json(history.into_iter().map(TransactionResponse::from).collect()))
}
