//! Account handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::{Currency, CustomerId};
use domain_account::NewAccount;

use crate::dto::account::{AccountResponse, CreateAccountRequest};
use crate::error::ApiError;
use crate::AppState;

/// Opens a new zero-balance account in the requested currency
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let currency: Currency = request
        .currency
        .parse()
        .map_err(|e: core_kernel::MoneyError| ApiError::Validation(e.to_string()))?;

    let account = state
        .accounts
        .open(NewAccount {
            customer_id: CustomerId::from(request.customer_id),
            currency,
        })
        .await?;

    Ok(Json(account.into()))
}

/// Lists a customer's accounts, earliest opened first
pub async fn list_for_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state
        .accounts
        .list_for_customer(CustomerId::from(customer_id))
        .await?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}
