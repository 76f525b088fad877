//! Admin handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::dto::account::AccountResponse;
use crate::dto::credit::CreditApplicationResponse;
use crate::dto::customer::CustomerResponse;
use crate::dto::transaction::TransactionResponse;
use crate::error::ApiError;
use crate::AppState;

/// Everything at once, for the admin dashboard
#[derive(Debug, Serialize)]
pub struct DatabaseSnapshot {
    pub customers: Vec<CustomerResponse>,
    pub accounts: Vec<AccountResponse>,
    pub transactions: Vec<TransactionResponse>,
    pub credit_applications: Vec<CreditApplicationResponse>,
}

/// Returns all customers, accounts, transactions, and applications in
/// one response (admin)
pub async fn database_snapshot(
    State(state): State<AppState>,
) -> Result<Json<DatabaseSnapshot>, ApiError> {
    let customers = state.customers.list_all().await?;
    let accounts = state.accounts.list_all().await?;
    let transactions = state.ledger.list_all().await?;
    let credit_applications = state.credit.list_all().await?;

    Ok(Json(DatabaseSnapshot {
        customers: customers.into_iter().map(Into::into).collect(),
        accounts: accounts.into_iter().map(Into::into).collect(),
        transactions: transactions.into_iter().map(Into::into).collect(),
        credit_applications: credit_applications.into_iter().map(Into::into).collect(),
    }))
}
