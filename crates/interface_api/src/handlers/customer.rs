//! Customer handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::CustomerId;

use crate::dto::customer::CustomerResponse;
use crate::error::ApiError;
use crate::AppState;

/// Lists all customers (admin)
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.customers.list_all().await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

/// Deactivates a customer (admin)
///
/// Customers are never physically deleted; this clears the active flag,
/// which also blocks future logins.
pub async fn deactivate_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id = CustomerId::from(customer_id);
    state.customers.deactivate(customer_id).await?;
    let customer = state.customers.get(customer_id).await?;
    Ok(Json(customer.into()))
}
