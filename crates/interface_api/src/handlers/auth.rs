//! Authentication handlers

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use core_kernel::Currency;
use domain_account::NewAccount;
use domain_customer::{NationalId, NewCustomer};

use crate::auth::{create_token, roles};
use crate::dto::customer::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::ApiError;
use crate::AppState;

/// Registers a new customer and opens their default account
///
/// The default account is a zero-balance TRY account; the password is
/// hashed before the customer record ever leaves this handler.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    request.validate()?;

    let national_id = request
        .national_id
        .as_deref()
        .map(NationalId::parse)
        .transpose()
        .map_err(domain_customer::CustomerError::from)?;

    let password_hash = state.hasher.hash(&request.password)?;

    let customer = state
        .customers
        .register(NewCustomer {
            national_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            birth_date: request.birth_date,
            address: request.address,
            password_hash,
        })
        .await?;

    let account = state
        .accounts
        .open(NewAccount {
            customer_id: customer.id,
            currency: Currency::TRY,
        })
        .await?;

    info!(customer = %customer.id, "customer registered");

    Ok(Json(RegisterResponse {
        customer_id: *customer.id.as_uuid(),
        account_number: account.number.to_string(),
        message: "Registration successful".to_string(),
    }))
}

/// Authenticates a customer and issues a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let customer = state
        .customers
        .find_by_email(&request.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !customer.is_active || !state.hasher.verify(&request.password, &customer.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let mut granted = vec![roles::CUSTOMER.to_string()];
    if state.config.is_admin(&customer.email) {
        granted.push(roles::ADMIN.to_string());
    }

    let token = create_token(
        &customer.id.as_uuid().to_string(),
        granted.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    info!(customer = %customer.id, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        customer_id: *customer.id.as_uuid(),
        first_name: customer.first_name,
        roles: granted,
    }))
}
