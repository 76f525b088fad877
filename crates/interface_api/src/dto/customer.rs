//! Customer and authentication DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_customer::Customer;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Optional; a collision-checked one is generated when absent
    pub national_id: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub customer_id: Uuid,
    /// Number of the default account opened at registration
    pub account_number: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub customer_id: Uuid,
    pub first_name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub registered_on: NaiveDate,
    pub is_active: bool,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: (*customer.id.as_uuid()),
            national_id: customer.national_id.to_string(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone: customer.phone,
            registered_on: customer.registered_on,
            is_active: customer.is_active,
        }
    }
}
