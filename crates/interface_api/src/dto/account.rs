//! Account DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_account::Account;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub customer_id: Uuid,
    /// ISO 4217 code, e.g. "TRY"
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub account_number: String,
    pub currency: String,
    pub balance: Decimal,
    pub is_active: bool,
    pub opened_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: (*account.id.as_uuid()),
            customer_id: (*account.customer_id.as_uuid()),
            account_number: account.number.to_string(),
            currency: account.currency().code().to_string(),
            balance: account.balance.amount(),
            is_active: account.is_active,
            opened_at: account.opened_at,
        }
    }
}
