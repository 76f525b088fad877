//! Money movement DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_ledger::Transaction;

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_account: String,
    pub to_account: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub to_account: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub from_account: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    /// Debited account, absent for deposits
    pub from_account_id: Option<Uuid>,
    /// Credited account, absent for withdrawals
    pub to_account_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: String,
    /// TRANSFER, DEPOSIT, or WITHDRAW
    pub transaction_type: String,
    /// COMPLETED or FAILED
    pub status: String,
    pub description: Option<String>,
    pub posted_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(entry: Transaction) -> Self {
        Self {
            id: (*entry.id.as_uuid()),
            from_account_id: entry.kind.source().map(Uuid::from),
            to_account_id: entry.kind.destination().map(Uuid::from),
            amount: entry.amount,
            currency: entry.currency.code().to_string(),
            transaction_type: entry.kind.type_tag().to_string(),
            status: entry.status.as_str().to_string(),
            description: entry.description,
            posted_at: entry.posted_at,
        }
    }
}
