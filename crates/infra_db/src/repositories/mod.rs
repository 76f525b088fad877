//! Repository implementations for the domain store ports
//!
//! One repository per port, each a thin struct over the shared pool.
//! Row structs and the helpers used by more than one repository live
//! here; money-movement helpers take a `PgConnection` so they run inside
//! whatever transaction the caller opened.

pub mod customer;
pub mod account;
pub mod ledger;
pub mod credit;

pub use account::AccountRepository;
pub use credit::CreditRepository;
pub use customer::CustomerRepository;
pub use ledger::LedgerRepository;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::FromRow;
use uuid::Uuid;

use core_kernel::{AccountId, Currency, CustomerId, Money, PortError};
use domain_account::{Account, AccountNumber};
use domain_ledger::{Transaction, TransactionKind, TransactionStatus};

use crate::error::DatabaseError;

/// Maps a raw SQLx failure onto the storage-port error
pub(crate) fn db_err(error: sqlx::Error) -> PortError {
    DatabaseError::from(error).into()
}

pub(crate) fn decode_err(message: impl std::fmt::Display) -> PortError {
    PortError::from(DatabaseError::SerializationError(message.to_string()))
}

/// Database row for an account
#[derive(Debug, Clone, FromRow)]
pub(crate) struct AccountRow {
    pub account_id: Uuid,
    pub customer_id: Uuid,
    pub account_number: String,
    pub currency: String,
    pub balance: Decimal,
    pub is_active: bool,
    pub opened_at: DateTime<Utc>,
}

impl AccountRow {
    pub fn into_domain(self) -> Result<Account, PortError> {
        let currency: Currency = self.currency.parse().map_err(decode_err)?;
        Ok(Account {
            id: AccountId::from(self.account_id),
            customer_id: CustomerId::from(self.customer_id),
            number: AccountNumber::from(self.account_number),
            balance: Money::new(self.balance, currency),
            is_active: self.is_active,
            opened_at: self.opened_at,
        })
    }
}

pub(crate) const SELECT_ACCOUNT: &str = "SELECT account_id, customer_id, account_number, \
     currency, balance, is_active, opened_at FROM accounts";

/// Database row for a ledger entry
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TransactionRow {
    pub transaction_id: Uuid,
    pub from_account: Option<Uuid>,
    pub to_account: Option<Uuid>,
    pub amount: Decimal,
    pub currency: String,
    pub kind: String,
    pub status: String,
    pub description: Option<String>,
    pub posted_at: DateTime<Utc>,
}

impl TransactionRow {
    pub fn into_domain(self) -> Result<Transaction, PortError> {
        let kind = match (self.kind.as_str(), self.from_account, self.to_account) {
            ("TRANSFER", Some(from), Some(to)) => TransactionKind::Transfer {
                from: AccountId::from(from),
                to: AccountId::from(to),
            },
            ("DEPOSIT", None, Some(to)) => TransactionKind::Deposit {
                to: AccountId::from(to),
            },
            ("WITHDRAW", Some(from), None) => TransactionKind::Withdrawal {
                from: AccountId::from(from),
            },
            (kind, from, to) => {
                return Err(decode_err(format!(
                    "inconsistent ledger row: kind={kind} from={from:?} to={to:?}"
                )))
            }
        };

        let status = match self.status.as_str() {
            "COMPLETED" => TransactionStatus::Completed,
            "FAILED" => TransactionStatus::Failed,
            other => return Err(decode_err(format!("unknown transaction status: {other}"))),
        };

        Ok(Transaction {
            id: self.transaction_id.into(),
            kind,
            amount: self.amount,
            currency: self.currency.parse().map_err(decode_err)?,
            status,
            description: self.description,
            posted_at: self.posted_at,
        })
    }
}

pub(crate) const SELECT_TRANSACTION: &str = "SELECT transaction_id, from_account, to_account, \
     amount, currency, kind, status, description, posted_at FROM transactions";

/// Fetches an account row by number with a row-level lock
///
/// Must run inside a transaction; the lock is held until commit or
/// rollback.
pub(crate) async fn fetch_account_for_update(
    conn: &mut PgConnection,
    number: &AccountNumber,
) -> Result<Option<Account>, PortError> {
    let row: Option<AccountRow> =
        sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE account_number = $1 FOR UPDATE"))
            .bind(number.as_str())
            .fetch_optional(conn)
            .await
            .map_err(db_err)?;

    row.map(AccountRow::into_domain).transpose()
}

/// Fetches and locks all accounts of a customer
///
/// Rows are locked in account-number order, the same order the transfer
/// path uses, so credit disbursement and transfers cannot deadlock on
/// each other. Callers that need the earliest-opened account sort the
/// returned list themselves.
pub(crate) async fn fetch_customer_accounts_for_update(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<Vec<Account>, PortError> {
    let rows: Vec<AccountRow> = sqlx::query_as(&format!(
        "{SELECT_ACCOUNT} WHERE customer_id = $1 ORDER BY account_number FOR UPDATE"
    ))
    .bind(customer_id.as_uuid())
    .fetch_all(conn)
    .await
    .map_err(db_err)?;

    rows.into_iter().map(AccountRow::into_domain).collect()
}

/// Writes an account's current balance back to its row
pub(crate) async fn update_account_balance(
    conn: &mut PgConnection,
    account: &Account,
) -> Result<(), PortError> {
    sqlx::query("UPDATE accounts SET balance = $2 WHERE account_id = $1")
        .bind(account.id.as_uuid())
        .bind(account.balance.amount())
        .execute(conn)
        .await
        .map_err(db_err)?;

    Ok(())
}

/// Inserts a ledger entry
pub(crate) async fn insert_transaction(
    conn: &mut PgConnection,
    entry: &Transaction,
) -> Result<(), PortError> {
    sqlx::query(
        "INSERT INTO transactions \
         (transaction_id, from_account, to_account, amount, currency, kind, status, description, posted_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(entry.id.as_uuid())
    .bind(entry.kind.source().map(Uuid::from))
    .bind(entry.kind.destination().map(Uuid::from))
    .bind(entry.amount)
    .bind(entry.currency.code())
    .bind(entry.kind.type_tag())
    .bind(entry.status.as_str())
    .bind(&entry.description)
    .bind(entry.posted_at)
    .execute(conn)
    .await
    .map_err(db_err)?;

    Ok(())
}

/// Returns whether a customer row exists
pub(crate) async fn customer_exists(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<bool, PortError> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT customer_id FROM customers WHERE customer_id = $1")
            .bind(customer_id.as_uuid())
            .fetch_optional(conn)
            .await
            .map_err(db_err)?;

    Ok(row.is_some())
}
