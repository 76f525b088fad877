//! Account repository implementation
//!
//! Implements the `AccountStore` port on PostgreSQL. Every money
//! movement runs in one transaction with the participating account rows
//! locked `FOR UPDATE`, acquired in account-number order, so two
//! concurrent debits against the same account serialize and can never
//! both pass the funds check.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, warn};

use core_kernel::{AccountId, CustomerId, DomainPort, PortError};
use domain_account::{ops, Account, AccountError, AccountNumber, AccountStore, NewAccount};
use domain_ledger::Transaction;

use super::{
    customer_exists, db_err, fetch_account_for_update, insert_transaction,
    update_account_balance, AccountRow, SELECT_ACCOUNT,
};

/// How many generated numbers to try before giving up on a collision run
const NUMBER_ATTEMPTS: u32 = 5;

/// Repository for account data and the atomic money movements
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Creates a new AccountRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_number(&self, number: &AccountNumber) -> Result<Account, AccountError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE account_number = $1"))
                .bind(number.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        match row {
            Some(row) => Ok(row.into_domain()?),
            None => Err(AccountError::NotFound(number.to_string())),
        }
    }
}

impl DomainPort for AccountRepository {}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn open(&self, new_account: NewAccount) -> Result<Account, AccountError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        if !customer_exists(&mut conn, new_account.customer_id).await? {
            return Err(AccountError::Store(PortError::not_found(
                "Customer",
                new_account.customer_id,
            )));
        }
        drop(conn);

        // Generated numbers are collision-checked against the unique
        // constraint; a clash just means another roll of the dice.
        for attempt in 0..NUMBER_ATTEMPTS {
            let account = Account::open(
                new_account.customer_id,
                AccountNumber::generate(),
                new_account.currency,
            );

            let result = sqlx::query(
                "INSERT INTO accounts \
                 (account_id, customer_id, account_number, currency, balance, is_active, opened_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(account.id.as_uuid())
            .bind(account.customer_id.as_uuid())
            .bind(account.number.as_str())
            .bind(account.currency().code())
            .bind(account.balance.amount())
            .bind(account.is_active)
            .bind(account.opened_at)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => {
                    debug!(account = %account.number, "opened account");
                    return Ok(account);
                }
                Err(sqlx::Error::Database(db))
                    if db.is_unique_violation()
                        && db.constraint() == Some("accounts_account_number_key") =>
                {
                    warn!(attempt, "account number collision, regenerating");
                    continue;
                }
                Err(e) => return Err(db_err(e).into()),
            }
        }

        Err(AccountError::Store(PortError::conflict(
            "could not allocate a unique account number",
        )))
    }

    async fn get(&self, id: AccountId) -> Result<Account, AccountError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE account_id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        match row {
            Some(row) => Ok(row.into_domain()?),
            None => Err(AccountError::NotFound(id.to_string())),
        }
    }

    async fn find_by_number(&self, number: &AccountNumber) -> Result<Account, AccountError> {
        self.fetch_by_number(number).await
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Account>, AccountError> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "{SELECT_ACCOUNT} WHERE customer_id = $1 ORDER BY opened_at ASC, account_id ASC"
        ))
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let accounts = rows
            .into_iter()
            .map(AccountRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        let rows: Vec<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} ORDER BY opened_at ASC, account_id ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let accounts = rows
            .into_iter()
            .map(AccountRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    async fn transfer(
        &self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError> {
        if from == to {
            return Err(AccountError::SameAccount);
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Lock in account-number order so crossed transfers (A->B and
        // B->A) cannot deadlock.
        let (first, second) = if from.as_str() <= to.as_str() {
            (from, to)
        } else {
            (to, from)
        };

        let first_account = fetch_account_for_update(&mut tx, first)
            .await?
            .ok_or_else(|| AccountError::NotFound(first.to_string()))?;
        let second_account = fetch_account_for_update(&mut tx, second)
            .await?
            .ok_or_else(|| AccountError::NotFound(second.to_string()))?;

        let (mut from_account, mut to_account) = if first == from {
            (first_account, second_account)
        } else {
            (second_account, first_account)
        };

        let entry = ops::transfer(&mut from_account, &mut to_account, amount, description)?;

        update_account_balance(&mut tx, &from_account).await?;
        update_account_balance(&mut tx, &to_account).await?;
        insert_transaction(&mut tx, &entry).await?;

        tx.commit().await.map_err(db_err)?;

        debug!(from = %from, to = %to, %amount, "transfer completed");
        Ok(entry)
    }

    async fn deposit(
        &self,
        to: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let mut account = fetch_account_for_update(&mut tx, to)
            .await?
            .ok_or_else(|| AccountError::NotFound(to.to_string()))?;

        let entry = ops::deposit(&mut account, amount, description)?;

        update_account_balance(&mut tx, &account).await?;
        insert_transaction(&mut tx, &entry).await?;

        tx.commit().await.map_err(db_err)?;

        debug!(to = %to, %amount, "deposit completed");
        Ok(entry)
    }

    async fn withdraw(
        &self,
        from: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let mut account = fetch_account_for_update(&mut tx, from)
            .await?
            .ok_or_else(|| AccountError::NotFound(from.to_string()))?;

        let entry = ops::withdraw(&mut account, amount, description)?;

        update_account_balance(&mut tx, &account).await?;
        insert_transaction(&mut tx, &entry).await?;

        tx.commit().await.map_err(db_err)?;

        debug!(from = %from, %amount, "withdrawal completed");
        Ok(entry)
    }
}
