//! Account Domain Ports
//!
//! The `AccountStore` trait defines what the account domain needs from its
//! data source, including the three money-movement operations. Adapters
//! own the atomic-unit mechanics:
//!
//! - the PostgreSQL adapter runs each operation in one transaction with
//!   the participating account rows locked (`SELECT ... FOR UPDATE`)
//! - the in-memory adapter serializes whole operations behind one mutex
//!
//! Both apply the same pure rules from [`crate::ops`], so two concurrent
//! debits can never both pass the funds check, and a failure leaves every
//! participating row untouched.

use async_trait::async_trait;
use rust_decimal::Decimal;

use core_kernel::{AccountId, Currency, CustomerId, DomainPort};
use domain_ledger::Transaction;

use crate::account::{Account, AccountNumber};
use crate::error::AccountError;

/// Data for opening a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Owning customer
    pub customer_id: CustomerId,
    /// Currency fixed for the lifetime of the account
    pub currency: Currency,
}

/// The main port trait for account operations
#[async_trait]
pub trait AccountStore: DomainPort {
    /// Opens a zero-balance account with a collision-checked number
    async fn open(&self, new_account: NewAccount) -> Result<Account, AccountError>;

    /// Retrieves an account by id
    async fn get(&self, id: AccountId) -> Result<Account, AccountError>;

    /// Retrieves an account by its number
    async fn find_by_number(&self, number: &AccountNumber) -> Result<Account, AccountError>;

    /// Lists a customer's accounts ordered by opening time (earliest
    /// first, account id as tiebreaker)
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Account>, AccountError>;

    /// Lists every account (admin snapshot)
    async fn list_all(&self) -> Result<Vec<Account>, AccountError>;

    /// Atomically moves an amount between two accounts
    ///
    /// Both balance changes and the TRANSFER ledger entry commit together
    /// or not at all.
    async fn transfer(
        &self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError>;

    /// Atomically credits an account and records the DEPOSIT entry
    async fn deposit(
        &self,
        to: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError>;

    /// Atomically debits an account and records the WITHDRAW entry
    async fn withdraw(
        &self,
        from: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError>;
}
