//! The account aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{AccountId, Currency, CustomerId, Money};

use crate::error::AccountError;

/// A bank account number
///
/// Generated numbers are `TR` followed by sixteen digits derived from a
/// random UUID. Generation alone does not guarantee uniqueness; stores
/// check for collisions before inserting and keep a unique constraint as
/// the backstop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Generates a candidate account number
    pub fn generate() -> Self {
        let raw = Uuid::new_v4();
        let digits = u64::from_be_bytes(raw.as_bytes()[..8].try_into().expect("8 bytes"))
            % 10_000_000_000_000_000;
        Self(format!("TR{digits:016}"))
    }

    /// Returns the number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AccountNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary container owned by exactly one customer
///
/// The currency is fixed at opening. The balance is mutated only through
/// [`debit`](Account::debit) and [`credit`](Account::credit); adapters
/// persist those mutations together with the matching ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Unique account number
    pub number: AccountNumber,
    /// Current balance; currency is immutable after opening
    pub balance: Money,
    /// Whether the account is open for business
    pub is_active: bool,
    /// Opening timestamp
    pub opened_at: DateTime<Utc>,
}

impl Account {
    /// Opens a new account with a zero balance
    pub fn open(customer_id: CustomerId, number: AccountNumber, currency: Currency) -> Self {
        Self {
            id: AccountId::new(),
            customer_id,
            number,
            balance: Money::zero(currency),
            is_active: true,
            opened_at: Utc::now(),
        }
    }

    /// Returns the account currency
    pub fn currency(&self) -> Currency {
        self.balance.currency()
    }

    /// Decreases the balance by the given amount
    ///
    /// Fails with [`AccountError::InvalidAmount`] for non-positive amounts
    /// and [`AccountError::InsufficientFunds`] when the balance does not
    /// cover the amount. An exact-balance debit succeeds and leaves zero.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::InvalidAmount(amount));
        }
        if self.balance.amount() < amount {
            return Err(AccountError::InsufficientFunds {
                balance: self.balance.amount(),
                requested: amount,
            });
        }
        self.balance = Money::new(self.balance.amount() - amount, self.currency());
        Ok(())
    }

    /// Increases the balance by the given amount
    ///
    /// Fails with [`AccountError::InvalidAmount`] for non-positive amounts.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::InvalidAmount(amount));
        }
        self.balance = Money::new(self.balance.amount() + amount, self.currency());
        Ok(())
    }
}

/// Picks the customer's first-opened account
///
/// "First" is the earliest `opened_at`, with the account id as a stable
/// tiebreaker, so credit disbursement is deterministic regardless of how
/// the store happened to order the list.
pub fn first_opened(accounts: &[Account]) -> Option<&Account> {
    accounts.iter().min_by_key(|a| (a.opened_at, a.id))
}

/// Sums balances across accounts as a raw decimal
///
/// Currency conversion is out of scope; the credit limit rule sums the
/// numeric balances of all accounts regardless of currency.
pub fn total_balance(accounts: &[Account]) -> Decimal {
    accounts.iter().map(|a| a.balance.amount()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lira_account(balance: Decimal) -> Account {
        let mut account = Account::open(
            CustomerId::new(),
            AccountNumber::generate(),
            Currency::TRY,
        );
        account.balance = Money::new(balance, Currency::TRY);
        account
    }

    #[test]
    fn test_open_starts_at_zero() {
        let account = Account::open(
            CustomerId::new(),
            AccountNumber::generate(),
            Currency::USD,
        );
        assert!(account.balance.is_zero());
        assert!(account.is_active);
        assert_eq!(account.currency(), Currency::USD);
    }

    #[test]
    fn test_generated_numbers_have_expected_shape() {
        let number = AccountNumber::generate();
        assert!(number.as_str().starts_with("TR"));
        assert_eq!(number.as_str().len(), 18);
        assert!(number.as_str()[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_debit_reduces_balance() {
        let mut account = lira_account(dec!(100));
        account.debit(dec!(40)).unwrap();
        assert_eq!(account.balance.amount(), dec!(60));
    }

    #[test]
    fn test_debit_exact_balance_leaves_zero() {
        let mut account = lira_account(dec!(100));
        account.debit(dec!(100)).unwrap();
        assert!(account.balance.is_zero());
    }

    #[test]
    fn test_debit_insufficient_funds() {
        let mut account = lira_account(dec!(100));
        let err = account.debit(dec!(100.01)).unwrap_err();
        assert!(matches!(
            err,
            AccountError::InsufficientFunds { balance, requested }
                if balance == dec!(100) && requested == dec!(100.01)
        ));
        assert_eq!(account.balance.amount(), dec!(100));
    }

    #[test]
    fn test_debit_rejects_non_positive() {
        let mut account = lira_account(dec!(100));
        assert!(matches!(
            account.debit(dec!(0)),
            Err(AccountError::InvalidAmount(_))
        ));
        assert!(matches!(
            account.debit(dec!(-5)),
            Err(AccountError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut account = lira_account(dec!(10));
        account.credit(dec!(15)).unwrap();
        assert_eq!(account.balance.amount(), dec!(25));
    }

    #[test]
    fn test_credit_rejects_non_positive() {
        let mut account = lira_account(dec!(10));
        assert!(matches!(
            account.credit(dec!(0)),
            Err(AccountError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_first_opened_uses_opening_time() {
        let customer = CustomerId::new();
        let mut early = Account::open(customer, AccountNumber::generate(), Currency::TRY);
        let mut late = Account::open(customer, AccountNumber::generate(), Currency::TRY);
        early.opened_at = Utc::now() - chrono::Duration::days(30);
        late.opened_at = Utc::now();

        let accounts = vec![late.clone(), early.clone()];
        assert_eq!(first_opened(&accounts).unwrap().id, early.id);
    }

    #[test]
    fn test_first_opened_ties_break_on_id() {
        let customer = CustomerId::new();
        let opened_at = Utc::now();
        let mut a = Account::open(customer, AccountNumber::generate(), Currency::TRY);
        let mut b = Account::open(customer, AccountNumber::generate(), Currency::TRY);
        a.opened_at = opened_at;
        b.opened_at = opened_at;

        let winner = first_opened(&[a.clone(), b.clone()]).unwrap().id;
        let winner_reversed = first_opened(&[b, a]).unwrap().id;
        assert_eq!(winner, winner_reversed);
    }

    #[test]
    fn test_total_balance_sums_all_accounts() {
        let mut a = lira_account(dec!(100));
        let b = lira_account(dec!(250.50));
        a.balance = Money::new(dec!(100), Currency::TRY);
        assert_eq!(total_balance(&[a, b]), dec!(350.50));
    }
}
