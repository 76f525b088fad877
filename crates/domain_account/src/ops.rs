//! Balance mutation operations
//!
//! These functions are the pure core of every money movement: they apply
//! the business checks, mutate in-memory copies of the accounts, and
//! produce the single ledger entry that must be persisted in the same
//! atomic unit as the new balances. Adapters provide the atomicity
//! (a database transaction with locked rows, or a mutex over the whole
//! in-memory state) and discard the copies when an operation fails, so a
//! failed operation never leaves partial state.

use rust_decimal::Decimal;

use domain_ledger::Transaction;

use crate::account::Account;
use crate::error::AccountError;

/// Moves an amount between two accounts of the same currency
///
/// Checks run before any mutation: distinct accounts, matching
/// currencies, positive amount, sufficient funds. On success both
/// balances are updated and the paired TRANSFER entry is returned.
pub fn transfer(
    from: &mut Account,
    to: &mut Account,
    amount: Decimal,
    description: Option<String>,
) -> Result<Transaction, AccountError> {
    if from.id == to.id {
        return Err(AccountError::SameAccount);
    }
    if from.currency() != to.currency() {
        return Err(AccountError::CurrencyMismatch {
            from: from.currency(),
            to: to.currency(),
        });
    }

    from.debit(amount)?;
    to.credit(amount)?;

    let entry = Transaction::transfer(from.id, to.id, amount, from.currency(), description)?;
    Ok(entry)
}

/// Credits an amount into an account and records the DEPOSIT entry
pub fn deposit(
    account: &mut Account,
    amount: Decimal,
    description: Option<String>,
) -> Result<Transaction, AccountError> {
    account.credit(amount)?;
    let entry = Transaction::deposit(account.id, amount, account.currency(), description)?;
    Ok(entry)
}

/// Debits an amount from an account and records the WITHDRAW entry
pub fn withdraw(
    account: &mut Account,
    amount: Decimal,
    description: Option<String>,
) -> Result<Transaction, AccountError> {
    account.debit(amount)?;
    let entry = Transaction::withdrawal(account.id, amount, account.currency(), description)?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountNumber;
    use core_kernel::{Currency, CustomerId, Money};
    use domain_ledger::TransactionKind;
    use rust_decimal_macros::dec;

    fn account_with(balance: Decimal, currency: Currency) -> Account {
        let mut account = Account::open(
            CustomerId::new(),
            AccountNumber::generate(),
            currency,
        );
        account.balance = Money::new(balance, currency);
        account
    }

    #[test]
    fn test_transfer_moves_funds_and_records_entry() {
        let mut from = account_with(dec!(5000), Currency::TRY);
        let mut to = account_with(dec!(0), Currency::TRY);

        let entry = transfer(&mut from, &mut to, dec!(1000), Some("rent".into())).unwrap();

        assert_eq!(from.balance.amount(), dec!(4000));
        assert_eq!(to.balance.amount(), dec!(1000));
        assert_eq!(
            entry.kind,
            TransactionKind::Transfer { from: from.id, to: to.id }
        );
        assert_eq!(entry.amount, dec!(1000));
        assert_eq!(entry.currency, Currency::TRY);
    }

    #[test]
    fn test_transfer_exact_balance_empties_source() {
        let mut from = account_with(dec!(750), Currency::TRY);
        let mut to = account_with(dec!(10), Currency::TRY);

        transfer(&mut from, &mut to, dec!(750), None).unwrap();

        assert!(from.balance.is_zero());
        assert_eq!(to.balance.amount(), dec!(760));
    }

    #[test]
    fn test_transfer_currency_mismatch_leaves_balances() {
        let mut from = account_with(dec!(5000), Currency::TRY);
        let mut to = account_with(dec!(0), Currency::USD);

        let err = transfer(&mut from, &mut to, dec!(1000), None).unwrap_err();

        assert!(matches!(err, AccountError::CurrencyMismatch { .. }));
        assert_eq!(from.balance.amount(), dec!(5000));
        assert_eq!(to.balance.amount(), dec!(0));
    }

    #[test]
    fn test_transfer_insufficient_funds_leaves_balances() {
        let mut from = account_with(dec!(100), Currency::TRY);
        let mut to = account_with(dec!(0), Currency::TRY);

        let err = transfer(&mut from, &mut to, dec!(101), None).unwrap_err();

        assert!(matches!(err, AccountError::InsufficientFunds { .. }));
        assert_eq!(from.balance.amount(), dec!(100));
        assert_eq!(to.balance.amount(), dec!(0));
    }

    #[test]
    fn test_deposit_records_entry() {
        let mut account = account_with(dec!(0), Currency::EUR);

        let entry = deposit(&mut account, dec!(250), None).unwrap();

        assert_eq!(account.balance.amount(), dec!(250));
        assert_eq!(entry.kind, TransactionKind::Deposit { to: account.id });
        assert_eq!(entry.currency, Currency::EUR);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut account = account_with(dec!(0), Currency::TRY);
        assert!(matches!(
            deposit(&mut account, dec!(0), None),
            Err(AccountError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_withdraw_records_entry() {
        let mut account = account_with(dec!(300), Currency::TRY);

        let entry = withdraw(&mut account, dec!(120), None).unwrap();

        assert_eq!(account.balance.amount(), dec!(180));
        assert_eq!(
            entry.kind,
            TransactionKind::Withdrawal { from: account.id }
        );
    }
}
