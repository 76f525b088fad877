//! Balance reconstruction from transaction history
//!
//! The ledger is the source of truth for balances: at any point, an
//! account's balance equals the sum of completed credits to it minus the
//! sum of completed debits from it. This module recomputes that sum so
//! tests and audits can check the stored balance against the history.

use rust_decimal::Decimal;

use core_kernel::AccountId;

use crate::transaction::{Transaction, TransactionStatus};

/// Recomputes an account's balance from its transaction history
///
/// Entries where the account is neither source nor destination are
/// ignored, as are failed entries. The starting balance is zero; pass the
/// full history of the account.
pub fn balance_from_history(account_id: AccountId, history: &[Transaction]) -> Decimal {
    history
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Completed)
        .fold(Decimal::ZERO, |balance, tx| {
            let mut balance = balance;
            if tx.kind.destination() == Some(account_id) {
                balance += tx.amount;
            }
            if tx.kind.source() == Some(account_id) {
                balance -= tx.amount;
            }
            balance
        })
}
