//! The underwriting rule and the two evaluation flows
//!
//! Both flows are pure: they mutate an in-memory application and tell the
//! caller which account to credit, if any. The adapter persists the
//! application, the disbursement credit, and its ledger entry in one
//! atomic unit, discarding everything on failure.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::AccountId;
use domain_account::{first_opened, total_balance, Account};

use crate::application::CreditApplication;
use crate::error::CreditError;

/// The fixed credit-limit formula
///
/// A customer may borrow up to `multiplier` times the sum of their
/// account balances at decision time.
#[derive(Debug, Clone, Copy)]
pub struct UnderwritingRule {
    multiplier: Decimal,
}

impl Default for UnderwritingRule {
    fn default() -> Self {
        Self { multiplier: dec!(4) }
    }
}

impl UnderwritingRule {
    /// Computes the credit limit for a total balance
    pub fn limit(&self, total_balance: Decimal) -> Decimal {
        total_balance * self.multiplier
    }

    /// The rejection reason recorded when a request exceeds the limit
    pub fn rejection_reason(&self, limit: Decimal) -> String {
        format!("Insufficient balance (maximum credit limit: {})", limit.normalize())
    }
}

/// Instruction to credit an approved amount into an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disbursement {
    pub account_id: AccountId,
    pub amount: Decimal,
}

/// An administrator's decision on a pending application
#[derive(Debug, Clone)]
pub enum ManualDecision {
    Approve,
    Reject { reason: String },
}

/// Decides a pending application against the underwriting rule
///
/// The limit is four times the customer's total balance at decision
/// time. Approval disburses the requested amount into the earliest-opened
/// account. A customer with no accounts is still approved when the limit
/// covers the request - with a zero limit that can only happen for
/// amounts rejected earlier as non-positive - and no funds move; the
/// stricter guard belongs to the manual path only.
pub fn evaluate_automatic(
    application: &mut CreditApplication,
    accounts: &[Account],
    rule: &UnderwritingRule,
) -> Result<Option<Disbursement>, CreditError> {
    let limit = rule.limit(total_balance(accounts));

    if limit >= application.requested_amount {
        application.approve()?;
        Ok(first_opened(accounts).map(|account| Disbursement {
            account_id: account.id,
            amount: application.requested_amount,
        }))
    } else {
        application.reject(rule.rejection_reason(limit))?;
        Ok(None)
    }
}

/// Applies an administrator's decision to a pending application
///
/// Approval requires at least one account to receive the funds; the
/// earliest-opened one is credited. Rejection stores the given reason.
/// Either way the evaluation time is stamped, and a resolved application
/// fails with [`CreditError::AlreadyResolved`] before anything changes.
pub fn resolve_manual(
    application: &mut CreditApplication,
    decision: ManualDecision,
    accounts: &[Account],
) -> Result<Option<Disbursement>, CreditError> {
    if !application.is_pending() {
        return Err(CreditError::AlreadyResolved(application.id));
    }

    match decision {
        ManualDecision::Approve => {
            let target = first_opened(accounts).ok_or(CreditError::NoDestinationAccount)?;
            let disbursement = Disbursement {
                account_id: target.id,
                amount: application.requested_amount,
            };
            application.approve()?;
            Ok(Some(disbursement))
        }
        ManualDecision::Reject { reason } => {
            application.reject(reason)?;
            Ok(None)
        }
    }
}
