//! The immutable ledger entry type

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Currency, TransactionId};

use crate::error::LedgerError;

/// The endpoints of a ledger entry
///
/// Modeling the source/destination pair as a tagged variant keeps the
/// "at least one side is set" invariant in the type: a deposit has no
/// source, a withdrawal has no destination, and a record with neither
/// side cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Transfer { from: AccountId, to: AccountId },
    Deposit { to: AccountId },
    Withdrawal { from: AccountId },
}

impl TransactionKind {
    /// The account debited by this entry, if any
    pub fn source(&self) -> Option<AccountId> {
        match self {
            TransactionKind::Transfer { from, .. } => Some(*from),
            TransactionKind::Withdrawal { from } => Some(*from),
            TransactionKind::Deposit { .. } => None,
        }
    }

    /// The account credited by this entry, if any
    pub fn destination(&self) -> Option<AccountId> {
        match self {
            TransactionKind::Transfer { to, .. } => Some(*to),
            TransactionKind::Deposit { to } => Some(*to),
            TransactionKind::Withdrawal { .. } => None,
        }
    }

    /// The wire-format type tag
    pub fn type_tag(&self) -> &'static str {
        match self {
            TransactionKind::Transfer { .. } => "TRANSFER",
            TransactionKind::Deposit { .. } => "DEPOSIT",
            TransactionKind::Withdrawal { .. } => "WITHDRAW",
        }
    }

    /// Returns true if the given account participates in this entry
    pub fn touches(&self, account_id: AccountId) -> bool {
        self.source() == Some(account_id) || self.destination() == Some(account_id)
    }
}

/// Processing status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

impl TransactionStatus {
    /// The wire-format status tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

/// An immutable ledger entry
///
/// Created once per successful balance mutation, in the same atomic unit
/// as the mutation itself. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Time-ordered unique identifier
    pub id: TransactionId,
    /// Source/destination endpoints
    pub kind: TransactionKind,
    /// Amount moved; always strictly positive
    pub amount: Decimal,
    /// Currency of the amount
    pub currency: Currency,
    /// Processing status
    pub status: TransactionStatus,
    /// Free-form description
    pub description: Option<String>,
    /// When the entry was posted
    pub posted_at: DateTime<Utc>,
}

impl Transaction {
    /// Records a completed entry of the given kind
    ///
    /// Fails with [`LedgerError::NonPositiveAmount`] unless the amount is
    /// strictly positive.
    pub fn record(
        kind: TransactionKind,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Result<Self, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }

        Ok(Self {
            id: TransactionId::new_v7(),
            kind,
            amount,
            currency,
            status: TransactionStatus::Completed,
            description,
            posted_at: Utc::now(),
        })
    }

    /// Records a completed transfer between two accounts
    pub fn transfer(
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Result<Self, LedgerError> {
        Self::record(TransactionKind::Transfer { from, to }, amount, currency, description)
    }

    /// Records a completed deposit into an account
    pub fn deposit(
        to: AccountId,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Result<Self, LedgerError> {
        Self::record(TransactionKind::Deposit { to }, amount, currency, description)
    }

    /// Records a completed withdrawal from an account
    pub fn withdrawal(
        from: AccountId,
        amount: Decimal,
        currency: Currency,
        description: Option<String>,
    ) -> Result<Self, LedgerError> {
        Self::record(TransactionKind::Withdrawal { from }, amount, currency, description)
    }
}
