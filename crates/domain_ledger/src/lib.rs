//! Ledger Domain - Immutable Transaction Records
//!
//! This crate implements the audit trail for every balance-affecting
//! operation in the bank. A `Transaction` is written once, in the same
//! atomic unit as the balance change it describes, and never updated.
//!
//! # Invariants
//!
//! - Every transaction has a strictly positive amount
//! - Every transaction references at least one account; the
//!   [`TransactionKind`] variants make a record with neither side
//!   unrepresentable
//! - An account's balance always equals its incoming minus outgoing
//!   transaction amounts (see [`reconcile`])

pub mod transaction;
pub mod reconcile;
pub mod error;
pub mod ports;

pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use reconcile::balance_from_history;
pub use error::LedgerError;
pub use ports::LedgerStore;
