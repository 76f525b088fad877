//! Account Domain - Monetary Containers and Balance Mutations
//!
//! This crate owns the balance mutation core. An [`Account`] is a monetary
//! container with an immutable currency; its balance changes only through
//! the operations in [`ops`], and every successful change is paired with
//! exactly one ledger entry produced in the same atomic unit.
//!
//! The [`AccountStore`] port carries the atomicity contract: adapters must
//! serialize concurrent operations touching the same account so that two
//! concurrent debits cannot both pass the funds check.

pub mod account;
pub mod ops;
pub mod error;
pub mod ports;

pub use account::{Account, AccountNumber, first_opened, total_balance};
pub use error::AccountError;
pub use ports::{AccountStore, NewAccount};
