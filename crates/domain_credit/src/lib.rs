//! Credit Domain - Applications, Underwriting, and Disbursement
//!
//! A credit application moves through exactly one transition: from
//! `Pending` to either `Approved` or `Rejected`. The decision comes from
//! a fixed underwriting rule - the customer's total balance across all
//! accounts, multiplied by four, is the ceiling for the requested amount.
//! Approved amounts are disbursed into the customer's earliest-opened
//! account in the same atomic unit as the decision itself.

pub mod application;
pub mod evaluation;
pub mod error;
pub mod ports;

pub use application::{ApplicationStatus, CreditApplication};
pub use evaluation::{
    evaluate_automatic, resolve_manual, Disbursement, ManualDecision, UnderwritingRule,
};
pub use error::CreditError;
pub use ports::{CreditRequest, CreditStore};
