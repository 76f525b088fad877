//! Core Kernel - Foundational types and utilities for the banking system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port abstractions shared by storage adapters

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{CustomerId, AccountId, TransactionId, ApplicationId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
