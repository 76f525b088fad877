//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL adapters for the banking core,
//! implementing the domain store ports on SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: one repository per domain
//! port, each holding a connection pool. Money-movement operations run in
//! a single database transaction with the participating account rows
//! locked (`SELECT ... FOR UPDATE`, acquired in account-number order), so
//! concurrent operations on the same account serialize and a failure
//! rolls back every row.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, repositories::AccountRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/banking")).await?;
//! let accounts = AccountRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabaseHealth, DatabasePool};
pub use error::DatabaseError;
pub use repositories::{
    AccountRepository, CreditRepository, CustomerRepository, LedgerRepository,
};

/// Embedded schema migrations, applied with `MIGRATOR.run(&pool)`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
