//! Customer Domain Ports

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort};

use crate::customer::{Customer, NewCustomer};
use crate::error::CustomerError;

/// The main port trait for customer operations
#[async_trait]
pub trait CustomerStore: DomainPort {
    /// Registers a new customer
    ///
    /// Fails with [`CustomerError::DuplicateIdentity`] when the email or
    /// national id is already registered. When `new_customer.national_id`
    /// is absent, the store generates one and retries on the (unlikely)
    /// collision.
    async fn register(&self, new_customer: NewCustomer) -> Result<Customer, CustomerError>;

    /// Retrieves a customer by id
    async fn get(&self, id: CustomerId) -> Result<Customer, CustomerError>;

    /// Looks up a customer by login email
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError>;

    /// Lists every customer (admin snapshot)
    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError>;

    /// Clears the active flag; the record is never deleted
    async fn deactivate(&self, id: CustomerId) -> Result<(), CustomerError>;
}
