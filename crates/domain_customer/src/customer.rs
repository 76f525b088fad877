//! The customer aggregate

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use core_kernel::CustomerId;

use crate::identity::NationalId;

/// A registered bank customer
///
/// Owns zero or more accounts and credit applications. The password hash
/// comes from the credential collaborator at the API edge; this crate
/// never sees a plain-text password.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Unique national identity number
    pub national_id: NationalId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Unique login email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Postal address
    pub address: Option<String>,
    /// One-way hash of the login credential
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Registration date
    pub registered_on: NaiveDate,
    /// Soft-delete flag; customers are deactivated, never removed
    pub is_active: bool,
}

impl Customer {
    /// Creates a customer record from registration data
    pub fn register(new: NewCustomer, national_id: NationalId) -> Self {
        Self {
            id: CustomerId::new(),
            national_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            birth_date: new.birth_date,
            address: new.address,
            password_hash: new.password_hash,
            registered_on: Utc::now().date_naive(),
            is_active: true,
        }
    }

    /// The customer's display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Closes the relationship without deleting the record
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Data collected at registration
///
/// `national_id` may be absent; the store then generates a
/// collision-checked one.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub national_id: Option<NationalId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub password_hash: String,
}
