//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the
//! rest.

use chrono::{Duration, Utc};
use core_kernel::{Currency, CustomerId, Money};
use rust_decimal::Decimal;

use domain_account::{Account, AccountNumber};
use domain_customer::{NationalId, NewCustomer};

use crate::fixtures::{StringFixtures, TemporalFixtures};

/// Builder for registration data
pub struct NewCustomerBuilder {
    national_id: Option<NationalId>,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
}

impl Default for NewCustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewCustomerBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            national_id: None,
            first_name: "Ayse".to_string(),
            last_name: "Demir".to_string(),
            email: StringFixtures::email().to_string(),
            password_hash: "$2b$04$fixture-hash".to_string(),
        }
    }

    /// Sets the national id
    pub fn with_national_id(mut self, national_id: &str) -> Self {
        self.national_id = Some(NationalId::parse(national_id).expect("valid national id"));
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the stored password hash
    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    /// Builds the registration data
    pub fn build(self) -> NewCustomer {
        NewCustomer {
            national_id: self.national_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: None,
            birth_date: TemporalFixtures::birth_date(),
            address: None,
            password_hash: self.password_hash,
        }
    }
}

/// Builder for account aggregates used in pure-domain tests
pub struct AccountBuilder {
    customer_id: CustomerId,
    currency: Currency,
    balance: Decimal,
    opened_days_ago: i64,
}

impl Default for AccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            customer_id: CustomerId::new(),
            currency: Currency::TRY,
            balance: Decimal::ZERO,
            opened_days_ago: 0,
        }
    }

    /// Sets the owning customer
    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Sets the currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the balance
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// Backdates the opening timestamp
    pub fn opened_days_ago(mut self, days: i64) -> Self {
        self.opened_days_ago = days;
        self
    }

    /// Builds the account
    pub fn build(self) -> Account {
        let mut account = Account::open(
            self.customer_id,
            AccountNumber::generate(),
            self.currency,
        );
        account.balance = Money::new(self.balance, self.currency);
        account.opened_at = Utc::now() - Duration::days(self.opened_days_ago);
        account
    }
}
