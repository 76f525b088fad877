//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the banking
//! system. Fixtures are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The classic seed balance from the credit scenarios
    pub fn lira_50k() -> Money {
        Money::new(dec!(50000.00), Currency::TRY)
    }

    /// A small everyday amount
    pub fn lira_100() -> Money {
        Money::new(dec!(100.00), Currency::TRY)
    }

    /// A zero amount
    pub fn lira_zero() -> Money {
        Money::zero(Currency::TRY)
    }

    /// A dollar amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for string-valued test data
pub struct StringFixtures;

impl StringFixtures {
    /// A valid national id
    pub fn national_id() -> &'static str {
        "12345678901"
    }

    /// A second valid national id
    pub fn other_national_id() -> &'static str {
        "98765432109"
    }

    /// A deterministic customer email
    pub fn email() -> &'static str {
        "ayse.demir@example.com"
    }

    /// A password that passes registration validation
    pub fn password() -> &'static str {
        "correct-horse-battery"
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard date of birth for a test customer
    pub fn birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 4, 2).expect("valid date")
    }
}
