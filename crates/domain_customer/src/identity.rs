//! National identity numbers
//!
//! Identity numbers are eleven digits and cannot start with zero. The
//! validated [`NationalId`] newtype makes it impossible to carry a
//! malformed number past the parsing boundary.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Why a national identity number failed validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("National id must be exactly 11 digits, got {0} characters")]
    WrongLength(usize),

    #[error("National id must contain only digits")]
    NonNumeric,

    #[error("National id cannot start with a zero")]
    LeadingZero,
}

/// A validated national identity number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Parses and validates an identity number
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();

        if value.len() != 11 {
            return Err(IdentityError::WrongLength(value.len()));
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentityError::NonNumeric);
        }
        if value.starts_with('0') {
            return Err(IdentityError::LeadingZero);
        }

        Ok(Self(value))
    }

    /// Generates a candidate identity number for customers registered
    /// without one
    ///
    /// The digits are derived from a random UUID and always form a valid
    /// eleven-digit number with a non-zero first digit. Generation alone
    /// does not guarantee uniqueness; stores check for collisions before
    /// inserting and keep a unique constraint as the backstop.
    pub fn generate() -> Self {
        let raw = Uuid::new_v4();
        let n = u64::from_be_bytes(raw.as_bytes()[..8].try_into().expect("8 bytes"));
        // 10_000_000_000..=99_999_999_999 - eleven digits, first digit 1-9
        let digits = 10_000_000_000 + n % 90_000_000_000;
        Self(digits.to_string())
    }

    /// Returns the number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NationalId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_accepts_exactly_the_valid_shapes(n in 10_000_000_000u64..=99_999_999_999u64) {
            prop_assert!(NationalId::parse(n.to_string()).is_ok());
        }

        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = NationalId::parse(s);
        }
    }
}
