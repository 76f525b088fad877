//! Randomized test data generators
//!
//! Fake-but-plausible registration data for tests that need many
//! distinct customers.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use domain_customer::NewCustomer;

use crate::fixtures::TemporalFixtures;

/// Generates registration data with a unique random email
pub fn random_new_customer() -> NewCustomer {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    // Prefix with a UUID so parallel generators never collide
    let email = format!("{}-{}", Uuid::new_v4().simple(), SafeEmail().fake::<String>());

    NewCustomer {
        national_id: None,
        first_name,
        last_name,
        email,
        phone: None,
        birth_date: TemporalFixtures::birth_date(),
        address: None,
        password_hash: "$2b$04$generated-hash".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_customers_have_distinct_emails() {
        let a = random_new_customer();
        let b = random_new_customer();
        assert_ne!(a.email, b.email);
    }
}
