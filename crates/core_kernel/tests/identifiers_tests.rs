//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, and display
//! formatting.

use core_kernel::{AccountId, ApplicationId, CustomerId, TransactionId};
use uuid::Uuid;

mod creation {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = CustomerId::new();
        let id2 = CustomerId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = TransactionId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TransactionId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = AccountId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }
}

mod formatting {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert!(CustomerId::new().to_string().starts_with("CUS-"));
        assert!(AccountId::new().to_string().starts_with("ACC-"));
        assert!(TransactionId::new().to_string().starts_with("TXN-"));
        assert!(ApplicationId::new().to_string().starts_with("APP-"));
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let id = ApplicationId::new();
        let with_prefix: ApplicationId = id.to_string().parse().unwrap();
        let without_prefix: ApplicationId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(id, with_prefix);
        assert_eq!(id, without_prefix);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<CustomerId>().is_err());
    }
}
