//! Docker-gated PostgreSQL adapter tests
//!
//! These run the same core flows against the real repositories with a
//! throwaway postgres container. They need a working Docker daemon, so
//! they are `#[ignore]`d by default:
//!
//! ```bash
//! cargo test -p test_utils --test postgres_tests -- --ignored
//! ```

use rust_decimal_macros::dec;

use core_kernel::Currency;
use domain_account::{AccountError, AccountStore, NewAccount};
use domain_credit::{CreditRequest, CreditStore};
use domain_customer::CustomerStore;
use domain_ledger::{balance_from_history, LedgerStore};

use infra_db::{AccountRepository, CreditRepository, CustomerRepository, LedgerRepository};
use test_utils::{random_new_customer, TestDatabase};

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_transfer_round_trip_against_postgres() {
    let db = TestDatabase::new().await.expect("container");
    let customers = CustomerRepository::new(db.pool().clone());
    let accounts = AccountRepository::new(db.pool().clone());
    let ledger = LedgerRepository::new(db.pool().clone());

    let customer = customers.register(random_new_customer()).await.unwrap();
    let from = accounts
        .open(NewAccount { customer_id: customer.id, currency: Currency::TRY })
        .await
        .unwrap();
    let to = accounts
        .open(NewAccount { customer_id: customer.id, currency: Currency::TRY })
        .await
        .unwrap();

    accounts.deposit(&from.number, dec!(5000), None).await.unwrap();
    accounts
        .transfer(&from.number, &to.number, dec!(1000), Some("rent".into()))
        .await
        .unwrap();

    let from_after = accounts.get(from.id).await.unwrap();
    let to_after = accounts.get(to.id).await.unwrap();
    assert_eq!(from_after.balance.amount(), dec!(4000));
    assert_eq!(to_after.balance.amount(), dec!(1000));

    let history = ledger.history_for_account(from.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(balance_from_history(from.id, &history), dec!(4000));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_failed_transfer_rolls_back_against_postgres() {
    let db = TestDatabase::new().await.expect("container");
    let customers = CustomerRepository::new(db.pool().clone());
    let accounts = AccountRepository::new(db.pool().clone());
    let ledger = LedgerRepository::new(db.pool().clone());

    let customer = customers.register(random_new_customer()).await.unwrap();
    let from = accounts
        .open(NewAccount { customer_id: customer.id, currency: Currency::TRY })
        .await
        .unwrap();
    let to = accounts
        .open(NewAccount { customer_id: customer.id, currency: Currency::USD })
        .await
        .unwrap();

    accounts.deposit(&from.number, dec!(5000), None).await.unwrap();

    let err = accounts
        .transfer(&from.number, &to.number, dec!(1000), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::CurrencyMismatch { .. }));

    assert_eq!(accounts.get(from.id).await.unwrap().balance.amount(), dec!(5000));
    assert!(accounts.get(to.id).await.unwrap().balance.is_zero());
    // Only the seeding deposit is on the ledger
    assert_eq!(ledger.history_for_account(from.id).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_automatic_credit_flow_against_postgres() {
    let db = TestDatabase::new().await.expect("container");
    let customers = CustomerRepository::new(db.pool().clone());
    let accounts = AccountRepository::new(db.pool().clone());
    let credit = CreditRepository::new(db.pool().clone());

    let customer = customers.register(random_new_customer()).await.unwrap();
    let account = accounts
        .open(NewAccount { customer_id: customer.id, currency: Currency::TRY })
        .await
        .unwrap();
    accounts.deposit(&account.number, dec!(50000), None).await.unwrap();

    let approved = credit
        .apply_automatic(
            customer.id,
            CreditRequest {
                requested_amount: dec!(150000),
                installment_count: 36,
                purpose: "home".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(approved.status.as_str(), "APPROVED");
    assert_eq!(accounts.get(account.id).await.unwrap().balance.amount(), dec!(200000));

    let rejected = credit
        .apply_automatic(
            customer.id,
            CreditRequest {
                requested_amount: dec!(1000000),
                installment_count: 36,
                purpose: "yacht".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.status.as_str(), "REJECTED");
    // limit is now 4 x 200000
    assert!(rejected.rejection_reason.unwrap().contains("800000"));

    let history = credit.history_for_customer(customer.id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_concurrent_withdrawals_against_postgres() {
    let db = TestDatabase::new().await.expect("container");
    let customers = CustomerRepository::new(db.pool().clone());
    let accounts = std::sync::Arc::new(AccountRepository::new(db.pool().clone()));

    let customer = customers.register(random_new_customer()).await.unwrap();
    let account = accounts
        .open(NewAccount { customer_id: customer.id, currency: Currency::TRY })
        .await
        .unwrap();
    accounts.deposit(&account.number, dec!(1000), None).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let accounts = accounts.clone();
        let number = account.number.clone();
        tasks.push(tokio::spawn(async move {
            accounts.withdraw(&number, dec!(1000), None).await
        }));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert!(accounts.get(account.id).await.unwrap().balance.is_zero());
}
