//! HTTP API tests
//!
//! Drives the full router against the in-memory bank: registration,
//! login, money movement, credit flows, and the auth/admin gates.

use std::str::FromStr;
use std::sync::Arc;

use axum_test::TestServer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use interface_api::auth::PasswordHasher;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::MemoryBank;

const ADMIN_EMAIL: &str = "admin@bank.example";

fn test_server() -> TestServer {
    let bank = MemoryBank::new();
    let state = AppState {
        customers: Arc::new(bank.clone()),
        accounts: Arc::new(bank.clone()),
        ledger: Arc::new(bank.clone()),
        credit: Arc::new(bank.clone()),
        health: Arc::new(bank),
        hasher: PasswordHasher::with_cost(4),
        config: ApiConfig {
            jwt_secret: "test-secret".to_string(),
            admin_emails: ADMIN_EMAIL.to_string(),
            ..Default::default()
        },
    };

    TestServer::new(create_router(state)).expect("router")
}

fn register_body(email: &str) -> Value {
    json!({
        "first_name": "Ayse",
        "last_name": "Demir",
        "email": email,
        "birth_date": "1990-04-02",
        "password": "correct-horse-battery"
    })
}

/// Registers a customer and returns (token, customer_id, default account number)
async fn register_and_login(server: &TestServer, email: &str) -> (String, String, String) {
    let registered = server.post("/api/auth/register").json(&register_body(email)).await;
    registered.assert_status_ok();
    let registered: Value = registered.json();

    let login = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": "correct-horse-battery" }))
        .await;
    login.assert_status_ok();
    let login: Value = login.json();

    (
        login["token"].as_str().unwrap().to_string(),
        registered["customer_id"].as_str().unwrap().to_string(),
        registered["account_number"].as_str().unwrap().to_string(),
    )
}

fn amount(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).expect("decimal")
}

mod auth_flow {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_register_opens_default_account() {
        let server = test_server();

        let response = server
            .post("/api/auth/register")
            .json(&register_body("a@example.com"))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(body["account_number"].as_str().unwrap().starts_with("TR"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let server = test_server();
        server
            .post("/api/auth/register")
            .json(&register_body("a@example.com"))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/auth/register")
            .json(&register_body("a@example.com"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_national_id() {
        let server = test_server();
        let mut body = register_body("a@example.com");
        body["national_id"] = json!("0123");

        let response = server.post("/api/auth/register").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let server = test_server();
        let mut body = register_body("a@example.com");
        body["password"] = json!("short");

        let response = server.post("/api/auth/register").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let server = test_server();
        server
            .post("/api/auth/register")
            .json(&register_body("a@example.com"))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "a@example.com", "password": "wrong-password" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let server = test_server();
        let response = server
            .post("/api/v1/transactions/deposit")
            .json(&json!({ "to_account": "TR1", "amount": 1 }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_endpoints_are_public() {
        let server = test_server();
        server.get("/health").await.assert_status_ok();
        server.get("/health/ready").await.assert_status_ok();
    }
}

mod money_flow {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_deposit_then_transfer() {
        let server = test_server();
        let (token, _, from_number) = register_and_login(&server, "from@example.com").await;
        let (_, _, to_number) = register_and_login(&server, "to@example.com").await;

        server
            .post("/api/v1/transactions/deposit")
            .authorization_bearer(&token)
            .json(&json!({ "to_account": from_number, "amount": 5000 }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/v1/transactions/transfer")
            .authorization_bearer(&token)
            .json(&json!({
                "from_account": from_number,
                "to_account": to_number,
                "amount": 1000,
                "description": "rent"
            }))
            .await;
        response.assert_status_ok();

        let entry: Value = response.json();
        assert_eq!(entry["transaction_type"], "TRANSFER");
        assert_eq!(entry["status"], "COMPLETED");
        assert_eq!(amount(&entry["amount"]), dec!(1000));
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_a_validation_error() {
        let server = test_server();
        let (token, _, from_number) = register_and_login(&server, "from@example.com").await;
        let (_, _, to_number) = register_and_login(&server, "to@example.com").await;

        let response = server
            .post("/api/v1/transactions/transfer")
            .authorization_bearer(&token)
            .json(&json!({
                "from_account": from_number,
                "to_account": to_number,
                "amount": 1
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("Insufficient funds"));
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let server = test_server();
        let (token, _, from_number) = register_and_login(&server, "from@example.com").await;

        let response = server
            .post("/api/v1/transactions/transfer")
            .authorization_bearer(&token)
            .json(&json!({
                "from_account": from_number,
                "to_account": "TR0000000000000000",
                "amount": 1
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_lists_newest_first() {
        let server = test_server();
        let (token, customer_id, number) = register_and_login(&server, "h@example.com").await;

        for amount in [100, 200] {
            server
                .post("/api/v1/transactions/deposit")
                .authorization_bearer(&token)
                .json(&json!({ "to_account": number, "amount": amount }))
                .await
                .assert_status_ok();
        }

        let accounts: Value = server
            .get(&format!("/api/v1/accounts/customer/{customer_id}"))
            .authorization_bearer(&token)
            .await
            .json();
        let account_id = accounts[0]["id"].as_str().unwrap().to_string();
        assert_eq!(amount(&accounts[0]["balance"]), dec!(300));

        let history: Value = server
            .get(&format!("/api/v1/transactions/account/{account_id}"))
            .authorization_bearer(&token)
            .await
            .json();
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(amount(&history[0]["amount"]), dec!(200));
        assert_eq!(amount(&history[1]["amount"]), dec!(100));
    }

    #[tokio::test]
    async fn test_open_account_in_other_currency_and_mismatch() {
        let server = test_server();
        let (token, customer_id, lira_number) = register_and_login(&server, "c@example.com").await;

        let created = server
            .post("/api/v1/accounts")
            .authorization_bearer(&token)
            .json(&json!({ "customer_id": customer_id, "currency": "USD" }))
            .await;
        created.assert_status_ok();
        let usd: Value = created.json();

        server
            .post("/api/v1/transactions/deposit")
            .authorization_bearer(&token)
            .json(&json!({ "to_account": lira_number, "amount": 5000 }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/v1/transactions/transfer")
            .authorization_bearer(&token)
            .json(&json!({
                "from_account": lira_number,
                "to_account": usd["account_number"],
                "amount": 1000
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("Currency mismatch"));
    }
}

mod credit_flow {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_automatic_approval_scenario() {
        let server = test_server();
        let (token, customer_id, number) = register_and_login(&server, "k@example.com").await;

        server
            .post("/api/v1/transactions/deposit")
            .authorization_bearer(&token)
            .json(&json!({ "to_account": number, "amount": 50000 }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/v1/credits/apply")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": customer_id,
                "requested_amount": 150000,
                "installment_count": 36,
                "purpose": "home"
            }))
            .await;
        response.assert_status_ok();
        let application: Value = response.json();
        assert_eq!(application["status"], "APPROVED");

        let accounts: Value = server
            .get(&format!("/api/v1/accounts/customer/{customer_id}"))
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(amount(&accounts[0]["balance"]), dec!(200000));
    }

    #[tokio::test]
    async fn test_automatic_rejection_embeds_limit() {
        let server = test_server();
        let (token, customer_id, number) = register_and_login(&server, "k@example.com").await;

        server
            .post("/api/v1/transactions/deposit")
            .authorization_bearer(&token)
            .json(&json!({ "to_account": number, "amount": 50000 }))
            .await
            .assert_status_ok();

        let application: Value = server
            .post("/api/v1/credits/apply")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": customer_id,
                "requested_amount": 250000,
                "installment_count": 36,
                "purpose": "home"
            }))
            .await
            .json();
        assert_eq!(application["status"], "REJECTED");
        assert!(application["rejection_reason"]
            .as_str()
            .unwrap()
            .contains("200000"));
    }

    #[tokio::test]
    async fn test_manual_evaluation_requires_admin() {
        let server = test_server();
        let (token, customer_id, _) = register_and_login(&server, "c@example.com").await;

        let submitted: Value = server
            .post("/api/v1/credits/submit")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": customer_id,
                "requested_amount": 5000,
                "installment_count": 12,
                "purpose": "laptop"
            }))
            .await
            .json();
        assert_eq!(submitted["status"], "PENDING");

        // A plain customer cannot see the queue or decide
        let forbidden = server
            .get("/api/v1/credits/pending")
            .authorization_bearer(&token)
            .await;
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        // The admin can
        let (admin_token, _, _) = register_and_login(&server, ADMIN_EMAIL).await;
        let pending: Value = server
            .get("/api/v1/credits/pending")
            .authorization_bearer(&admin_token)
            .await
            .json();
        assert_eq!(pending.as_array().unwrap().len(), 1);

        let resolved = server
            .post("/api/v1/credits/evaluate")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "application_id": submitted["id"],
                "decision": "APPROVED"
            }))
            .await;
        resolved.assert_status_ok();

        // Second decision conflicts
        let again = server
            .post("/api/v1/credits/evaluate")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "application_id": submitted["id"],
                "decision": "REJECTED",
                "reason": "changed our minds"
            }))
            .await;
        assert_eq!(again.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_rejection_without_reason_is_invalid() {
        let server = test_server();
        let (token, customer_id, _) = register_and_login(&server, "c@example.com").await;
        let (admin_token, _, _) = register_and_login(&server, ADMIN_EMAIL).await;

        let submitted: Value = server
            .post("/api/v1/credits/submit")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": customer_id,
                "requested_amount": 5000,
                "installment_count": 12,
                "purpose": "laptop"
            }))
            .await
            .json();

        let response = server
            .post("/api/v1/credits/evaluate")
            .authorization_bearer(&admin_token)
            .json(&json!({
                "application_id": submitted["id"],
                "decision": "REJECTED"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_credit_history_endpoint() {
        let server = test_server();
        let (token, customer_id, _) = register_and_login(&server, "c@example.com").await;

        server
            .post("/api/v1/credits/apply")
            .authorization_bearer(&token)
            .json(&json!({
                "customer_id": customer_id,
                "requested_amount": 1000,
                "installment_count": 6,
                "purpose": "tv"
            }))
            .await
            .assert_status_ok();

        let history: Value = server
            .get(&format!("/api/v1/credits/customer/{customer_id}"))
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(history.as_array().unwrap().len(), 1);
    }
}

mod admin_flow {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_snapshot_requires_admin_role() {
        let server = test_server();
        let (token, _, _) = register_and_login(&server, "c@example.com").await;

        let response = server
            .get("/api/v1/admin/db")
            .authorization_bearer(&token)
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_snapshot_lists_everything() {
        let server = test_server();
        let (token, _, number) = register_and_login(&server, "c@example.com").await;
        let (admin_token, _, _) = register_and_login(&server, ADMIN_EMAIL).await;

        server
            .post("/api/v1/transactions/deposit")
            .authorization_bearer(&token)
            .json(&json!({ "to_account": number, "amount": 42 }))
            .await
            .assert_status_ok();

        let snapshot: Value = server
            .get("/api/v1/admin/db")
            .authorization_bearer(&admin_token)
            .await
            .json();

        assert_eq!(snapshot["customers"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["accounts"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["transactions"].as_array().unwrap().len(), 1);
        assert!(snapshot["customers"][0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_customer_listing_is_admin_only() {
        let server = test_server();
        let (token, _, _) = register_and_login(&server, "c@example.com").await;
        let (admin_token, _, _) = register_and_login(&server, ADMIN_EMAIL).await;

        let forbidden = server
            .get("/api/v1/customers")
            .authorization_bearer(&token)
            .await;
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let customers: Value = server
            .get("/api/v1/customers")
            .authorization_bearer(&admin_token)
            .await
            .json();
        assert_eq!(customers.as_array().unwrap().len(), 2);
    }
}
