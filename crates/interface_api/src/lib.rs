//! HTTP API Layer
//!
//! This crate provides the REST API for the banking core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each domain
//! - **Middleware**: Authentication, admin gating, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! The application state carries the store ports as trait objects, so
//! the same router runs against PostgreSQL in production and against the
//! in-memory bank in tests. All collaborators arrive through explicit
//! construction; there is no ambient registry.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod auth;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_account::AccountStore;
use domain_credit::CreditStore;
use domain_customer::CustomerStore;
use domain_ledger::LedgerStore;

use crate::auth::PasswordHasher;
use crate::config::ApiConfig;
use crate::middleware::{audit_middleware, auth_middleware, require_admin};
use crate::handlers::{account, admin, credit, customer, health, transaction};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub credit: Arc<dyn CreditStore>,
    pub health: Arc<dyn HealthCheckable>,
    pub hasher: PasswordHasher,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Application state with the store ports and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Account routes
    let account_routes = Router::new()
        .route("/", post(account::create_account))
        .route("/customer/:customer_id", get(account::list_for_customer));

    // Money movement routes
    let transaction_routes = Router::new()
        .route("/transfer", post(transaction::transfer))
        .route("/deposit", post(transaction::deposit))
        .route("/withdraw", post(transaction::withdraw))
        .route("/account/:account_id", get(transaction::history_for_account));

    // Credit routes
    let credit_routes = Router::new()
        .route("/apply", post(credit::apply))
        .route("/submit", post(credit::submit_for_review))
        .route("/customer/:customer_id", get(credit::history_for_customer));

    // Admin-only routes
    let admin_routes = Router::new()
        .route("/customers", get(customer::list_customers))
        .route("/customers/:customer_id", delete(customer::deactivate_customer))
        .route("/credits/evaluate", post(credit::evaluate))
        .route("/credits/pending", get(credit::pending))
        .route("/admin/db", get(admin::database_snapshot))
        .layer(axum_middleware::from_fn(require_admin));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/accounts", account_routes)
        .nest("/transactions", transaction_routes)
        .nest("/credits", credit_routes)
        .merge(admin_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
