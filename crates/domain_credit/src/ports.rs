//! Credit Domain Ports

use async_trait::async_trait;
use rust_decimal::Decimal;

use core_kernel::{ApplicationId, CustomerId, DomainPort};

use crate::application::CreditApplication;
use crate::error::CreditError;
use crate::evaluation::ManualDecision;

/// A customer's credit request as received from the API edge
#[derive(Debug, Clone)]
pub struct CreditRequest {
    pub requested_amount: Decimal,
    pub installment_count: u32,
    pub purpose: String,
}

/// The main port trait for credit operations
///
/// The two evaluation methods are atomic units: application state,
/// evaluation stamp, and any disbursement (balance change plus ledger
/// entry) commit together or not at all.
#[async_trait]
pub trait CreditStore: DomainPort {
    /// Submits and immediately evaluates an application against the
    /// underwriting rule, disbursing on approval
    async fn apply_automatic(
        &self,
        customer_id: CustomerId,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditError>;

    /// Submits an application for manual review; it stays `Pending`
    /// until an administrator resolves it
    async fn submit_for_review(
        &self,
        customer_id: CustomerId,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditError>;

    /// Applies an administrator's decision to a pending application,
    /// disbursing on approval
    async fn evaluate_manual(
        &self,
        application_id: ApplicationId,
        decision: ManualDecision,
    ) -> Result<CreditApplication, CreditError>;

    /// Lists pending applications, oldest first
    async fn pending(&self) -> Result<Vec<CreditApplication>, CreditError>;

    /// Lists every application a customer has made, newest first
    ///
    /// Credit history is a separate list from the money-transaction
    /// history; the two are never merged.
    async fn history_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CreditApplication>, CreditError>;

    /// Lists every application (admin snapshot)
    async fn list_all(&self) -> Result<Vec<CreditApplication>, CreditError>;
}
