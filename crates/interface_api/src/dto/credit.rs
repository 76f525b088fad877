//! Credit application DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_credit::CreditApplication;

#[derive(Debug, Deserialize)]
pub struct CreditApplyRequest {
    pub customer_id: Uuid,
    pub requested_amount: Decimal,
    pub installment_count: u32,
    pub purpose: String,
}

/// Administrator's decision on a pending application
#[derive(Debug, Deserialize)]
pub struct CreditEvaluationRequest {
    pub application_id: Uuid,
    /// "APPROVED" or "REJECTED"
    pub decision: String,
    /// Required when rejecting
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreditApplicationResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub requested_amount: Decimal,
    pub installment_count: u32,
    pub purpose: String,
    pub applied_on: NaiveDate,
    /// PENDING, APPROVED, or REJECTED
    pub status: String,
    pub rejection_reason: Option<String>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl From<CreditApplication> for CreditApplicationResponse {
    fn from(application: CreditApplication) -> Self {
        Self {
            id: (*application.id.as_uuid()),
            customer_id: (*application.customer_id.as_uuid()),
            requested_amount: application.requested_amount,
            installment_count: application.installment_count,
            purpose: application.purpose,
            applied_on: application.applied_on,
            status: application.status.as_str().to_string(),
            rejection_reason: application.rejection_reason,
            evaluated_at: application.evaluated_at,
        }
    }
}
