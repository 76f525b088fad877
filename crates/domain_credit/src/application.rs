//! The credit application aggregate

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ApplicationId, CustomerId};

use crate::error::CreditError;

/// Lifecycle status of a credit application
///
/// `Pending` transitions at most once, to `Approved` or `Rejected`;
/// resolved applications never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// The wire-format status tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

/// A customer's request for credit
#[derive(Debug, Clone, Serialize)]
pub struct CreditApplication {
    /// Unique identifier
    pub id: ApplicationId,
    /// Applying customer
    pub customer_id: CustomerId,
    /// Requested credit amount; always strictly positive
    pub requested_amount: Decimal,
    /// Number of repayment installments
    pub installment_count: u32,
    /// Free-form purpose statement
    pub purpose: String,
    /// Date the application was submitted
    pub applied_on: NaiveDate,
    /// Current lifecycle status
    pub status: ApplicationStatus,
    /// Set iff the application was rejected
    pub rejection_reason: Option<String>,
    /// Set iff the application was resolved
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl CreditApplication {
    /// Submits a new pending application
    pub fn submit(
        customer_id: CustomerId,
        requested_amount: Decimal,
        installment_count: u32,
        purpose: impl Into<String>,
    ) -> Result<Self, CreditError> {
        if requested_amount <= Decimal::ZERO {
            return Err(CreditError::InvalidAmount(requested_amount));
        }
        if installment_count == 0 {
            return Err(CreditError::InvalidInstallments(installment_count));
        }

        Ok(Self {
            id: ApplicationId::new(),
            customer_id,
            requested_amount,
            installment_count,
            purpose: purpose.into(),
            applied_on: Utc::now().date_naive(),
            status: ApplicationStatus::Pending,
            rejection_reason: None,
            evaluated_at: None,
        })
    }

    /// Returns true while the application awaits a decision
    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    /// Marks the application approved and stamps the evaluation time
    ///
    /// Fails with [`CreditError::AlreadyResolved`] once the application
    /// has left `Pending`.
    pub fn approve(&mut self) -> Result<(), CreditError> {
        if !self.is_pending() {
            return Err(CreditError::AlreadyResolved(self.id));
        }
        self.status = ApplicationStatus::Approved;
        self.evaluated_at = Some(Utc::now());
        Ok(())
    }

    /// Marks the application rejected with the given reason and stamps
    /// the evaluation time
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), CreditError> {
        if !self.is_pending() {
            return Err(CreditError::AlreadyResolved(self.id));
        }
        self.status = ApplicationStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self.evaluated_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pending() -> CreditApplication {
        CreditApplication::submit(CustomerId::new(), dec!(10000), 12, "car").unwrap()
    }

    #[test]
    fn test_submit_starts_pending() {
        let app = pending();
        assert!(app.is_pending());
        assert!(app.rejection_reason.is_none());
        assert!(app.evaluated_at.is_none());
    }

    #[test]
    fn test_submit_rejects_non_positive_amount() {
        let result = CreditApplication::submit(CustomerId::new(), dec!(0), 12, "car");
        assert!(matches!(result, Err(CreditError::InvalidAmount(_))));
    }

    #[test]
    fn test_submit_rejects_zero_installments() {
        let result = CreditApplication::submit(CustomerId::new(), dec!(100), 0, "car");
        assert!(matches!(result, Err(CreditError::InvalidInstallments(0))));
    }

    #[test]
    fn test_approve_stamps_evaluation() {
        let mut app = pending();
        app.approve().unwrap();
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert!(app.evaluated_at.is_some());
        assert!(app.rejection_reason.is_none());
    }

    #[test]
    fn test_reject_stores_reason() {
        let mut app = pending();
        app.reject("limit exceeded").unwrap();
        assert_eq!(app.status, ApplicationStatus::Rejected);
        assert_eq!(app.rejection_reason.as_deref(), Some("limit exceeded"));
        assert!(app.evaluated_at.is_some());
    }

    #[test]
    fn test_single_transition_only() {
        let mut app = pending();
        app.approve().unwrap();

        assert!(matches!(
            app.approve(),
            Err(CreditError::AlreadyResolved(_))
        ));
        assert!(matches!(
            app.reject("nope"),
            Err(CreditError::AlreadyResolved(_))
        ));
        // The resolved state is untouched by the failed attempts
        assert_eq!(app.status, ApplicationStatus::Approved);
        assert!(app.rejection_reason.is_none());
    }
}
