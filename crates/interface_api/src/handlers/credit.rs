//! Credit application handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::{ApplicationId, CustomerId};
use domain_credit::{CreditRequest, ManualDecision};

use crate::dto::credit::{
    CreditApplicationResponse, CreditApplyRequest, CreditEvaluationRequest,
};
use crate::error::ApiError;
use crate::AppState;

/// Applies for credit with immediate automatic evaluation
pub async fn apply(
    State(state): State<AppState>,
    Json(request): Json<CreditApplyRequest>,
) -> Result<Json<CreditApplicationResponse>, ApiError> {
    let application = state
        .credit
        .apply_automatic(
            CustomerId::from(request.customer_id),
            CreditRequest {
                requested_amount: request.requested_amount,
                installment_count: request.installment_count,
                purpose: request.purpose,
            },
        )
        .await?;

    Ok(Json(application.into()))
}

/// Submits an application for manual review; it stays pending until an
/// administrator resolves it
pub async fn submit_for_review(
    State(state): State<AppState>,
    Json(request): Json<CreditApplyRequest>,
) -> Result<Json<CreditApplicationResponse>, ApiError> {
    let application = state
        .credit
        .submit_for_review(
            CustomerId::from(request.customer_id),
            CreditRequest {
                requested_amount: request.requested_amount,
                installment_count: request.installment_count,
                purpose: request.purpose,
            },
        )
        .await?;

    Ok(Json(application.into()))
}

/// Resolves a pending application with an administrator's decision
pub async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<CreditEvaluationRequest>,
) -> Result<Json<CreditApplicationResponse>, ApiError> {
    let decision = match request.decision.as_str() {
        "APPROVED" => ManualDecision::Approve,
        "REJECTED" => ManualDecision::Reject {
            reason: request
                .reason
                .ok_or_else(|| ApiError::Validation("rejection requires a reason".to_string()))?,
        },
        other => {
            return Err(ApiError::Validation(format!(
                "decision must be APPROVED or REJECTED, got {other}"
            )))
        }
    };

    let application = state
        .credit
        .evaluate_manual(ApplicationId::from(request.application_id), decision)
        .await?;

    Ok(Json(application.into()))
}

/// Lists applications awaiting a manual decision (admin)
pub async fn pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<CreditApplicationResponse>>, ApiError> {
    let applications = state.credit.pending().await?;
    Ok(Json(
        applications.into_iter().map(CreditApplicationResponse::from).collect(),
    ))
}

/// Lists a customer's credit history
///
/// This is a separate list from the money-transaction history; the two
/// are never merged.
pub async fn history_for_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<CreditApplicationResponse>>, ApiError> {
    let applications = state
        .credit
        .history_for_customer(CustomerId::from(customer_id))
        .await?;

    Ok(Json(
        applications.into_iter().map(CreditApplicationResponse::from).collect(),
    ))
}
