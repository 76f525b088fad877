//! Credit repository implementation
//!
//! Both evaluation flows are single database transactions: the
//! application row, the evaluation stamp, and any disbursement (balance
//! update plus DEPOSIT ledger entry) commit together or roll back
//! together. Account rows are locked through the shared helpers so
//! disbursement serializes against concurrent transfers.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{ApplicationId, CustomerId, DomainPort, PortError};
use domain_account::AccountError;
use domain_credit::{
    evaluate_automatic, resolve_manual, ApplicationStatus, CreditApplication, CreditError,
    CreditRequest, CreditStore, Disbursement, ManualDecision, UnderwritingRule,
};
use domain_ledger::Transaction;

use super::{
    customer_exists, db_err, decode_err, fetch_customer_accounts_for_update,
    insert_transaction, update_account_balance,
};

/// Description recorded on disbursement ledger entries
const DISBURSEMENT_NOTE: &str = "Credit disbursement";

/// Database row representation of a credit application
#[derive(Debug, Clone, FromRow)]
struct ApplicationRow {
    application_id: Uuid,
    customer_id: Uuid,
    requested_amount: Decimal,
    installment_count: i32,
    purpose: String,
    applied_on: NaiveDate,
    status: String,
    rejection_reason: Option<String>,
    evaluated_at: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    fn into_domain(self) -> Result<CreditApplication, PortError> {
        let status = match self.status.as_str() {
            "PENDING" => ApplicationStatus::Pending,
            "APPROVED" => ApplicationStatus::Approved,
            "REJECTED" => ApplicationStatus::Rejected,
            other => return Err(decode_err(format!("unknown application status: {other}"))),
        };

        Ok(CreditApplication {
            id: ApplicationId::from(self.application_id),
            customer_id: CustomerId::from(self.customer_id),
            requested_amount: self.requested_amount,
            installment_count: u32::try_from(self.installment_count).map_err(decode_err)?,
            purpose: self.purpose,
            applied_on: self.applied_on,
            status,
            rejection_reason: self.rejection_reason,
            evaluated_at: self.evaluated_at,
        })
    }
}

const SELECT_APPLICATION: &str = "SELECT application_id, customer_id, requested_amount, \
     installment_count, purpose, applied_on, status, rejection_reason, evaluated_at \
     FROM credit_applications";

async fn insert_application(
    conn: &mut PgConnection,
    application: &CreditApplication,
) -> Result<(), PortError> {
    sqlx::query(
        "INSERT INTO credit_applications \
         (application_id, customer_id, requested_amount, installment_count, purpose, \
          applied_on, status, rejection_reason, evaluated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(application.id.as_uuid())
    .bind(application.customer_id.as_uuid())
    .bind(application.requested_amount)
    .bind(application.installment_count as i32)
    .bind(&application.purpose)
    .bind(application.applied_on)
    .bind(application.status.as_str())
    .bind(&application.rejection_reason)
    .bind(application.evaluated_at)
    .execute(conn)
    .await
    .map_err(db_err)?;

    Ok(())
}

async fn update_application(
    conn: &mut PgConnection,
    application: &CreditApplication,
) -> Result<(), PortError> {
    sqlx::query(
        "UPDATE credit_applications \
         SET status = $2, rejection_reason = $3, evaluated_at = $4 \
         WHERE application_id = $1",
    )
    .bind(application.id.as_uuid())
    .bind(application.status.as_str())
    .bind(&application.rejection_reason)
    .bind(application.evaluated_at)
    .execute(conn)
    .await
    .map_err(db_err)?;

    Ok(())
}

/// Credits the disbursed amount into the target account and records the
/// paired ledger entry, inside the caller's transaction
async fn apply_disbursement(
    conn: &mut PgConnection,
    accounts: &mut [domain_account::Account],
    disbursement: Disbursement,
) -> Result<(), CreditError> {
    let account = accounts
        .iter_mut()
        .find(|a| a.id == disbursement.account_id)
        .ok_or_else(|| PortError::internal("disbursement target not among locked accounts"))?;

    account.credit(disbursement.amount)?;

    let entry = Transaction::deposit(
        account.id,
        disbursement.amount,
        account.currency(),
        Some(DISBURSEMENT_NOTE.to_string()),
    )
    .map_err(AccountError::from)?;

    update_account_balance(conn, account).await?;
    insert_transaction(conn, &entry).await?;
    Ok(())
}

/// Repository for credit applications and the evaluation flows
#[derive(Debug, Clone)]
pub struct CreditRepository {
    pool: PgPool,
    rule: UnderwritingRule,
}

impl CreditRepository {
    /// Creates a new CreditRepository with the given connection pool and
    /// the standard underwriting rule
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            rule: UnderwritingRule::default(),
        }
    }
}

impl DomainPort for CreditRepository {}

#[async_trait]
impl CreditStore for CreditRepository {
    async fn apply_automatic(
        &self,
        customer_id: CustomerId,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        if !customer_exists(&mut tx, customer_id).await? {
            return Err(CreditError::NotFound(format!("customer {customer_id}")));
        }

        let mut accounts = fetch_customer_accounts_for_update(&mut tx, customer_id).await?;

        let mut application = CreditApplication::submit(
            customer_id,
            request.requested_amount,
            request.installment_count,
            request.purpose,
        )?;

        let disbursement = evaluate_automatic(&mut application, &accounts, &self.rule)?;

        insert_application(&mut tx, &application).await?;
        if let Some(disbursement) = disbursement {
            apply_disbursement(&mut tx, &mut accounts, disbursement).await?;
        }

        tx.commit().await.map_err(db_err)?;

        debug!(
            application = %application.id,
            status = application.status.as_str(),
            "automatic evaluation completed"
        );
        Ok(application)
    }

    async fn submit_for_review(
        &self,
        customer_id: CustomerId,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;

        if !customer_exists(&mut conn, customer_id).await? {
            return Err(CreditError::NotFound(format!("customer {customer_id}")));
        }

        let application = CreditApplication::submit(
            customer_id,
            request.requested_amount,
            request.installment_count,
            request.purpose,
        )?;

        insert_application(&mut conn, &application).await?;

        debug!(application = %application.id, "submitted for manual review");
        Ok(application)
    }

    async fn evaluate_manual(
        &self,
        application_id: ApplicationId,
        decision: ManualDecision,
    ) -> Result<CreditApplication, CreditError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "{SELECT_APPLICATION} WHERE application_id = $1 FOR UPDATE"
        ))
        .bind(application_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let mut application = row
            .ok_or_else(|| CreditError::NotFound(format!("application {application_id}")))?
            .into_domain()?;

        let mut accounts =
            fetch_customer_accounts_for_update(&mut tx, application.customer_id).await?;

        let disbursement = resolve_manual(&mut application, decision, &accounts)?;

        update_application(&mut tx, &application).await?;
        if let Some(disbursement) = disbursement {
            apply_disbursement(&mut tx, &mut accounts, disbursement).await?;
        }

        tx.commit().await.map_err(db_err)?;

        debug!(
            application = %application.id,
            status = application.status.as_str(),
            "manual evaluation completed"
        );
        Ok(application)
    }

    async fn pending(&self) -> Result<Vec<CreditApplication>, CreditError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "{SELECT_APPLICATION} WHERE status = 'PENDING' ORDER BY applied_on ASC, application_id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let applications = rows
            .into_iter()
            .map(ApplicationRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }

    async fn history_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CreditApplication>, CreditError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "{SELECT_APPLICATION} WHERE customer_id = $1 ORDER BY applied_on DESC, application_id DESC"
        ))
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let applications = rows
            .into_iter()
            .map(ApplicationRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }

    async fn list_all(&self) -> Result<Vec<CreditApplication>, CreditError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "{SELECT_APPLICATION} ORDER BY applied_on DESC, application_id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let applications = rows
            .into_iter()
            .map(ApplicationRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }
}
