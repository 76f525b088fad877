//! In-memory bank adapter
//!
//! Implements every store port over one mutex-guarded state, for unit
//! and integration tests that need the full bank without a database.
//! Whole operations run under the lock, which is exactly the
//! serialization the ports demand: two concurrent debits cannot
//! interleave between the funds check and the balance write. Domain
//! rules come from the same pure functions the PostgreSQL adapters use,
//! so behavior matches across adapters.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use core_kernel::{
    AccountId, AdapterHealth, ApplicationId, CustomerId, DomainPort, HealthCheckResult,
    HealthCheckable, PortError,
};
use domain_account::{
    ops, Account, AccountError, AccountNumber, AccountStore, NewAccount,
};
use domain_credit::{
    evaluate_automatic, resolve_manual, CreditApplication, CreditError, CreditRequest,
    CreditStore, Disbursement, ManualDecision, UnderwritingRule,
};
use domain_customer::{Customer, CustomerError, CustomerStore, NationalId, NewCustomer};
use domain_ledger::{LedgerError, LedgerStore, Transaction};

/// Description recorded on disbursement ledger entries
const DISBURSEMENT_NOTE: &str = "Credit disbursement";

#[derive(Debug, Default)]
struct BankState {
    customers: HashMap<CustomerId, Customer>,
    accounts: HashMap<AccountId, Account>,
    ledger: Vec<Transaction>,
    applications: HashMap<ApplicationId, CreditApplication>,
}

impl BankState {
    fn account_by_number(&self, number: &AccountNumber) -> Option<Account> {
        self.accounts.values().find(|a| &a.number == number).cloned()
    }

    /// A customer's accounts, earliest opened first
    fn customer_accounts(&self, customer_id: CustomerId) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| (a.opened_at, a.id));
        accounts
    }

    /// Applies a disbursement: credit the target account and record the
    /// paired DEPOSIT entry
    fn apply_disbursement(&mut self, disbursement: Disbursement) -> Result<(), CreditError> {
        let account = self
            .accounts
            .get_mut(&disbursement.account_id)
            .ok_or_else(|| PortError::internal("disbursement target missing"))?;

        account.credit(disbursement.amount)?;
        let entry = Transaction::deposit(
            account.id,
            disbursement.amount,
            account.currency(),
            Some(DISBURSEMENT_NOTE.to_string()),
        )
        .map_err(AccountError::from)?;
        self.ledger.push(entry);
        Ok(())
    }
}

/// An in-memory bank implementing every store port
///
/// Cloning shares the underlying state, mirroring how the PostgreSQL
/// repositories share one pool.
#[derive(Debug, Clone, Default)]
pub struct MemoryBank {
    state: Arc<Mutex<BankState>>,
    rule: UnderwritingRule,
}

impl MemoryBank {
    /// Creates an empty bank with the standard underwriting rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an account's balance directly, bypassing the ledger
    ///
    /// Test seeding only; production balances change exclusively through
    /// the money-movement operations.
    pub async fn set_balance(&self, account_id: AccountId, amount: Decimal) {
        let mut state = self.state.lock().await;
        if let Some(account) = state.accounts.get_mut(&account_id) {
            account.balance = core_kernel::Money::new(amount, account.currency());
        }
    }
}

impl DomainPort for MemoryBank {}

#[async_trait]
impl HealthCheckable for MemoryBank {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "memory-bank".to_string(),
            status: AdapterHealth::Healthy,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl CustomerStore for MemoryBank {
    async fn register(&self, new_customer: NewCustomer) -> Result<Customer, CustomerError> {
        let mut state = self.state.lock().await;

        if state
            .customers
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(&new_customer.email))
        {
            return Err(CustomerError::DuplicateIdentity(format!(
                "email {}",
                new_customer.email
            )));
        }

        let national_id = match &new_customer.national_id {
            Some(id) => {
                if state
                    .customers
                    .values()
                    .any(|c| c.national_id.as_str() == id.as_str())
                {
                    return Err(CustomerError::DuplicateIdentity(format!("national id {id}")));
                }
                id.clone()
            }
            None => loop {
                let candidate = NationalId::generate();
                let taken = state
                    .customers
                    .values()
                    .any(|c| c.national_id.as_str() == candidate.as_str());
                if !taken {
                    break candidate;
                }
            },
        };

        let customer = Customer::register(new_customer, national_id);
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.state
            .lock()
            .await
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| CustomerError::NotFound(id.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        Ok(self
            .state
            .lock()
            .await
            .customers
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let state = self.state.lock().await;
        let mut customers: Vec<Customer> = state.customers.values().cloned().collect();
        customers.sort_by_key(|c| (c.registered_on, c.id));
        Ok(customers)
    }

    async fn deactivate(&self, id: CustomerId) -> Result<(), CustomerError> {
        let mut state = self.state.lock().await;
        let customer = state
            .customers
            .get_mut(&id)
            .ok_or_else(|| CustomerError::NotFound(id.to_string()))?;
        customer.deactivate();
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryBank {
    async fn open(&self, new_account: NewAccount) -> Result<Account, AccountError> {
        let mut state = self.state.lock().await;

        if !state.customers.contains_key(&new_account.customer_id) {
            return Err(AccountError::Store(PortError::not_found(
                "Customer",
                new_account.customer_id,
            )));
        }

        let number = loop {
            let candidate = AccountNumber::generate();
            if state.account_by_number(&candidate).is_none() {
                break candidate;
            }
        };

        let account = Account::open(new_account.customer_id, number, new_account.currency);
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get(&self, id: AccountId) -> Result<Account, AccountError> {
        self.state
            .lock()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    async fn find_by_number(&self, number: &AccountNumber) -> Result<Account, AccountError> {
        self.state
            .lock()
            .await
            .account_by_number(number)
            .ok_or_else(|| AccountError::NotFound(number.to_string()))
    }

    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Account>, AccountError> {
        Ok(self.state.lock().await.customer_accounts(customer_id))
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| (a.opened_at, a.id));
        Ok(accounts)
    }

    async fn transfer(
        &self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError> {
        let mut state = self.state.lock().await;

        let mut from_account = state
            .account_by_number(from)
            .ok_or_else(|| AccountError::NotFound(from.to_string()))?;
        let mut to_account = state
            .account_by_number(to)
            .ok_or_else(|| AccountError::NotFound(to.to_string()))?;

        let entry = ops::transfer(&mut from_account, &mut to_account, amount, description)?;

        // All checks passed; make the whole unit visible at once
        state.accounts.insert(from_account.id, from_account);
        state.accounts.insert(to_account.id, to_account);
        state.ledger.push(entry.clone());
        Ok(entry)
    }

    async fn deposit(
        &self,
        to: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError> {
        let mut state = self.state.lock().await;

        let mut account = state
            .account_by_number(to)
            .ok_or_else(|| AccountError::NotFound(to.to_string()))?;

        let entry = ops::deposit(&mut account, amount, description)?;

        state.accounts.insert(account.id, account);
        state.ledger.push(entry.clone());
        Ok(entry)
    }

    async fn withdraw(
        &self,
        from: &AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, AccountError> {
        let mut state = self.state.lock().await;

        let mut account = state
            .account_by_number(from)
            .ok_or_else(|| AccountError::NotFound(from.to_string()))?;

        let entry = ops::withdraw(&mut account, amount, description)?;

        state.accounts.insert(account.id, account);
        state.ledger.push(entry.clone());
        Ok(entry)
    }
}

#[async_trait]
impl LedgerStore for MemoryBank {
    async fn history_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.state.lock().await;
        let mut entries: Vec<Transaction> = state
            .ledger
            .iter()
            .filter(|tx| tx.kind.touches(account_id))
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.posted_at, b.id).cmp(&(a.posted_at, a.id)));
        Ok(entries)
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.state.lock().await;
        let mut entries = state.ledger.clone();
        entries.sort_by(|a, b| (b.posted_at, b.id).cmp(&(a.posted_at, a.id)));
        Ok(entries)
    }
}

#[async_trait]
impl CreditStore for MemoryBank {
    async fn apply_automatic(
        &self,
        customer_id: CustomerId,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditError> {
        let mut state = self.state.lock().await;

        if !state.customers.contains_key(&customer_id) {
            return Err(CreditError::NotFound(format!("customer {customer_id}")));
        }

        let accounts = state.customer_accounts(customer_id);
        let mut application = CreditApplication::submit(
            customer_id,
            request.requested_amount,
            request.installment_count,
            request.purpose,
        )?;

        let disbursement = evaluate_automatic(&mut application, &accounts, &self.rule)?;

        if let Some(disbursement) = disbursement {
            state.apply_disbursement(disbursement)?;
        }
        state.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn submit_for_review(
        &self,
        customer_id: CustomerId,
        request: CreditRequest,
    ) -> Result<CreditApplication, CreditError> {
        let mut state = self.state.lock().await;

        if !state.customers.contains_key(&customer_id) {
            return Err(CreditError::NotFound(format!("customer {customer_id}")));
        }

        let application = CreditApplication::submit(
            customer_id,
            request.requested_amount,
            request.installment_count,
            request.purpose,
        )?;
        state.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn evaluate_manual(
        &self,
        application_id: ApplicationId,
        decision: ManualDecision,
    ) -> Result<CreditApplication, CreditError> {
        let mut state = self.state.lock().await;

        let mut application = state
            .applications
            .get(&application_id)
            .cloned()
            .ok_or_else(|| CreditError::NotFound(format!("application {application_id}")))?;

        let accounts = state.customer_accounts(application.customer_id);
        let disbursement = resolve_manual(&mut application, decision, &accounts)?;

        if let Some(disbursement) = disbursement {
            state.apply_disbursement(disbursement)?;
        }
        state.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn pending(&self) -> Result<Vec<CreditApplication>, CreditError> {
        let state = self.state.lock().await;
        let mut applications: Vec<CreditApplication> = state
            .applications
            .values()
            .filter(|a| a.is_pending())
            .cloned()
            .collect();
        applications.sort_by_key(|a| (a.applied_on, a.id));
        Ok(applications)
    }

    async fn history_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CreditApplication>, CreditError> {
        let state = self.state.lock().await;
        let mut applications: Vec<CreditApplication> = state
            .applications
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| (b.applied_on, b.id).cmp(&(a.applied_on, a.id)));
        Ok(applications)
    }

    async fn list_all(&self) -> Result<Vec<CreditApplication>, CreditError> {
        let state = self.state.lock().await;
        let mut applications: Vec<CreditApplication> =
            state.applications.values().cloned().collect();
        applications.sort_by(|a, b| (b.applied_on, b.id).cmp(&(a.applied_on, a.id)));
        Ok(applications)
    }
}
