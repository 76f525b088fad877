//! Customer repository implementation
//!
//! This module provides database access for customer identity records.
//! Uniqueness of email and national id is enforced by the database
//! constraints; the repository translates violations into the domain's
//! `DuplicateIdentity` error.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use core_kernel::{CustomerId, DomainPort, PortError};
use domain_customer::{Customer, CustomerError, CustomerStore, NationalId, NewCustomer};

use super::{db_err, decode_err};

/// How many generated national ids to try before giving up
const IDENTITY_ATTEMPTS: u32 = 5;

/// Database row representation of a customer
#[derive(Debug, Clone, FromRow)]
struct CustomerRow {
    customer_id: Uuid,
    national_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    birth_date: NaiveDate,
    address: Option<String>,
    password_hash: String,
    registered_on: NaiveDate,
    is_active: bool,
}

impl CustomerRow {
    fn into_domain(self) -> Result<Customer, PortError> {
        Ok(Customer {
            id: CustomerId::from(self.customer_id),
            national_id: NationalId::parse(self.national_id).map_err(decode_err)?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            birth_date: self.birth_date,
            address: self.address,
            password_hash: self.password_hash,
            registered_on: self.registered_on,
            is_active: self.is_active,
        })
    }
}

const SELECT_CUSTOMER: &str = "SELECT customer_id, national_id, first_name, last_name, email, \
     phone, birth_date, address, password_hash, registered_on, is_active FROM customers";

/// Repository for managing customer identity records
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, customer: &Customer) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO customers \
             (customer_id, national_id, first_name, last_name, email, phone, birth_date, \
              address, password_hash, registered_on, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(customer.id.as_uuid())
        .bind(customer.national_id.as_str())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.birth_date)
        .bind(&customer.address)
        .bind(&customer.password_hash)
        .bind(customer.registered_on)
        .bind(customer.is_active)
        .execute(&self.pool)
        .await
        .map(|_| ())
    }
}

impl DomainPort for CustomerRepository {}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn register(&self, new_customer: NewCustomer) -> Result<Customer, CustomerError> {
        let generated = new_customer.national_id.is_none();

        for attempt in 0..IDENTITY_ATTEMPTS {
            let national_id = match &new_customer.national_id {
                Some(id) => id.clone(),
                None => NationalId::generate(),
            };
            let customer = Customer::register(new_customer.clone(), national_id);

            match self.insert(&customer).await {
                Ok(()) => {
                    debug!(customer = %customer.id, "registered customer");
                    return Ok(customer);
                }
                Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    match db.constraint() {
                        Some("customers_email_key") => {
                            return Err(CustomerError::DuplicateIdentity(format!(
                                "email {}",
                                customer.email
                            )))
                        }
                        Some("customers_national_id_key") if generated => {
                            // Roll a fresh one and retry
                            warn!(attempt, "generated national id collided, regenerating");
                            continue;
                        }
                        Some("customers_national_id_key") => {
                            return Err(CustomerError::DuplicateIdentity(format!(
                                "national id {}",
                                customer.national_id
                            )))
                        }
                        _ => {
                            return Err(CustomerError::Store(PortError::conflict(
                                db.message().to_string(),
                            )))
                        }
                    }
                }
                Err(e) => return Err(db_err(e).into()),
            }
        }

        Err(CustomerError::Store(PortError::conflict(
            "could not allocate a unique national id",
        )))
    }

    async fn get(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        let row: Option<CustomerRow> =
            sqlx::query_as(&format!("{SELECT_CUSTOMER} WHERE customer_id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        match row {
            Some(row) => Ok(row.into_domain()?),
            None => Err(CustomerError::NotFound(id.to_string())),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        let row: Option<CustomerRow> =
            sqlx::query_as(&format!("{SELECT_CUSTOMER} WHERE lower(email) = lower($1)"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.map(CustomerRow::into_domain).transpose()?)
    }

    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as(&format!("{SELECT_CUSTOMER} ORDER BY registered_on ASC, customer_id ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let customers = rows
            .into_iter()
            .map(CustomerRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    async fn deactivate(&self, id: CustomerId) -> Result<(), CustomerError> {
        let result = sqlx::query("UPDATE customers SET is_active = FALSE WHERE customer_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(CustomerError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
