//! Customer repository

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_stored_date;
use crate::models::Customer;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    dealer_id: String,
    #[sqlx(rename = "type")]
    customer_type: String,
    name_or_entity: String,
    contact_person: Option<String>,
    phone: String,
    email: String,
    official_id: String,
    address: String,
    status: String,
    termination_date: Option<String>,
    termination_reason: Option<String>,
}

/// Customer row joined with the owning dealer's display name, for the
/// cross-tenant index
#[derive(Debug, sqlx::FromRow)]
struct CustomerWithDealerRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    dealer_name: String,
}

const CUSTOMER_COLUMNS: &str = "id, dealer_id, type, name_or_entity, contact_person, phone, \
     email, official_id, address, status, termination_date, termination_reason";

pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One dealer's customers
    pub async fn list_by_dealer(&self, dealer_id: Uuid) -> Result<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE dealer_id = ? ORDER BY name_or_entity"
        ))
        .bind(dealer_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list customers")?;

        rows.into_iter().map(row_to_customer).collect()
    }

    /// Every customer across every dealer, with the owning dealer's
    /// company name. The one read that crosses tenant boundaries.
    pub async fn list_all_with_dealer(&self) -> Result<Vec<(Customer, String)>> {
        let rows = sqlx::query_as::<_, CustomerWithDealerRow>(
            r#"
            SELECT c.id, c.dealer_id, c.type, c.name_or_entity, c.contact_person, c.phone,
                   c.email, c.official_id, c.address, c.status, c.termination_date,
                   c.termination_reason, d.company_name AS dealer_name
            FROM customers c
            INNER JOIN dealers d ON d.id = c.dealer_id
            "#,
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list customers with dealers")?;

        rows.into_iter()
            .map(|row| Ok((row_to_customer(row.customer)?, row.dealer_name)))
            .collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch customer")?;

        row.map(row_to_customer).transpose()
    }

    pub async fn insert(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, dealer_id, type, name_or_entity, contact_person, phone,
                email, official_id, address, status, termination_date, termination_reason)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.to_string())
        .bind(customer.dealer_id.to_string())
        .bind(customer.customer_type.to_string())
        .bind(&customer.name_or_entity)
        .bind(customer.contact_person.as_deref())
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.official_id)
        .bind(&customer.address)
        .bind(customer.status.to_string())
        .bind(customer.termination_date.map(|d| d.to_string()))
        .bind(customer.termination_reason.as_deref())
        .execute(self.pool)
        .await
        .context("Failed to insert customer")?;

        Ok(())
    }

    pub async fn update(&self, customer: &Customer) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE customers
            SET type = ?, name_or_entity = ?, contact_person = ?, phone = ?, email = ?,
                official_id = ?, address = ?, status = ?, termination_date = ?,
                termination_reason = ?
            WHERE id = ?
            "#,
        )
        .bind(customer.customer_type.to_string())
        .bind(&customer.name_or_entity)
        .bind(customer.contact_person.as_deref())
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.official_id)
        .bind(&customer.address)
        .bind(customer.status.to_string())
        .bind(customer.termination_date.map(|d| d.to_string()))
        .bind(customer.termination_reason.as_deref())
        .bind(customer.id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update customer")?;

        Ok(())
    }
}

fn row_to_customer(row: CustomerRow) -> Result<Customer> {
    Ok(Customer {
        id: Uuid::parse_str(&row.id).context("Invalid customer id in database")?,
        dealer_id: Uuid::parse_str(&row.dealer_id).context("Invalid dealer id in database")?,
        customer_type: row
            .customer_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid customer type in database")?,
        name_or_entity: row.name_or_entity,
        contact_person: row.contact_person,
        phone: row.phone,
        email: row.email,
        official_id: row.official_id,
        address: row.address,
        status: row
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid customer status in database")?,
        termination_date: row
            .termination_date
            .as_deref()
            .map(parse_stored_date)
            .transpose()?,
        termination_reason: row.termination_reason,
    })
}
