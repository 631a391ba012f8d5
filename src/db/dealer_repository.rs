//! Dealer (tenant) repository

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{parse_stored_date, parse_timestamp};
use crate::models::Dealer;

#[derive(Debug, sqlx::FromRow)]
struct DealerRow {
    id: String,
    company_name: String,
    primary_contact_name: String,
    primary_contact_email: String,
    primary_contact_phone: String,
    address: String,
    status: String,
    created_at: String,
    suspension_reason: Option<String>,
    deletion_reason: Option<String>,
    deletion_date: Option<String>,
}

const DEALER_COLUMNS: &str = "id, company_name, primary_contact_name, primary_contact_email, \
     primary_contact_phone, address, status, created_at, suspension_reason, deletion_reason, \
     deletion_date";

pub struct DealerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DealerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All dealers, newest first
    pub async fn list(&self) -> Result<Vec<Dealer>> {
        let rows = sqlx::query_as::<_, DealerRow>(&format!(
            "SELECT {DEALER_COLUMNS} FROM dealers ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await
        .context("Failed to list dealers")?;

        rows.into_iter().map(row_to_dealer).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Dealer>> {
        let row = sqlx::query_as::<_, DealerRow>(&format!(
            "SELECT {DEALER_COLUMNS} FROM dealers WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch dealer")?;

        row.map(row_to_dealer).transpose()
    }

    pub async fn insert(&self, dealer: &Dealer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dealers (id, company_name, primary_contact_name, primary_contact_email,
                primary_contact_phone, address, status, created_at, suspension_reason,
                deletion_reason, deletion_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(dealer.id.to_string())
        .bind(&dealer.company_name)
        .bind(&dealer.primary_contact_name)
        .bind(&dealer.primary_contact_email)
        .bind(&dealer.primary_contact_phone)
        .bind(&dealer.address)
        .bind(dealer.status.to_string())
        .bind(dealer.created_at.to_rfc3339())
        .bind(dealer.suspension_reason.as_deref())
        .bind(dealer.deletion_reason.as_deref())
        .bind(dealer.deletion_date.map(|d| d.to_string()))
        .execute(self.pool)
        .await
        .context("Failed to insert dealer")?;

        Ok(())
    }

    /// Persist all mutable fields of a dealer (profile and status alike)
    pub async fn update(&self, dealer: &Dealer) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE dealers
            SET company_name = ?, primary_contact_name = ?, primary_contact_email = ?,
                primary_contact_phone = ?, address = ?, status = ?, suspension_reason = ?,
                deletion_reason = ?, deletion_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&dealer.company_name)
        .bind(&dealer.primary_contact_name)
        .bind(&dealer.primary_contact_email)
        .bind(&dealer.primary_contact_phone)
        .bind(&dealer.address)
        .bind(dealer.status.to_string())
        .bind(dealer.suspension_reason.as_deref())
        .bind(dealer.deletion_reason.as_deref())
        .bind(dealer.deletion_date.map(|d| d.to_string()))
        .bind(dealer.id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update dealer")?;

        Ok(())
    }

    /// Hard-remove a dealer row. Dealers are never deleted through the
    /// lifecycle API; this exists solely to roll back a half-provisioned
    /// onboarding whose paired account collided.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM dealers WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to remove dealer")?;

        Ok(())
    }
}

fn row_to_dealer(row: DealerRow) -> Result<Dealer> {
    Ok(Dealer {
        id: Uuid::parse_str(&row.id).context("Invalid dealer id in database")?,
        company_name: row.company_name,
        primary_contact_name: row.primary_contact_name,
        primary_contact_email: row.primary_contact_email,
        primary_contact_phone: row.primary_contact_phone,
        address: row.address,
        status: row
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid dealer status in database")?,
        created_at: parse_timestamp(&row.created_at)?,
        suspension_reason: row.suspension_reason,
        deletion_reason: row.deletion_reason,
        deletion_date: row
            .deletion_date
            .as_deref()
            .map(parse_stored_date)
            .transpose()?,
    })
}
