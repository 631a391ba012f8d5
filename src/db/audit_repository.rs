//! Audit log repository
//!
//! Insert and list only. There is deliberately no update or delete.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_timestamp;
use crate::models::AuditLogEntry;

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: String,
    who_user_id: String,
    who_user_name: String,
    dealer_id: Option<String>,
    action_type: String,
    details: String,
    ip_address: String,
    timestamp: String,
}

const AUDIT_COLUMNS: &str =
    "id, who_user_id, who_user_name, dealer_id, action_type, details, ip_address, timestamp";

pub struct AuditRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &AuditLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, who_user_id, who_user_name, dealer_id, action_type,
                details, ip_address, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.who_user_id.to_string())
        .bind(&entry.who_user_name)
        .bind(entry.dealer_id.map(|id| id.to_string()))
        .bind(entry.action_type.as_str())
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(entry.timestamp.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to insert audit log entry")?;

        Ok(())
    }

    /// Every entry, newest first
    pub async fn list_all(&self) -> Result<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_log ORDER BY timestamp DESC, id"
        ))
        .fetch_all(self.pool)
        .await
        .context("Failed to list audit logs")?;

        rows.into_iter().map(row_to_entry).collect()
    }

    /// Entries in one dealer's tenant context, newest first
    pub async fn list_by_dealer(&self, dealer_id: Uuid) -> Result<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_log WHERE dealer_id = ? ORDER BY timestamp DESC, id"
        ))
        .bind(dealer_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list audit logs for dealer")?;

        rows.into_iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: AuditRow) -> Result<AuditLogEntry> {
    Ok(AuditLogEntry {
        id: Uuid::parse_str(&row.id).context("Invalid audit id in database")?,
        who_user_id: Uuid::parse_str(&row.who_user_id).context("Invalid user id in database")?,
        who_user_name: row.who_user_name,
        dealer_id: row
            .dealer_id
            .map(|id| Uuid::parse_str(&id).context("Invalid dealer id in database"))
            .transpose()?,
        action_type: row
            .action_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid action type in database")?,
        details: row.details,
        ip_address: row.ip_address,
        timestamp: parse_timestamp(&row.timestamp)?,
    })
}
