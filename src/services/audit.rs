//! Audit recorder
//!
//! Appends one immutable entry per mutating or search action, attributed
//! to the acting account and its tenant context. Recording is
//! best-effort: a failed write is logged and never aborts the action it
//! describes.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db::{AuditRepository, DealerRepository},
    middleware::Session,
    models::{AuditActionType, AuditLogEntry, User},
};

pub struct AuditRecorder {
    pool: SqlitePool,
}

impl AuditRecorder {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an action taken by an authenticated session.
    pub async fn record(
        &self,
        session: &Session,
        action_type: AuditActionType,
        details: impl Into<String>,
        ip_address: &str,
    ) {
        let who_user_name = self
            .actor_label(&session.name, &session.username, session.dealer_id)
            .await;
        self.append(AuditLogEntry {
            id: Uuid::new_v4(),
            who_user_id: session.user_id,
            who_user_name,
            dealer_id: session.dealer_id,
            action_type,
            details: details.into(),
            ip_address: ip_address.to_string(),
            timestamp: Utc::now(),
        })
        .await;
    }

    /// Record an action affecting an account outside a session, e.g. a
    /// forgot-password reset.
    pub async fn record_for_user(
        &self,
        user: &User,
        action_type: AuditActionType,
        details: impl Into<String>,
        ip_address: &str,
    ) {
        let who_user_name = self
            .actor_label(&user.name, &user.username, user.dealer_id)
            .await;
        self.append(AuditLogEntry {
            id: Uuid::new_v4(),
            who_user_id: user.id,
            who_user_name,
            dealer_id: user.dealer_id,
            action_type,
            details: details.into(),
            ip_address: ip_address.to_string(),
            timestamp: Utc::now(),
        })
        .await;
    }

    /// `Name (username)` for administrators, `Name (username at Company)`
    /// for dealer members.
    async fn actor_label(&self, name: &str, username: &str, dealer_id: Option<Uuid>) -> String {
        match dealer_id {
            None => format!("{} ({})", name, username),
            Some(dealer_id) => {
                let company = DealerRepository::new(&self.pool)
                    .get_by_id(dealer_id)
                    .await
                    .ok()
                    .flatten()
                    .map(|d| d.company_name)
                    .unwrap_or_else(|| "Unknown".to_string());
                format!("{} ({} at {})", name, username, company)
            }
        }
    }

    async fn append(&self, entry: AuditLogEntry) {
        if let Err(err) = AuditRepository::new(&self.pool).insert(&entry).await {
            // Must not block the action being described, but must not
            // vanish silently either.
            tracing::error!(
                action = entry.action_type.as_str(),
                user = %entry.who_user_id,
                error = %err,
                "Failed to write audit log entry"
            );
        }
    }
}
