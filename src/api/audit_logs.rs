//! Audit log API endpoints
//!
//! Chronological listing, newest first. Administrators see the entire
//! trail; dealer members see entries recorded in their own tenant
//! context only.

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    db::AuditRepository,
    middleware::Session,
    models::AuditLogEntry,
    utils::AppResult,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_audit_logs))
}

/// GET /api/v1/audit-logs
async fn list_audit_logs(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<AuditLogEntry>>> {
    let repo = AuditRepository::new(&state.db);
    let logs = match session.dealer_id {
        None => repo.list_all().await?,
        Some(dealer_id) => repo.list_by_dealer(dealer_id).await?,
    };
    Ok(Json(logs))
}
