//! API routes and handlers

use axum::{http::HeaderMap, Router};

use crate::AppState;

mod audit_logs;
mod auth;
mod customers;
mod dealers;
mod employees;
mod health;
mod search;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::public_routes())
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::protected_routes())
        .nest("/dealers", dealers::routes())
        .nest("/employees", employees::routes())
        .nest("/customers", customers::routes())
        .nest("/search", search::routes())
        .nest("/audit-logs", audit_logs::routes())
}

/// The full API router (public + protected; useful for tests)
pub fn routes() -> Router<AppState> {
    public_routes().merge(protected_routes())
}

/// Best-effort client address for audit attribution. Proxies set
/// `X-Forwarded-For`; direct connections fall back to a marker.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "local".to_string())
}
