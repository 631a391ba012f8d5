//! Universal search API endpoint
//!
//! Open to every authenticated account regardless of tenant: this is the
//! deliberate breach of tenant isolation that lets the association share
//! termination history. Each executed query is itself audited, since it
//! reveals who the caller is investigating.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};

use crate::{
    api::client_ip,
    middleware::Session,
    models::{AuditActionType, GlobalSearchResult, SearchParams},
    services::{AuditRecorder, SearchService},
    utils::AppResult,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(universal_search))
}

/// GET /api/v1/search?q=...
async fn universal_search(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<GlobalSearchResult>>> {
    // An empty query is not a search: no results, no audit entry.
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let results = SearchService::new(state.db.clone()).search(&params.q).await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::Search,
            format!("Searched for: \"{}\"", params.q),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(results))
}
