//! Dealer lifecycle API endpoints (administrator only)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    api::client_ip,
    db::AuditRepository,
    middleware::Session,
    models::{
        AuditActionType, AuditLogEntry, CreateDealerRequest, CreatedDealerResponse, Dealer,
        DealerActionRequest, ResetPasswordResponse, UpdateDealerRequest,
    },
    services::{AuditRecorder, DealerService},
    utils::{AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_dealers).post(create_dealer))
        .route("/{id}", put(update_dealer))
        .route("/{id}/suspend", post(suspend_dealer))
        .route("/{id}/activate", post(activate_dealer))
        .route("/{id}/delete", post(delete_dealer))
        .route("/{id}/reset-password", post(reset_dealer_password))
        .route("/{id}/audit-logs", get(dealer_audit_logs))
}

fn require_administrator(session: &Session) -> Result<(), AppError> {
    if session.is_administrator() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "administrator role required".to_string(),
        ))
    }
}

fn parse_dealer_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Dealer not found".to_string()))
}

/// GET /api/v1/dealers
async fn list_dealers(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Dealer>>> {
    require_administrator(&session)?;
    let dealers = DealerService::new(state.db.clone(), state.config.auth.clone())
        .list()
        .await?;
    Ok(Json(dealers))
}

/// POST /api/v1/dealers
///
/// Provisions the dealer and its paired member account. The response is
/// the only place the generated temporary password ever appears.
async fn create_dealer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<CreateDealerRequest>,
) -> AppResult<(StatusCode, Json<CreatedDealerResponse>)> {
    require_administrator(&session)?;

    let service = DealerService::new(state.db.clone(), state.config.auth.clone());
    let (dealer, user, temp_password) = service.onboard(&payload).await?;

    state
        .mailer
        .send_temporary_credential(&user.email, &user.username, &temp_password)
        .await;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::CreateDealer,
            format!("Created dealer {}", dealer.company_name),
            &client_ip(&headers),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(CreatedDealerResponse {
            dealer,
            username: user.username,
            temp_password,
        }),
    ))
}

/// PUT /api/v1/dealers/{id}
async fn update_dealer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDealerRequest>,
) -> AppResult<Json<Dealer>> {
    require_administrator(&session)?;
    let dealer_id = parse_dealer_id(&id)?;

    let dealer = DealerService::new(state.db.clone(), state.config.auth.clone())
        .update(dealer_id, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateDealer,
            format!("Updated dealer {}", dealer.company_name),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(dealer))
}

/// POST /api/v1/dealers/{id}/suspend
async fn suspend_dealer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<DealerActionRequest>,
) -> AppResult<Json<Dealer>> {
    require_administrator(&session)?;
    let dealer_id = parse_dealer_id(&id)?;

    let dealer = DealerService::new(state.db.clone(), state.config.auth.clone())
        .suspend(dealer_id, &payload.reason)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateDealer,
            format!(
                "Suspended dealer {}: {}",
                dealer.company_name,
                payload.reason.trim()
            ),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(dealer))
}

/// POST /api/v1/dealers/{id}/activate
async fn activate_dealer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<Dealer>> {
    require_administrator(&session)?;
    let dealer_id = parse_dealer_id(&id)?;

    let dealer = DealerService::new(state.db.clone(), state.config.auth.clone())
        .activate(dealer_id)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateDealer,
            format!("Activated dealer {}", dealer.company_name),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(dealer))
}

/// POST /api/v1/dealers/{id}/delete
///
/// Terminal: a deleted dealer never changes status again.
async fn delete_dealer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<DealerActionRequest>,
) -> AppResult<Json<Dealer>> {
    require_administrator(&session)?;
    let dealer_id = parse_dealer_id(&id)?;

    let dealer = DealerService::new(state.db.clone(), state.config.auth.clone())
        .delete(dealer_id, &payload.reason)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateDealer,
            format!(
                "Deleted dealer {}: {}",
                dealer.company_name,
                payload.reason.trim()
            ),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(dealer))
}

/// POST /api/v1/dealers/{id}/reset-password
async fn reset_dealer_password(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<ResetPasswordResponse>> {
    require_administrator(&session)?;
    let dealer_id = parse_dealer_id(&id)?;

    let (user, temp_password) = DealerService::new(state.db.clone(), state.config.auth.clone())
        .reset_password(dealer_id)
        .await?;

    state
        .mailer
        .send_temporary_credential(&user.email, &user.username, &temp_password)
        .await;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::ResetPassword,
            format!("Reset password for user {}", user.name),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(ResetPasswordResponse { temp_password }))
}

/// GET /api/v1/dealers/{id}/audit-logs
async fn dealer_audit_logs(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<AuditLogEntry>>> {
    require_administrator(&session)?;
    let dealer_id = parse_dealer_id(&id)?;

    // 404 for an unknown dealer rather than an empty list
    DealerService::new(state.db.clone(), state.config.auth.clone())
        .get(dealer_id)
        .await?;

    let logs = AuditRepository::new(&state.db)
        .list_by_dealer(dealer_id)
        .await?;
    Ok(Json(logs))
}
