//! Authentication API endpoints

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    api::client_ip,
    db::UserRepository,
    middleware::{auth::create_session_token, Session},
    models::{
        AdminLoginRequest, AuditActionType, AuthResponse, ChangePasswordRequest,
        ForgotPasswordRequest, LoginRequest, User, UserPublic,
    },
    services::{AuditRecorder, AuthService},
    utils::{AppError, AppResult},
    AppState,
};

/// Public authentication routes (no session required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login-admin", post(login_admin))
        .route("/login", post(login_dealer))
        .route("/forgot-password", post(forgot_password))
}

/// Protected authentication routes (session required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/change-password", post(change_password))
        .route("/me", get(get_current_user))
}

fn auth_response(
    state: &AppState,
    user: User,
    force_password_change: bool,
) -> AppResult<AuthResponse> {
    let token = create_session_token(
        &user,
        force_password_change,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to create session token: {}", e)))?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.token_expiry_hours * 3600,
        force_password_change,
        user: user.into(),
    })
}

/// Administrator login
///
/// POST /api/v1/auth/login-admin
async fn login_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let auth = AuthService::new(state.db.clone(), state.config.auth.clone());
    let (user, temp_outstanding) = auth.login_admin(&payload.password).await?;
    let force_change = user.force_password_change || temp_outstanding;

    AuditRecorder::new(state.db.clone())
        .record_for_user(
            &user,
            AuditActionType::Login,
            "Administrator logged in",
            &client_ip(&headers),
        )
        .await;

    Ok(Json(auth_response(&state, user, force_change)?))
}

/// Dealer-member login by email or username
///
/// POST /api/v1/auth/login
async fn login_dealer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let auth = AuthService::new(state.db.clone(), state.config.auth.clone());
    let (user, temp_outstanding) = auth
        .login_dealer(&payload.identifier, &payload.password)
        .await?;
    let force_change = user.force_password_change || temp_outstanding;

    AuditRecorder::new(state.db.clone())
        .record_for_user(
            &user,
            AuditActionType::Login,
            format!("User {} logged in.", user.name),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(auth_response(&state, user, force_change)?))
}

/// Forgot-password response: success-shaped regardless of whether the
/// username exists, so accounts cannot be enumerated
#[derive(Debug, Serialize)]
struct ForgotPasswordResponse {
    ok: bool,
}

/// Request a temporary credential
///
/// POST /api/v1/auth/forgot-password
async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ForgotPasswordResponse>> {
    let auth = AuthService::new(state.db.clone(), state.config.auth.clone());

    if let Some((user, temp_password)) = auth.forgot_password(&payload.username).await? {
        state
            .mailer
            .send_temporary_credential(&user.email, &user.username, &temp_password)
            .await;

        AuditRecorder::new(state.db.clone())
            .record_for_user(
                &user,
                AuditActionType::ResetPassword,
                format!("Temporary password issued for user {}", user.name),
                &client_ip(&headers),
            )
            .await;
    }

    Ok(Json(ForgotPasswordResponse { ok: true }))
}

/// Change the current account's password. Clears any outstanding
/// temporary credential and returns a fresh session token without the
/// forced-change flag.
///
/// POST /api/v1/auth/change-password
async fn change_password(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<AuthResponse>> {
    let auth = AuthService::new(state.db.clone(), state.config.auth.clone());
    let user = auth
        .change_password(session.user_id, &payload.new_password)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::ChangePassword,
            "User changed their password.",
            &client_ip(&headers),
        )
        .await;

    Ok(Json(auth_response(&state, user, false)?))
}

/// Current account profile
///
/// GET /api/v1/auth/me
async fn get_current_user(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<UserPublic>> {
    let user = UserRepository::new(&state.db)
        .get_by_id(session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    Ok(Json(user.into()))
}
