//! Session token middleware
//!
//! Bearer-token sessions signed with the configured secret. The
//! `Session` extracted here is the only source of tenant scope for
//! downstream calls; client-supplied dealer identifiers are never
//! trusted.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::{User, UserRole},
    utils::AppError,
    AppState,
};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    pub username: String,
    /// Display name, carried for audit attribution
    pub name: String,
    pub role: UserRole,
    /// Tenant scope; absent for administrators
    #[serde(default)]
    pub dealer_id: Option<String>,
    /// Account must change its password before doing anything else
    #[serde(default)]
    pub force_password_change: bool,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Not before timestamp
    pub nbf: i64,
    /// Unique identifier for this token
    pub jti: String,
}

/// Authenticated session derived from a validated token
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub dealer_id: Option<Uuid>,
    pub force_password_change: bool,
}

impl Session {
    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }

    /// The dealer scope every tenant-bound operation runs under.
    /// Administrators have none; tenant CRUD is not theirs to call.
    pub fn require_tenant(&self) -> Result<Uuid, AppError> {
        self.dealer_id.ok_or_else(|| {
            AppError::Forbidden("administrator accounts have no tenant scope".to_string())
        })
    }
}

impl TryFrom<Claims> for Session {
    type Error = &'static str;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid account id in token")?;
        let dealer_id = claims
            .dealer_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| "Invalid dealer id in token")?;
        Ok(Self {
            user_id,
            username: claims.username,
            name: claims.name,
            role: claims.role,
            dealer_id,
            force_password_change: claims.force_password_change,
        })
    }
}

/// Extractor for Session from request extensions, populated by
/// `auth_middleware`.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Create a session token for an authenticated account
pub fn create_session_token(
    user: &User,
    force_password_change: bool,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiry_hours as i64);

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        name: user.name.clone(),
        role: user.role,
        dealer_id: user.dealer_id.map(|id| id.to_string()),
        force_password_change,
        iat: now.timestamp(),
        exp: exp.timestamp(),
        nbf: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode a session token
pub fn validate_token(token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Session token has expired".to_string())
        }
        _ => AppError::Unauthorized("Invalid session token".to_string()),
    })
}

/// Paths an account with an outstanding forced password change may still
/// reach.
fn allowed_during_forced_change(path: &str) -> bool {
    path.ends_with("/auth/change-password") || path.ends_with("/auth/me")
}

/// Authentication middleware for protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return AppError::Unauthorized("Missing authentication token".to_string()).into_response();
    };

    let token_data = match validate_token(token, &state.config.auth.jwt_secret) {
        Ok(data) => data,
        Err(err) => return err.into_response(),
    };

    let session: Session = match token_data.claims.try_into() {
        Ok(session) => session,
        Err(msg) => return AppError::Unauthorized(msg.to_string()).into_response(),
    };

    // An account holding a temporary credential must change it before
    // touching anything else.
    if session.force_password_change && !allowed_during_forced_change(request.uri().path()) {
        return AppError::Forbidden("Password change required".to_string()).into_response();
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}
