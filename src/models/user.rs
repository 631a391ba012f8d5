//! Account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    /// Association administrator: dealer lifecycle, full audit visibility
    Administrator,
    /// Member account paired 1:1 with a dealer
    DealerMember,
}

impl UserRole {
    pub fn is_administrator(&self) -> bool {
        matches!(self, UserRole::Administrator)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Administrator => write!(f, "administrator"),
            UserRole::DealerMember => write!(f, "dealer-member"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(UserRole::Administrator),
            "dealer-member" => Ok(UserRole::DealerMember),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Account entity. Never hard-deleted; dealer-member accounts outlive
/// their dealer's suspension or deletion (login is gated elsewhere).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// Display name used in audit attribution
    pub name: String,
    pub role: UserRole,
    /// Present iff role is dealer-member
    pub dealer_id: Option<Uuid>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Hash of the active temporary credential, if one is outstanding
    #[serde(skip_serializing)]
    pub temp_password_hash: Option<String>,
    #[serde(skip_serializing)]
    pub temp_password_expiry: Option<DateTime<Utc>>,
    pub force_password_change: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an administrator account
    pub fn new_administrator(
        username: String,
        email: String,
        name: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            name,
            role: UserRole::Administrator,
            dealer_id: None,
            password_hash,
            temp_password_hash: None,
            temp_password_expiry: None,
            force_password_change: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a dealer-member account paired with a dealer
    pub fn new_dealer_member(
        dealer_id: Uuid,
        username: String,
        email: String,
        name: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            name,
            role: UserRole::DealerMember,
            dealer_id: Some(dealer_id),
            password_hash,
            temp_password_hash: None,
            temp_password_expiry: None,
            force_password_change: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when an outstanding temporary credential has not yet expired
    pub fn has_valid_temp_password(&self, now: DateTime<Utc>) -> bool {
        match (&self.temp_password_hash, self.temp_password_expiry) {
            (Some(_), Some(expiry)) => now < expiry,
            _ => false,
        }
    }
}

/// Account without credential material, for responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
    pub force_password_change: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            name: user.name,
            role: user.role,
            dealer_id: user.dealer_id,
            force_password_change: user.force_password_change,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Administrator login request
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// Dealer-member login request; identifier matches email or username,
/// case-insensitively
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Change-password request
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// Forgot-password request
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub username: String,
}

/// Authentication response with a session token
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    /// True when the account must change its password before doing
    /// anything else (temporary credential outstanding)
    pub force_password_change: bool,
    pub user: UserPublic,
}
