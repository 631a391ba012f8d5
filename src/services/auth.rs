//! Account and session gate
//!
//! Password hashing with Argon2id, administrator and dealer-member login,
//! temporary credentials and the forced-password-change flow.

use anyhow::Result;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, Rng};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    db::{DealerRepository, UserRepository},
    models::{DealerStatus, User, UserRole},
    utils::AppError,
};

/// Minimum password length, applied uniformly to every password change.
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Characters used for generated temporary credentials. Ambiguous glyphs
/// (0/O, 1/l/I) are left out since these get read over the phone.
const TEMP_PASSWORD_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789!@#$%";

const TEMP_PASSWORD_LENGTH: usize = 12;

/// Authentication service
pub struct AuthService {
    pool: SqlitePool,
    auth: AuthConfig,
}

impl AuthService {
    pub fn new(pool: SqlitePool, auth: AuthConfig) -> Self {
        Self { pool, auth }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate a temporary credential
    pub fn generate_temp_password() -> String {
        let mut rng = rand::thread_rng();
        (0..TEMP_PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..TEMP_PASSWORD_CHARSET.len());
                TEMP_PASSWORD_CHARSET[idx] as char
            })
            .collect()
    }

    /// Ensure the administrator account exists, creating it from
    /// configuration on first startup.
    pub async fn seed_admin(&self) -> Result<()> {
        let users = UserRepository::new(&self.pool);
        if users.get_administrator().await?.is_some() {
            return Ok(());
        }

        let admin = User::new_administrator(
            self.auth.admin_username.clone(),
            self.auth.admin_email.clone(),
            "Administrator".to_string(),
            Self::hash_password(&self.auth.admin_initial_password)?,
        );
        users.insert(&admin).await?;
        tracing::info!(username = %admin.username, "Seeded administrator account");
        Ok(())
    }

    /// Administrator login. Verifies against the seeded administrator
    /// account's standing credential; the returned flag reports whether
    /// an unexpired temporary credential is outstanding.
    pub async fn login_admin(&self, password: &str) -> Result<(User, bool), AppError> {
        let users = UserRepository::new(&self.pool);
        let admin = users
            .get_administrator()
            .await?
            .ok_or(AppError::InvalidCredential)?;

        if !Self::verify_password(password, &admin.password_hash)? {
            return Err(AppError::InvalidCredential);
        }

        let temp_outstanding = admin.has_valid_temp_password(Utc::now());
        Ok((admin, temp_outstanding))
    }

    /// Dealer-member login by email or username (case-insensitive).
    ///
    /// Suspended and deleted dealers cannot authenticate. While a
    /// temporary credential is outstanding, only that exact value is
    /// accepted; the standing credential is invalidated for the duration
    /// and an expired temporary credential accepts nothing.
    pub async fn login_dealer(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(User, bool), AppError> {
        let users = UserRepository::new(&self.pool);
        let user = users
            .find_dealer_member(identifier)
            .await?
            .ok_or(AppError::InvalidCredential)?;

        let dealer_id = user.dealer_id.ok_or_else(|| {
            AppError::Internal("dealer-member account has no dealer".to_string())
        })?;
        let dealer = DealerRepository::new(&self.pool)
            .get_by_id(dealer_id)
            .await?
            .ok_or_else(|| AppError::Internal("paired dealer missing".to_string()))?;

        if dealer.status != DealerStatus::Active {
            return Err(AppError::DealerNotActive);
        }

        match &user.temp_password_hash {
            Some(temp_hash) => {
                if !user.has_valid_temp_password(Utc::now())
                    || !Self::verify_password(password, temp_hash)?
                {
                    return Err(AppError::InvalidTemporaryCredential);
                }
                Ok((user, true))
            }
            None => {
                if !Self::verify_password(password, &user.password_hash)? {
                    return Err(AppError::InvalidCredential);
                }
                Ok((user, false))
            }
        }
    }

    /// Install a new standing password for an account. Clears any
    /// temporary credential and the forced-change flag unconditionally.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<User, AppError> {
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let users = UserRepository::new(&self.pool);
        let user = users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

        let hash = Self::hash_password(new_password)?;
        users.update_credentials(user.id, &hash).await?;

        users
            .get_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// Forgot-password flow. Response-shaping is the caller's concern:
    /// this returns `None` both for unknown usernames and for dealers
    /// that are not active, so nothing can be enumerated. On success the
    /// plaintext temporary credential is returned exactly once, for
    /// out-of-band dispatch.
    pub async fn forgot_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, AppError> {
        let users = UserRepository::new(&self.pool);
        let Some(user) = users.get_by_username(username).await? else {
            return Ok(None);
        };
        if user.role != UserRole::DealerMember {
            return Ok(None);
        }
        let Some(dealer_id) = user.dealer_id else {
            return Ok(None);
        };
        let dealer = DealerRepository::new(&self.pool).get_by_id(dealer_id).await?;
        match dealer {
            Some(d) if d.status == DealerStatus::Active => {}
            _ => return Ok(None),
        }

        let temp = self.issue_temp_password(user.id).await?;
        Ok(Some((user, temp)))
    }

    /// Generate and install a temporary credential for an account,
    /// forcing a password change on next login. Returns the plaintext
    /// exactly once.
    pub async fn issue_temp_password(&self, user_id: Uuid) -> Result<String, AppError> {
        let temp = Self::generate_temp_password();
        let temp_hash = Self::hash_password(&temp)?;
        let expiry = Utc::now() + Duration::hours(self.auth.temp_password_expiry_hours as i64);

        UserRepository::new(&self.pool)
            .set_temp_password(user_id, &temp_hash, expiry)
            .await?;

        Ok(temp)
    }
}
