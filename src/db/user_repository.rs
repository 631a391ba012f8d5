//! Account repository

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_timestamp;
use crate::models::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    username: String,
    name: String,
    role: String,
    dealer_id: Option<String>,
    password_hash: String,
    temp_password_hash: Option<String>,
    temp_password_expiry: Option<String>,
    force_password_change: bool,
    created_at: String,
    updated_at: String,
}

const USER_COLUMNS: &str = "id, email, username, name, role, dealer_id, password_hash, \
     temp_password_hash, temp_password_expiry, force_password_change, created_at, updated_at";

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, name, role, dealer_id, password_hash,
                temp_password_hash, temp_password_expiry, force_password_change,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.name)
        .bind(user.role.to_string())
        .bind(user.dealer_id.map(|id| id.to_string()))
        .bind(&user.password_hash)
        .bind(user.temp_password_hash.as_deref())
        .bind(user.temp_password_expiry.map(|dt| dt.to_rfc3339()))
        .bind(user.force_password_change)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to insert user")?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user by id")?;

        row.map(row_to_user).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        // The username column is NOCASE collated, so equality here is
        // case-insensitive.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user by username")?;

        row.map(row_to_user).transpose()
    }

    /// Resolve a dealer-member account by email or username,
    /// case-insensitively.
    pub async fn find_dealer_member(&self, identifier: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = 'dealer-member' AND (username = ?1 OR LOWER(email) = LOWER(?1))"
        ))
        .bind(identifier)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch dealer member by identifier")?;

        row.map(row_to_user).transpose()
    }

    pub async fn get_administrator(&self) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'administrator' LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch administrator account")?;

        row.map(row_to_user).transpose()
    }

    /// The dealer-member account paired with a dealer
    pub async fn get_by_dealer(&self, dealer_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE dealer_id = ?"
        ))
        .bind(dealer_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user by dealer")?;

        row.map(row_to_user).transpose()
    }

    /// Install a new standing credential, clearing any temporary
    /// credential and the forced-change flag.
    pub async fn update_credentials(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, temp_password_hash = NULL, temp_password_expiry = NULL,
                force_password_change = 0, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update credentials")?;

        Ok(())
    }

    /// Install a temporary credential and force a password change on the
    /// next login. The standing credential stays in place but cannot be
    /// used while the temporary one is outstanding.
    pub async fn set_temp_password(
        &self,
        user_id: Uuid,
        temp_password_hash: &str,
        expiry: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET temp_password_hash = ?, temp_password_expiry = ?,
                force_password_change = 1, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(temp_password_hash)
        .bind(expiry.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(user_id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to set temporary credential")?;

        Ok(())
    }
}

fn row_to_user(row: UserRow) -> Result<User> {
    Ok(User {
        id: Uuid::parse_str(&row.id).context("Invalid user id in database")?,
        email: row.email,
        username: row.username,
        name: row.name,
        role: row
            .role
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid role in database")?,
        dealer_id: row
            .dealer_id
            .map(|id| Uuid::parse_str(&id).context("Invalid dealer id in database"))
            .transpose()?,
        password_hash: row.password_hash,
        temp_password_hash: row.temp_password_hash,
        temp_password_expiry: row
            .temp_password_expiry
            .as_deref()
            .map(parse_timestamp)
            .transpose()?,
        force_password_change: row.force_password_change,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    })
}
