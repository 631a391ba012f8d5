//! Database layer
//!
//! SQLite behind per-entity repositories. Schema lives in `migrations/`
//! and is applied at pool initialization. Uniqueness the application
//! depends on (usernames, employee aadhar, customer official id) is
//! enforced by UNIQUE indexes so concurrent writers resolve at the
//! storage layer.

pub mod audit_repository;
pub mod customer_repository;
pub mod dealer_repository;
pub mod employee_repository;
pub mod user_repository;

pub use audit_repository::AuditRepository;
pub use customer_repository::CustomerRepository;
pub use dealer_repository::DealerRepository;
pub use employee_repository::EmployeeRepository;
pub use user_repository::UserRepository;

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::config::DatabaseConfig;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and run migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Parse a stored RFC3339 timestamp
pub(crate) fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp in database: {}", ts))
}

/// Parse a stored ISO business date (`YYYY-MM-DD`)
pub(crate) fn parse_stored_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date in database: {}", value))
}
