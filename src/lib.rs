//! Union Registry
//!
//! Member registry for a dealer association: an administrator onboards
//! member dealers, each dealer manages its own employee and customer
//! records, and a cross-tenant search index shares termination history
//! across the whole network.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use db::DbPool;
pub use middleware::{auth_middleware, Claims, Session};

use services::Mailer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
    /// Outbound mail for temporary credentials
    pub mailer: Arc<Mailer>,
}
