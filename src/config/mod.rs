//! Configuration management
//!
//! YAML-based configuration with environment variable overrides and
//! defaults for every setting. The file location is taken from
//! `UNION_REGISTRY_CONFIG` (default `config.yaml`); a missing file is not
//! an error, the defaults simply apply.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// SMTP settings for temporary-credential mail. When absent, outgoing
    /// mail is logged instead of sent.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: u64,
    /// Username for the administrator account seeded at startup
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Initial administrator password, hashed on first startup. Ignored
    /// once the administrator account exists.
    pub admin_initial_password: String,
    /// Lifetime of generated temporary credentials
    #[serde(default = "default_temp_password_expiry_hours")]
    pub temp_password_expiry_hours: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging output format
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// When set, logs are also written to this file (daily rotation)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

/// SMTP configuration for outbound mail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From address for registry mail
    pub from: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_token_expiry_hours() -> u64 {
    12
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@union-registry.local".to_string()
}

fn default_temp_password_expiry_hours() -> u64 {
    72
}

fn default_database_url() -> String {
    "sqlite://data/union-registry.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("UNION_REGISTRY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"));

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {:?}", config_path))?;
            serde_norway::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {:?}", config_path))?
        } else {
            Self::default_config()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Configuration used when no config file exists. Secrets come from the
    /// environment in this mode; `apply_env_overrides` fills them in.
    fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_expiry_hours: default_token_expiry_hours(),
                admin_username: default_admin_username(),
                admin_email: default_admin_email(),
                admin_initial_password: String::new(),
                temp_password_expiry_hours: default_temp_password_expiry_hours(),
            },
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            smtp: None,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("UNION_REGISTRY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("UNION_REGISTRY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(password) = std::env::var("UNION_REGISTRY_ADMIN_PASSWORD") {
            self.auth.admin_initial_password = password;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("UNION_REGISTRY_LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                self.logging.format = LogFormat::Json;
            }
        }
    }

    /// Validate that required secrets are present
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret (or JWT_SECRET) must be set");
        }
        if self.auth.admin_initial_password.is_empty() {
            anyhow::bail!(
                "auth.admin_initial_password (or UNION_REGISTRY_ADMIN_PASSWORD) must be set"
            );
        }
        Ok(())
    }
}
