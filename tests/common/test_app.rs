//! Test application setup utilities
//!
//! Spins up the full router over an in-memory SQLite database and
//! provides request/response helpers plus shortcuts for the recurring
//! onboarding flows (admin session, dealer onboarding, first login with
//! a temporary credential).

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use union_registry::{
    api,
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    db, middleware,
    services::{AuthService, Mailer},
    AppState,
};

pub const ADMIN_PASSWORD: &str = "Union-Admin-2025!";
pub const STANDING_PASSWORD: &str = "Standing-Pass-123";

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry_hours: 12,
            admin_username: "admin".to_string(),
            admin_email: "admin@union-registry.local".to_string(),
            admin_initial_password: ADMIN_PASSWORD.to_string(),
            temp_password_expiry_hours: 72,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            // A single connection so every query sees the same in-memory
            // database.
            max_connections: 1,
        },
        logging: LoggingConfig::default(),
        smtp: None,
    }
}

impl TestApp {
    /// Create a new test application with an in-memory SQLite database
    pub async fn new() -> Self {
        let config = test_config();

        let pool = db::init_pool(&config.database)
            .await
            .expect("Failed to initialize test database");

        AuthService::new(pool.clone(), config.auth.clone())
            .seed_admin()
            .await
            .expect("Failed to seed administrator");

        let state = AppState {
            config,
            db: pool,
            mailer: Arc::new(Mailer::new(None)),
        };

        let router = Router::new()
            .nest("/api/v1", api::public_routes())
            .nest(
                "/api/v1",
                api::protected_routes().layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::auth::auth_middleware,
                )),
            )
            .with_state(state.clone());

        Self { router, state }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            body: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    /// Log in as the seeded administrator
    pub async fn admin_token(&self) -> String {
        let response = self
            .post(
                "/api/v1/auth/login-admin",
                None,
                json!({ "password": ADMIN_PASSWORD }),
            )
            .await;
        response.assert_status(StatusCode::OK);
        response.json_value()["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    /// Onboard a dealer and return (dealer_id, temp_password)
    pub async fn onboard_dealer(
        &self,
        admin_token: &str,
        company_name: &str,
        username: &str,
    ) -> (String, String) {
        let response = self
            .post(
                "/api/v1/dealers",
                Some(admin_token),
                json!({
                    "company_name": company_name,
                    "primary_contact_name": "Primary Contact",
                    "primary_contact_email": format!("{}@example.com", username),
                    "primary_contact_phone": "98765 43210",
                    "address": "12 MG Road, Pune",
                    "username": username,
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        let body = response.json_value();
        (
            body["dealer"]["id"].as_str().expect("dealer id").to_string(),
            body["temp_password"]
                .as_str()
                .expect("temp password")
                .to_string(),
        )
    }

    /// Complete a dealer's first login: temporary credential in, forced
    /// password change, standing session token out.
    pub async fn dealer_token(&self, username: &str, temp_password: &str) -> String {
        let login = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "identifier": username, "password": temp_password }),
            )
            .await;
        login.assert_status(StatusCode::OK);
        let body = login.json_value();
        assert_eq!(body["force_password_change"], true);
        let temp_token = body["token"].as_str().expect("token").to_string();

        let change = self
            .post(
                "/api/v1/auth/change-password",
                Some(&temp_token),
                json!({ "new_password": STANDING_PASSWORD }),
            )
            .await;
        change.assert_status(StatusCode::OK);
        change.json_value()["token"]
            .as_str()
            .expect("token")
            .to_string()
    }

    /// Onboard a dealer and hand back a ready-to-use member session
    pub async fn onboard_and_login(
        &self,
        admin_token: &str,
        company_name: &str,
        username: &str,
    ) -> (String, String) {
        let (dealer_id, temp) = self.onboard_dealer(admin_token, company_name, username).await;
        let token = self.dealer_token(username, &temp).await;
        (dealer_id, token)
    }
}

/// Captured response with assertion helpers
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "unexpected status (body: {})",
            String::from_utf8_lossy(&self.body)
        );
    }

    pub fn assert_ok(&self) {
        self.assert_status(StatusCode::OK);
    }

    pub fn json_value(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not valid JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// The `error` discriminator from an error response body
    pub fn error_type(&self) -> String {
        self.json_value()["error"]
            .as_str()
            .expect("error field missing")
            .to_string()
    }
}
