//! Audit recorder tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::test_app::TestApp;

#[tokio::test]
async fn test_mutating_actions_append_entries() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    app.post(
        "/api/v1/employees",
        Some(&token),
        json!({
            "first_name": "Rachel",
            "last_name": "Zane",
            "phone": "98765 43210",
            "email": "rachel.zane@example.com",
            "aadhar": "234567890123",
            "position": "Sales Lead",
            "hire_date": "2021-03-01",
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let logs = app.get("/api/v1/audit-logs", Some(&admin)).await;
    logs.assert_ok();
    let logs = logs.json_value();
    let entries = logs.as_array().unwrap();

    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action_type"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"login"));
    assert!(actions.contains(&"create-dealer"));
    assert!(actions.contains(&"change-password"));
    assert!(actions.contains(&"create-employee"));

    let create_entry = entries
        .iter()
        .find(|e| e["action_type"] == "create-employee")
        .unwrap();
    assert_eq!(create_entry["details"], "Created employee Rachel Zane");
    assert!(create_entry["who_user_name"]
        .as_str()
        .unwrap()
        .contains("at Speed Auto"));
    assert!(create_entry.get("dealer_id").is_some());
    assert!(create_entry.get("timestamp").is_some());
    assert!(create_entry.get("ip_address").is_some());
}

#[tokio::test]
async fn test_admin_actions_carry_no_tenant_context() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.onboard_dealer(&admin, "Speed Auto", "speedauto").await;

    let logs = app.get("/api/v1/audit-logs", Some(&admin)).await.json_value();
    let create_entry = logs
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["action_type"] == "create-dealer")
        .unwrap()
        .clone();

    assert!(create_entry.get("dealer_id").is_none());
    assert_eq!(create_entry["who_user_name"], "Administrator (admin)");
}

#[tokio::test]
async fn test_dealer_sees_only_own_tenant_entries() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dealer_a, token_a) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    let (_, token_b) = app
        .onboard_and_login(&admin, "Metro Motors", "metromotors")
        .await;

    app.post(
        "/api/v1/employees",
        Some(&token_a),
        json!({
            "first_name": "Rachel",
            "last_name": "Zane",
            "phone": "98765 43210",
            "email": "rachel.zane@example.com",
            "aadhar": "234567890123",
            "position": "Sales Lead",
            "hire_date": "2021-03-01",
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let logs_b = app.get("/api/v1/audit-logs", Some(&token_b)).await.json_value();
    for entry in logs_b.as_array().unwrap() {
        assert_ne!(entry["dealer_id"], dealer_a.as_str());
        assert_ne!(entry["action_type"], "create-employee");
    }
}

#[tokio::test]
async fn test_admin_sees_all_entries_newest_first() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    drop(token);

    let logs = app.get("/api/v1/audit-logs", Some(&admin)).await.json_value();
    let entries = logs.as_array().unwrap();
    assert!(entries.len() >= 3);

    let timestamps: Vec<&str> = entries
        .iter()
        .map(|e| e["timestamp"].as_str().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn test_per_dealer_audit_trail_for_admin() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dealer_id, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    drop(token);

    let response = app
        .get(
            &format!("/api/v1/dealers/{}/audit-logs", dealer_id),
            Some(&admin),
        )
        .await;
    response.assert_ok();
    let entries = response.json_value();
    let entries = entries.as_array().unwrap();
    assert!(!entries.is_empty());
    for entry in entries {
        assert_eq!(entry["dealer_id"], dealer_id.as_str());
    }
}

#[tokio::test]
async fn test_login_is_audited() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let logs = app.get("/api/v1/audit-logs", Some(&admin)).await.json_value();
    let login_entry = logs
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["action_type"] == "login")
        .cloned()
        .expect("login entry missing");
    assert_eq!(login_entry["details"], "Administrator logged in");
}
