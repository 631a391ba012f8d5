//! Cross-tenant search tests

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::test_app::TestApp;

async fn seed_terminated_zane(app: &TestApp, token: &str) -> String {
    let created = app
        .post(
            "/api/v1/employees",
            Some(token),
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
        .await;
    created.assert_status(StatusCode::CREATED);
    let employee_id = created.json_value()["id"].as_str().unwrap().to_string();

    app.post(
        &format!("/api/v1/employees/{}/terminate", employee_id),
        Some(token),
        json!({ "reason": "Company policy violation", "date": "2023-05-10" }),
    )
    .await
    .assert_ok();

    employee_id
}

fn search_entries(logs: &Value) -> Vec<Value> {
    logs.as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["action_type"] == "search")
        .cloned()
        .collect()
}

#[tokio::test]
async fn test_search_crosses_tenant_boundaries() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dealer_a, token_a) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    let (_, token_b) = app
        .onboard_and_login(&admin, "Metro Motors", "metromotors")
        .await;

    seed_terminated_zane(&app, &token_a).await;

    // Dealer B sees dealer A's record, including the termination block
    let response = app.get("/api/v1/search?q=zane", Some(&token_b)).await;
    response.assert_ok();
    let results = response.json_value();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);

    let hit = &results[0];
    assert_eq!(hit["entity_type"], "employee");
    assert_eq!(hit["canonical_name"], "Rachel Zane");
    assert_eq!(hit["owner_dealer_id"], dealer_a.as_str());
    assert_eq!(hit["owner_dealer_name"], "Speed Auto");
    assert_eq!(hit["status_summary"], "terminated");
    assert_eq!(hit["termination_reason"], "Company policy violation");
    assert_eq!(hit["termination_date"], "2023-05-10");
}

#[tokio::test]
async fn test_empty_query_returns_nothing_and_is_not_audited() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    seed_terminated_zane(&app, &token).await;

    for uri in ["/api/v1/search?q=", "/api/v1/search?q=%20%20", "/api/v1/search"] {
        let response = app.get(uri, Some(&token)).await;
        response.assert_ok();
        assert!(response.json_value().as_array().unwrap().is_empty());
    }

    let logs = app.get("/api/v1/audit-logs", Some(&token)).await.json_value();
    assert!(search_entries(&logs).is_empty());
}

#[tokio::test]
async fn test_each_executed_search_is_audited_with_raw_query() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    seed_terminated_zane(&app, &token).await;

    app.get("/api/v1/search?q=zane", Some(&token)).await.assert_ok();
    // A miss is still a search, and still audited
    app.get("/api/v1/search?q=nobody", Some(&token))
        .await
        .assert_ok();

    let logs = app.get("/api/v1/audit-logs", Some(&token)).await.json_value();
    let searches = search_entries(&logs);
    assert_eq!(searches.len(), 2);
    assert!(searches
        .iter()
        .any(|e| e["details"] == "Searched for: \"zane\""));
    assert!(searches
        .iter()
        .any(|e| e["details"] == "Searched for: \"nobody\""));
}

#[tokio::test]
async fn test_phone_fragment_matches_normalized_digits() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    seed_terminated_zane(&app, &token).await;

    // Stored as "98765 43210"; queried with different separators
    let response = app.get("/api/v1/search?q=8765-4321", Some(&token)).await;
    response.assert_ok();
    assert_eq!(response.json_value().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_identity_fragment_matches_case_insensitively() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    app.post(
        "/api/v1/customers",
        Some(&token),
        json!({
            "type": "government",
            "name_or_entity": "Pune Municipal Corporation",
            "contact_person": "R. Deshmukh",
            "phone": "020 2550 1234",
            "email": "fleet@pmc.example.gov",
            "official_id": "GOV-456",
            "address": "PMC Building, Shivajinagar",
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = app.get("/api/v1/search?q=gov-45", Some(&token)).await;
    response.assert_ok();
    let results = response.json_value();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["entity_type"], "customer");
    assert_eq!(results[0]["customer_type"], "government");
    assert_eq!(results[0]["identity_norm"], "GOV456");
}

#[tokio::test]
async fn test_name_query_does_not_match_through_empty_phone_fragment() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    seed_terminated_zane(&app, &token).await;

    // "xyz" strips to an empty phone/identity fragment; nothing matches
    let response = app.get("/api/v1/search?q=xyz", Some(&token)).await;
    response.assert_ok();
    assert!(response.json_value().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_active_records_carry_no_termination_block() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    app.post(
        "/api/v1/employees",
        Some(&token),
        json!({
            "first_name": "Harvey",
            "last_name": "Specter",
            "phone": "98111 22233",
            "email": "harvey@example.com",
            "aadhar": "345678901234",
            "position": "Manager",
            "hire_date": "2020-01-15",
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = app.get("/api/v1/search?q=specter", Some(&token)).await;
    response.assert_ok();
    let results = response.json_value();
    let hit = &results.as_array().unwrap()[0];
    assert_eq!(hit["status_summary"], "active");
    assert!(hit.get("termination_reason").is_none());
    assert!(hit.get("termination_date").is_none());
}

#[tokio::test]
async fn test_search_reflects_latest_committed_state() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let created = app
        .post(
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
        .await;
    let employee_id = created.json_value()["id"].as_str().unwrap().to_string();

    // Before termination: active, no block
    let before = app.get("/api/v1/search?q=zane", Some(&token)).await.json_value();
    assert_eq!(before.as_array().unwrap()[0]["status_summary"], "active");

    app.post(
        &format!("/api/v1/employees/{}/terminate", employee_id),
        Some(&token),
        json!({ "reason": "Company policy violation", "date": "2023-05-10" }),
    )
    .await
    .assert_ok();

    // Immediately after: the index answer is current, never stale
    let after = app.get("/api/v1/search?q=zane", Some(&token)).await.json_value();
    let hit = &after.as_array().unwrap()[0];
    assert_eq!(hit["status_summary"], "terminated");
    assert_eq!(hit["termination_reason"], "Company policy violation");
}

#[tokio::test]
async fn test_admin_can_search_too() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    seed_terminated_zane(&app, &token).await;

    let response = app.get("/api/v1/search?q=zane", Some(&admin)).await;
    response.assert_ok();
    assert_eq!(response.json_value().as_array().unwrap().len(), 1);
}
