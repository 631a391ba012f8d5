//! Tenant-scoped CRUD tests for employees and customers

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::test_app::TestApp;

fn employee_payload(aadhar: &str) -> Value {
    json!({
        "first_name": "Rachel",
        "last_name": "Zane",
        "phone": "98765 43210",
        "email": "rachel.zane@example.com",
        "aadhar": aadhar,
        "position": "Sales Lead",
        "hire_date": "2021-03-01",
    })
}

fn customer_payload(official_id: &str) -> Value {
    json!({
        "type": "government",
        "name_or_entity": "Pune Municipal Corporation",
        "contact_person": "R. Deshmukh",
        "phone": "020 2550 1234",
        "email": "fleet@pmc.example.gov",
        "official_id": official_id,
        "address": "PMC Building, Shivajinagar",
    })
}

#[tokio::test]
async fn test_create_employee_stamps_tenant_and_status() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dealer_id, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let response = app
        .post(
            "/api/v1/employees",
            Some(&token),
            employee_payload("234567890123"),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let employee = response.json_value();
    assert_eq!(employee["dealer_id"], dealer_id.as_str());
    assert_eq!(employee["status"], "active");
    assert_eq!(employee["first_name"], "Rachel");

    let list = app.get("/api/v1/employees", Some(&token)).await;
    list.assert_ok();
    assert_eq!(list.json_value().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_employee_listing_is_tenant_scoped() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token_a) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    let (_, token_b) = app
        .onboard_and_login(&admin, "Metro Motors", "metromotors")
        .await;

    app.post(
        "/api/v1/employees",
        Some(&token_a),
        employee_payload("234567890123"),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let list = app.get("/api/v1/employees", Some(&token_b)).await;
    list.assert_ok();
    assert!(list.json_value().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_aadhar_is_rejected_across_tenants() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token_a) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    let (_, token_b) = app
        .onboard_and_login(&admin, "Metro Motors", "metromotors")
        .await;

    app.post(
        "/api/v1/employees",
        Some(&token_a),
        employee_payload("234567890123"),
    )
    .await
    .assert_status(StatusCode::CREATED);

    // A different dealer hits the same global uniqueness wall
    let response = app
        .post(
            "/api/v1/employees",
            Some(&token_b),
            employee_payload("234567890123"),
        )
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.error_type(), "duplicate_identity");
}

#[tokio::test]
async fn test_create_employee_validates_required_fields() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let mut payload = employee_payload("234567890123");
    payload["first_name"] = json!("");
    let response = app.post("/api/v1/employees", Some(&token), payload).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cross_tenant_employee_update_is_forbidden() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token_a) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    let (_, token_b) = app
        .onboard_and_login(&admin, "Metro Motors", "metromotors")
        .await;

    let created = app
        .post(
            "/api/v1/employees",
            Some(&token_a),
            employee_payload("234567890123"),
        )
        .await;
    let employee_id = created.json_value()["id"].as_str().unwrap().to_string();

    let response = app
        .put(
            &format!("/api/v1/employees/{}", employee_id),
            Some(&token_b),
            json!({ "position": "Hijacked" }),
        )
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.error_type(), "forbidden");
}

#[tokio::test]
async fn test_terminate_employee_is_one_way() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let created = app
        .post(
            "/api/v1/employees",
            Some(&token),
            employee_payload("234567890123"),
        )
        .await;
    let employee_id = created.json_value()["id"].as_str().unwrap().to_string();

    let response = app
        .post(
            &format!("/api/v1/employees/{}/terminate", employee_id),
            Some(&token),
            json!({ "reason": "Company policy violation", "date": "2023-05-10" }),
        )
        .await;
    response.assert_ok();
    let employee = response.json_value();
    assert_eq!(employee["status"], "terminated");
    assert_eq!(employee["termination_reason"], "Company policy violation");
    assert_eq!(employee["termination_date"], "2023-05-10");

    // There is no un-terminate; a repeat termination is rejected
    let response = app
        .post(
            &format!("/api/v1/employees/{}/terminate", employee_id),
            Some(&token),
            json!({ "reason": "again", "date": "2023-06-01" }),
        )
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_terminate_requires_reason() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let created = app
        .post(
            "/api/v1/employees",
            Some(&token),
            employee_payload("234567890123"),
        )
        .await;
    let employee_id = created.json_value()["id"].as_str().unwrap().to_string();

    let response = app
        .post(
            &format!("/api/v1/employees/{}/terminate", employee_id),
            Some(&token),
            json!({ "reason": "  ", "date": "2023-05-10" }),
        )
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_has_no_tenant_for_crud() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app.get("/api/v1/employees", Some(&admin)).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .post(
            "/api/v1/employees",
            Some(&admin),
            employee_payload("234567890123"),
        )
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_duplicate_official_id_is_rejected_across_tenants() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token_a) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;
    let (_, token_b) = app
        .onboard_and_login(&admin, "Metro Motors", "metromotors")
        .await;

    app.post(
        "/api/v1/customers",
        Some(&token_a),
        customer_payload("GOV-456"),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = app
        .post(
            "/api/v1/customers",
            Some(&token_b),
            customer_payload("GOV-456"),
        )
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.error_type(), "duplicate_identity");
}

#[tokio::test]
async fn test_customer_update_checks_duplicate_on_identity_change() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    app.post(
        "/api/v1/customers",
        Some(&token),
        customer_payload("GOV-456"),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let mut second = customer_payload("GOV-789");
    second["name_or_entity"] = json!("Nashik Transport Office");
    let created = app.post("/api/v1/customers", Some(&token), second).await;
    let customer_id = created.json_value()["id"].as_str().unwrap().to_string();

    // Changing the identity to a taken value collides
    let response = app
        .put(
            &format!("/api/v1/customers/{}", customer_id),
            Some(&token),
            json!({ "official_id": "GOV-456" }),
        )
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.error_type(), "duplicate_identity");

    // Re-submitting its own identity is not a collision
    let response = app
        .put(
            &format!("/api/v1/customers/{}", customer_id),
            Some(&token),
            json!({ "official_id": "GOV-789", "phone": "020 9999 8888" }),
        )
        .await;
    response.assert_ok();
}

#[tokio::test]
async fn test_terminate_customer_sets_inactive() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let created = app
        .post(
            "/api/v1/customers",
            Some(&token),
            customer_payload("GOV-456"),
        )
        .await;
    let customer_id = created.json_value()["id"].as_str().unwrap().to_string();

    let response = app
        .post(
            &format!("/api/v1/customers/{}/terminate", customer_id),
            Some(&token),
            json!({ "reason": "Repeated payment default", "date": "2023-08-02" }),
        )
        .await;
    response.assert_ok();
    let customer = response.json_value();
    assert_eq!(customer["status"], "inactive");
    assert_eq!(customer["termination_reason"], "Repeated payment default");

    let response = app
        .post(
            &format!("/api/v1/customers/{}/terminate", customer_id),
            Some(&token),
            json!({ "reason": "again", "date": "2023-09-01" }),
        )
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_employee_is_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    let response = app
        .put(
            "/api/v1/employees/7f8df2f0-0000-0000-0000-000000000000",
            Some(&token),
            json!({ "position": "Ghost" }),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_employee_export_is_csv_of_own_tenant() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, token) = app
        .onboard_and_login(&admin, "Speed Auto", "speedauto")
        .await;

    app.post(
        "/api/v1/employees",
        Some(&token),
        employee_payload("234567890123"),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = app.get("/api/v1/employees/export", Some(&token)).await;
    response.assert_ok();
    let text = response.text();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("id,dealer_id,first_name"));
    assert!(text.contains("\"Rachel\""));
    assert!(text.contains("\"234567890123\""));
}
