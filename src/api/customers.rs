//! Customer API endpoints (tenant-scoped)

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    api::client_ip,
    middleware::Session,
    models::{
        AuditActionType, CreateCustomerRequest, Customer, TerminationRequest,
        UpdateCustomerRequest,
    },
    services::{AuditRecorder, RegistryService},
    utils::{csv, AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/export", get(export_customers))
        .route("/{id}", put(update_customer))
        .route("/{id}/terminate", post(terminate_customer))
}

fn parse_customer_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Customer not found".to_string()))
}

/// GET /api/v1/customers
async fn list_customers(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = RegistryService::new(state.db.clone())
        .list_customers(&session)
        .await?;
    Ok(Json(customers))
}

/// POST /api/v1/customers
async fn create_customer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = RegistryService::new(state.db.clone())
        .create_customer(&session, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::CreateCustomer,
            format!("Created customer {}", customer.name_or_entity),
            &client_ip(&headers),
        )
        .await;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /api/v1/customers/{id}
async fn update_customer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    let customer_id = parse_customer_id(&id)?;
    let customer = RegistryService::new(state.db.clone())
        .update_customer(&session, customer_id, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateCustomer,
            format!("Updated customer {}", customer.name_or_entity),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(customer))
}

/// POST /api/v1/customers/{id}/terminate
async fn terminate_customer(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<TerminationRequest>,
) -> AppResult<Json<Customer>> {
    let customer_id = parse_customer_id(&id)?;
    let customer = RegistryService::new(state.db.clone())
        .terminate_customer(&session, customer_id, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateCustomer,
            format!("Terminated customer {}", customer.name_or_entity),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(customer))
}

/// GET /api/v1/customers/export
///
/// CSV of the caller's own customers.
async fn export_customers(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    let customers = RegistryService::new(state.db.clone())
        .list_customers(&session)
        .await?;

    let rows: Vec<Vec<String>> = customers
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.dealer_id.to_string(),
                c.customer_type.to_string(),
                c.name_or_entity.clone(),
                c.contact_person.clone().unwrap_or_default(),
                c.phone.clone(),
                c.email.clone(),
                c.official_id.clone(),
                c.address.clone(),
                c.status.to_string(),
                c.termination_date.map(|d| d.to_string()).unwrap_or_default(),
                c.termination_reason.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let body = csv::render(
        &[
            "id",
            "dealer_id",
            "type",
            "name_or_entity",
            "contact_person",
            "phone",
            "email",
            "official_id",
            "address",
            "status",
            "termination_date",
            "termination_reason",
        ],
        &rows,
    );

    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    ))
}
