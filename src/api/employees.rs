//! Employee API endpoints (tenant-scoped)

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
        AuditActionType, CreateEmployeeRequest, Employee, TerminationRequest,
        UpdateEmployeeRequest,
    },
    services::{AuditRecorder, RegistryService},
    utils::{csv, AppError, AppResult},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/export", get(export_employees))
        .route("/{id}", put(update_employee))
        .route("/{id}/terminate", post(terminate_employee))
}

fn parse_employee_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("Employee not found".to_string()))
}

/// GET /api/v1/employees
async fn list_employees(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<Employee>>> {
    let employees = RegistryService::new(state.db.clone())
        .list_employees(&session)
        .await?;
    Ok(Json(employees))
}

/// POST /api/v1/employees
async fn create_employee(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let employee = RegistryService::new(state.db.clone())
        .create_employee(&session, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::CreateEmployee,
            format!(
                "Created employee {} {}",
                employee.first_name, employee.last_name
            ),
            &client_ip(&headers),
        )
        .await;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/v1/employees/{id}
async fn update_employee(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<Employee>> {
    let employee_id = parse_employee_id(&id)?;
    let employee = RegistryService::new(state.db.clone())
        .update_employee(&session, employee_id, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::UpdateEmployee,
            format!(
                "Updated employee {} {}",
                employee.first_name, employee.last_name
            ),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(employee))
}

/// POST /api/v1/employees/{id}/terminate
async fn terminate_employee(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<TerminationRequest>,
) -> AppResult<Json<Employee>> {
    let employee_id = parse_employee_id(&id)?;
    let employee = RegistryService::new(state.db.clone())
        .terminate_employee(&session, employee_id, &payload)
        .await?;

    AuditRecorder::new(state.db.clone())
        .record(
            &session,
            AuditActionType::TerminateEmployee,
            format!(
                "Terminated employee {} {}",
                employee.first_name, employee.last_name
            ),
            &client_ip(&headers),
        )
        .await;

    Ok(Json(employee))
}

/// GET /api/v1/employees/export
///
/// CSV of the caller's own employees.
async fn export_employees(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    let employees = RegistryService::new(state.db.clone())
        .list_employees(&session)
        .await?;

    let rows: Vec<Vec<String>> = employees
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.dealer_id.to_string(),
                e.first_name.clone(),
                e.last_name.clone(),
                e.phone.clone(),
                e.email.clone(),
                e.aadhar.clone(),
                e.position.clone(),
                e.hire_date.to_string(),
                e.status.to_string(),
                e.termination_date.map(|d| d.to_string()).unwrap_or_default(),
                e.termination_reason.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let body = csv::render(
        &[
            "id",
            "dealer_id",
            "first_name",
            "last_name",
            "phone",
            "email",
            "aadhar",
            "position",
            "hire_date",
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
