//! Employee repository

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::parse_stored_date;
use crate::models::Employee;

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: String,
    dealer_id: String,
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    aadhar: String,
    position: String,
    hire_date: String,
    status: String,
    termination_date: Option<String>,
    termination_reason: Option<String>,
}

/// Employee row joined with the owning dealer's display name, for the
/// cross-tenant index
#[derive(Debug, sqlx::FromRow)]
struct EmployeeWithDealerRow {
    #[sqlx(flatten)]
    employee: EmployeeRow,
    dealer_name: String,
}

const EMPLOYEE_COLUMNS: &str = "id, dealer_id, first_name, last_name, phone, email, aadhar, \
     position, hire_date, status, termination_date, termination_reason";

pub struct EmployeeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One dealer's employees
    pub async fn list_by_dealer(&self, dealer_id: Uuid) -> Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE dealer_id = ? ORDER BY last_name, first_name"
        ))
        .bind(dealer_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list employees")?;

        rows.into_iter().map(row_to_employee).collect()
    }

    /// Every employee across every dealer, with the owning dealer's
    /// company name. The one read that crosses tenant boundaries.
    pub async fn list_all_with_dealer(&self) -> Result<Vec<(Employee, String)>> {
        let rows = sqlx::query_as::<_, EmployeeWithDealerRow>(
            r#"
            SELECT e.id, e.dealer_id, e.first_name, e.last_name, e.phone, e.email, e.aadhar,
                   e.position, e.hire_date, e.status, e.termination_date, e.termination_reason,
                   d.company_name AS dealer_name
            FROM employees e
            INNER JOIN dealers d ON d.id = e.dealer_id
            "#,
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list employees with dealers")?;

        rows.into_iter()
            .map(|row| Ok((row_to_employee(row.employee)?, row.dealer_name)))
            .collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch employee")?;

        row.map(row_to_employee).transpose()
    }

    pub async fn insert(&self, employee: &Employee) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, dealer_id, first_name, last_name, phone, email, aadhar,
                position, hire_date, status, termination_date, termination_reason)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee.id.to_string())
        .bind(employee.dealer_id.to_string())
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.aadhar)
        .bind(&employee.position)
        .bind(employee.hire_date.to_string())
        .bind(employee.status.to_string())
        .bind(employee.termination_date.map(|d| d.to_string()))
        .bind(employee.termination_reason.as_deref())
        .execute(self.pool)
        .await
        .context("Failed to insert employee")?;

        Ok(())
    }

    pub async fn update(&self, employee: &Employee) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, phone = ?, email = ?, aadhar = ?, position = ?,
                hire_date = ?, status = ?, termination_date = ?, termination_reason = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.aadhar)
        .bind(&employee.position)
        .bind(employee.hire_date.to_string())
        .bind(employee.status.to_string())
        .bind(employee.termination_date.map(|d| d.to_string()))
        .bind(employee.termination_reason.as_deref())
        .bind(employee.id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update employee")?;

        Ok(())
    }
}

fn row_to_employee(row: EmployeeRow) -> Result<Employee> {
    Ok(Employee {
        id: Uuid::parse_str(&row.id).context("Invalid employee id in database")?,
        dealer_id: Uuid::parse_str(&row.dealer_id).context("Invalid dealer id in database")?,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
        email: row.email,
        aadhar: row.aadhar,
        position: row.position,
        hire_date: parse_stored_date(&row.hire_date)?,
        status: row
            .status
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid employee status in database")?,
        termination_date: row
            .termination_date
            .as_deref()
            .map(parse_stored_date)
            .transpose()?,
        termination_reason: row.termination_reason,
    })
}
