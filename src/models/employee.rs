//! Employee model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Employment status; `Terminated` is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Terminated,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "active"),
            EmployeeStatus::Terminated => write!(f, "terminated"),
        }
    }
}

impl std::str::FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EmployeeStatus::Active),
            "terminated" => Ok(EmployeeStatus::Terminated),
            _ => Err(format!("Invalid employee status: {}", s)),
        }
    }
}

/// An employee record, owned by exactly one dealer. The aadhar number is
/// unique across the whole store: the same person cannot be employed at
/// two member dealers at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub aadhar: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<String>,
}

impl Employee {
    /// One-way transition to `Terminated`. The reason and date become
    /// visible network-wide through the search index.
    pub fn terminate(&mut self, reason: String, date: NaiveDate) -> Result<(), AlreadyTerminated> {
        if self.status == EmployeeStatus::Terminated {
            return Err(AlreadyTerminated);
        }
        self.status = EmployeeStatus::Terminated;
        self.termination_reason = Some(reason);
        self.termination_date = Some(date);
        Ok(())
    }
}

/// Terminate called on an already-terminated record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyTerminated;

/// Request to create an employee. The owning dealer comes from the
/// session, never from the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "aadhar is required"))]
    pub aadhar: String,
    #[validate(length(min = 1, message = "position is required"))]
    pub position: String,
    pub hire_date: NaiveDate,
}

/// Request to update employee profile fields. Status and termination
/// details are not writable here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub aadhar: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Request body for termination operations (employees and customers)
#[derive(Debug, Clone, Deserialize)]
pub struct TerminationRequest {
    pub reason: String,
    pub date: NaiveDate,
}
