//! Audit log model
//!
//! Entries are append-only: nothing in this crate updates or deletes a
//! row in `audit_log` after insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of auditable actions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuditActionType {
    Login,
    ResetPassword,
    ChangePassword,
    CreateDealer,
    UpdateDealer,
    CreateEmployee,
    UpdateEmployee,
    TerminateEmployee,
    CreateCustomer,
    UpdateCustomer,
    Search,
}

impl AuditActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditActionType::Login => "login",
            AuditActionType::ResetPassword => "reset-password",
            AuditActionType::ChangePassword => "change-password",
            AuditActionType::CreateDealer => "create-dealer",
            AuditActionType::UpdateDealer => "update-dealer",
            AuditActionType::CreateEmployee => "create-employee",
            AuditActionType::UpdateEmployee => "update-employee",
            AuditActionType::TerminateEmployee => "terminate-employee",
            AuditActionType::CreateCustomer => "create-customer",
            AuditActionType::UpdateCustomer => "update-customer",
            AuditActionType::Search => "search",
        }
    }
}

impl std::fmt::Display for AuditActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(AuditActionType::Login),
            "reset-password" => Ok(AuditActionType::ResetPassword),
            "change-password" => Ok(AuditActionType::ChangePassword),
            "create-dealer" => Ok(AuditActionType::CreateDealer),
            "update-dealer" => Ok(AuditActionType::UpdateDealer),
            "create-employee" => Ok(AuditActionType::CreateEmployee),
            "update-employee" => Ok(AuditActionType::UpdateEmployee),
            "terminate-employee" => Ok(AuditActionType::TerminateEmployee),
            "create-customer" => Ok(AuditActionType::CreateCustomer),
            "update-customer" => Ok(AuditActionType::UpdateCustomer),
            "search" => Ok(AuditActionType::Search),
            _ => Err(format!("Invalid audit action type: {}", s)),
        }
    }
}

/// One immutable audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub who_user_id: Uuid,
    /// Human-readable actor label: `Name (username)` for administrators,
    /// `Name (username at Company)` for dealer members
    pub who_user_name: String,
    /// Tenant context of the action; absent for admin-global actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
    pub action_type: AuditActionType,
    pub details: String,
    pub ip_address: String,
    pub timestamp: DateTime<Utc>,
}
