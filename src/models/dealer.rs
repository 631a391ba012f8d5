//! Dealer (tenant) model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Dealer membership status. Transitions are one-way-gated toward
/// `Deleted`, which is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DealerStatus {
    Active,
    Suspended,
    Deleted,
}

impl std::fmt::Display for DealerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealerStatus::Active => write!(f, "active"),
            DealerStatus::Suspended => write!(f, "suspended"),
            DealerStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl std::str::FromStr for DealerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DealerStatus::Active),
            "suspended" => Ok(DealerStatus::Suspended),
            "deleted" => Ok(DealerStatus::Deleted),
            _ => Err(format!("Invalid dealer status: {}", s)),
        }
    }
}

/// Rejected dealer status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerTransitionError {
    /// Target state unreachable because the dealer is deleted
    Deleted,
    /// Delete requested twice
    AlreadyDeleted,
    /// Activate requested on a dealer that is not suspended
    NotSuspended,
}

/// A member dealer: the unit of data isolation for employee and customer
/// records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dealer {
    pub id: Uuid,
    pub company_name: String,
    pub primary_contact_name: String,
    pub primary_contact_email: String,
    pub primary_contact_phone: String,
    pub address: String,
    pub status: DealerStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspension_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_date: Option<NaiveDate>,
}

impl Dealer {
    pub fn new(
        company_name: String,
        primary_contact_name: String,
        primary_contact_email: String,
        primary_contact_phone: String,
        address: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name,
            primary_contact_name,
            primary_contact_email,
            primary_contact_phone,
            address,
            status: DealerStatus::Active,
            created_at: Utc::now(),
            suspension_reason: None,
            deletion_reason: None,
            deletion_date: None,
        }
    }

    /// Suspend membership. Allowed from `Active` (and from `Suspended`,
    /// which refreshes the reason); a deleted dealer cannot change state.
    pub fn suspend(&mut self, reason: String) -> Result<(), DealerTransitionError> {
        match self.status {
            DealerStatus::Deleted => Err(DealerTransitionError::Deleted),
            DealerStatus::Active | DealerStatus::Suspended => {
                self.status = DealerStatus::Suspended;
                self.suspension_reason = Some(reason);
                Ok(())
            }
        }
    }

    /// Reinstate a suspended dealer. Only `Suspended` → `Active` exists;
    /// there is no path out of `Deleted`.
    pub fn activate(&mut self) -> Result<(), DealerTransitionError> {
        match self.status {
            DealerStatus::Deleted => Err(DealerTransitionError::Deleted),
            DealerStatus::Active => Err(DealerTransitionError::NotSuspended),
            DealerStatus::Suspended => {
                self.status = DealerStatus::Active;
                self.suspension_reason = None;
                Ok(())
            }
        }
    }

    /// Terminal transition: any non-deleted state → `Deleted`.
    pub fn mark_deleted(
        &mut self,
        reason: String,
        date: NaiveDate,
    ) -> Result<(), DealerTransitionError> {
        match self.status {
            DealerStatus::Deleted => Err(DealerTransitionError::AlreadyDeleted),
            DealerStatus::Active | DealerStatus::Suspended => {
                self.status = DealerStatus::Deleted;
                self.deletion_reason = Some(reason);
                self.deletion_date = Some(date);
                Ok(())
            }
        }
    }
}

/// Request to onboard a dealer. `username` names the paired member account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDealerRequest {
    #[validate(length(min = 1, message = "company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "contact name is required"))]
    pub primary_contact_name: String,
    #[validate(email(message = "contact email is invalid"))]
    pub primary_contact_email: String,
    #[validate(length(min = 1, message = "contact phone is required"))]
    pub primary_contact_phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,
}

/// Request to update dealer profile fields. Status is not writable here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDealerRequest {
    pub company_name: Option<String>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_email: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub address: Option<String>,
}

/// Reason-carrying request for suspend and delete
#[derive(Debug, Clone, Deserialize)]
pub struct DealerActionRequest {
    pub reason: String,
}

/// Response to dealer onboarding. The temporary password appears here
/// exactly once and is never re-displayable.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedDealerResponse {
    pub dealer: Dealer,
    pub username: String,
    pub temp_password: String,
}

/// Response to a password reset for the paired account
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordResponse {
    pub temp_password: String,
}
