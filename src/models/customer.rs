//! Customer model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::employee::AlreadyTerminated;

/// Customer category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Private,
    Government,
}

impl std::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerType::Private => write!(f, "private"),
            CustomerType::Government => write!(f, "government"),
        }
    }
}

impl std::str::FromStr for CustomerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(CustomerType::Private),
            "government" => Ok(CustomerType::Government),
            _ => Err(format!("Invalid customer type: {}", s)),
        }
    }
}

/// Relationship status; `Inactive` is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerStatus::Active => write!(f, "active"),
            CustomerStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CustomerStatus::Active),
            "inactive" => Ok(CustomerStatus::Inactive),
            _ => Err(format!("Invalid customer status: {}", s)),
        }
    }
}

/// A customer record, owned by exactly one dealer. The official id is
/// unique across the whole store, same rationale as employee aadhar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub dealer_id: Uuid,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub name_or_entity: String,
    /// Meaningful only for government customers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    pub phone: String,
    pub email: String,
    pub official_id: String,
    pub address: String,
    pub status: CustomerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<String>,
}

impl Customer {
    /// One-way transition to `Inactive`. The reason and date become
    /// visible network-wide through the search index.
    pub fn terminate(&mut self, reason: String, date: NaiveDate) -> Result<(), AlreadyTerminated> {
        if self.status == CustomerStatus::Inactive {
            return Err(AlreadyTerminated);
        }
        self.status = CustomerStatus::Inactive;
        self.termination_reason = Some(reason);
        self.termination_date = Some(date);
        Ok(())
    }
}

/// Request to create a customer. The owning dealer comes from the
/// session, never from the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    #[validate(length(min = 1, message = "name is required"))]
    pub name_or_entity: String,
    pub contact_person: Option<String>,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "official id is required"))]
    pub official_id: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

/// Request to update customer profile fields. Status and termination
/// details are not writable here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub name_or_entity: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub official_id: Option<String>,
    pub address: Option<String>,
}
