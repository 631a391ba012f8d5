//! Cross-tenant search projection
//!
//! `GlobalSearchResult` is derived, never persisted: it is recomputed
//! from current employee/customer/dealer state on every query, so a
//! "no termination on record" answer is always current.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::CustomerType;

/// Kind of record a search hit refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchEntityType {
    Employee,
    Customer,
}

/// One row of the unified cross-tenant index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSearchResult {
    pub entity_type: SearchEntityType,
    pub entity_ref_id: Uuid,
    /// `first last` for employees, entity name for customers
    pub canonical_name: String,
    /// Phone with all non-digit characters stripped
    pub phone_norm: String,
    /// Identity number with non-alphanumerics stripped, upper-cased
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_norm: Option<String>,
    pub owner_dealer_id: Uuid,
    pub owner_dealer_name: String,
    /// Entity status verbatim: active, terminated or inactive
    pub status_summary: String,
    /// Only surfaced together with the reason, and only for
    /// terminated/inactive records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
}

/// Query string parameter for the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
