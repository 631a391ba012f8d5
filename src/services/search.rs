//! Cross-tenant search index
//!
//! The one read path that deliberately crosses tenant boundaries: a
//! unified projection of every employee and customer across all dealers,
//! queryable by name, phone or identity-number fragments. The projection
//! is recomputed from current store state on every query, so a result —
//! in particular a "no termination on record" answer — is never stale.

use sqlx::SqlitePool;

use crate::{
    db::{CustomerRepository, EmployeeRepository},
    models::{
        Customer, CustomerStatus, Employee, EmployeeStatus, GlobalSearchResult, SearchEntityType,
    },
    utils::AppError,
};

pub struct SearchService {
    pool: SqlitePool,
}

impl SearchService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run a free-text query against the unified index. An empty or
    /// whitespace-only query is not a search: it returns nothing and the
    /// caller must not audit it.
    pub async fn search(&self, query: &str) -> Result<Vec<GlobalSearchResult>, AppError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let name_query = trimmed.to_lowercase();
        let phone_query = normalize_phone(trimmed);
        let identity_query = normalize_identity(trimmed);

        let index = self.build_index().await?;
        Ok(index
            .into_iter()
            .filter(|item| {
                matches_fragment(&item.canonical_name.to_lowercase(), &name_query)
                    || matches_fragment(&item.phone_norm, &phone_query)
                    || item
                        .identity_norm
                        .as_deref()
                        .is_some_and(|idn| matches_fragment(idn, &identity_query))
            })
            .collect())
    }

    /// Project every employee and customer, joined with the owning
    /// dealer's display name.
    async fn build_index(&self) -> Result<Vec<GlobalSearchResult>, AppError> {
        let employees = EmployeeRepository::new(&self.pool)
            .list_all_with_dealer()
            .await?;
        let customers = CustomerRepository::new(&self.pool)
            .list_all_with_dealer()
            .await?;

        let mut index = Vec::with_capacity(employees.len() + customers.len());
        index.extend(
            employees
                .into_iter()
                .map(|(emp, dealer_name)| project_employee(&emp, dealer_name)),
        );
        index.extend(
            customers
                .into_iter()
                .map(|(cust, dealer_name)| project_customer(&cust, dealer_name)),
        );
        Ok(index)
    }
}

/// A normalized fragment matches when it is non-empty and a substring.
/// The non-empty guard matters: a name-only query normalizes to an empty
/// phone fragment, which must not match every record.
fn matches_fragment(haystack: &str, fragment: &str) -> bool {
    !fragment.is_empty() && haystack.contains(fragment)
}

/// Strip everything but digits
fn normalize_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip non-alphanumerics and upper-case
fn normalize_identity(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn project_employee(emp: &Employee, dealer_name: String) -> GlobalSearchResult {
    let terminated = emp.status == EmployeeStatus::Terminated;
    let (termination_date, termination_reason) = termination_block(
        terminated,
        emp.termination_date,
        emp.termination_reason.as_deref(),
    );

    GlobalSearchResult {
        entity_type: SearchEntityType::Employee,
        entity_ref_id: emp.id,
        canonical_name: format!("{} {}", emp.first_name, emp.last_name),
        phone_norm: normalize_phone(&emp.phone),
        identity_norm: Some(normalize_identity(&emp.aadhar)),
        owner_dealer_id: emp.dealer_id,
        owner_dealer_name: dealer_name,
        status_summary: emp.status.to_string(),
        termination_date,
        termination_reason,
        customer_type: None,
    }
}

fn project_customer(cust: &Customer, dealer_name: String) -> GlobalSearchResult {
    let inactive = cust.status == CustomerStatus::Inactive;
    let (termination_date, termination_reason) = termination_block(
        inactive,
        cust.termination_date,
        cust.termination_reason.as_deref(),
    );

    GlobalSearchResult {
        entity_type: SearchEntityType::Customer,
        entity_ref_id: cust.id,
        canonical_name: cust.name_or_entity.clone(),
        phone_norm: normalize_phone(&cust.phone),
        identity_norm: Some(normalize_identity(&cust.official_id)),
        owner_dealer_id: cust.dealer_id,
        owner_dealer_name: dealer_name,
        status_summary: cust.status.to_string(),
        termination_date,
        termination_reason,
        customer_type: Some(cust.customer_type),
    }
}

/// Termination details are surfaced only as a complete pair on a
/// terminated/inactive record; a half-populated block is shown as none.
fn termination_block(
    ended: bool,
    date: Option<chrono::NaiveDate>,
    reason: Option<&str>,
) -> (Option<chrono::NaiveDate>, Option<String>) {
    match (ended, date, reason) {
        (true, Some(date), Some(reason)) => (Some(date), Some(reason.to_string())),
        _ => (None, None),
    }
}
