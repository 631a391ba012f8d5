//! Input validation utilities

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for account usernames
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9._-]*$").unwrap());

/// Validate a login username
pub fn validate_username(username: &str) -> bool {
    username.len() >= 3 && username.len() <= 64 && USERNAME_REGEX.is_match(username)
}

/// Validate an identity number (employee aadhar / customer official id).
/// Must contain at least one alphanumeric character once separators are
/// ignored; the stored value keeps its original formatting.
pub fn validate_identity_number(value: &str) -> bool {
    !value.trim().is_empty()
        && value.len() <= 64
        && value.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Validate a phone number: at least 6 digits among the characters
pub fn validate_phone(value: &str) -> bool {
    value.chars().filter(|c| c.is_ascii_digit()).count() >= 6
}

/// Minimal email shape check; full verification happens out-of-band
pub fn validate_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Parse an ISO business date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Validate a free-text reason field (termination, suspension, deletion)
pub fn validate_reason(value: &str) -> bool {
    !value.trim().is_empty() && value.len() <= 1000
}
