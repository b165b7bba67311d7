//! Calendar date parsing at the domain boundary.

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult};

/// ISO calendar date format used for input, storage and export.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> DomainResult<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("date is required"));
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map_err(|e| DomainError::validation(format!("date `{trimmed}` is not YYYY-MM-DD: {e}")))
}
