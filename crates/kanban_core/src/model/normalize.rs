//! Normalization of loosely-typed client input.
//!
//! # Responsibility
//! - Fold free-form priority strings into [`Priority`].
//! - Parse due-date strings into epoch milliseconds.
//!
//! # Invariants
//! - Only the documented "no priority" synonyms fall back to `Priority::Low`;
//!   any other unknown priority is rejected.
//! - An empty due-date string means "no due date"; other unparseable strings
//!   are rejected.

use crate::model::card::Priority;
use chrono::{DateTime, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inputs that mean "no priority" and collapse to the default.
const NO_PRIORITY_SYNONYMS: &[&str] = &[
    "",
    "none",
    "null",
    "no",
    "no priority",
    "no_priority",
    "no-priority",
    "n/a",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    InvalidPriority(String),
    InvalidDueDate(String),
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPriority(value) => write!(
                f,
                "invalid priority `{value}`; expected low|medium|high"
            ),
            Self::InvalidDueDate(value) => write!(
                f,
                "invalid due date `{value}`; expected RFC 3339 timestamp or YYYY-MM-DD"
            ),
        }
    }
}

impl Error for NormalizeError {}

/// Case-folds and trims `raw`, mapping it onto a [`Priority`].
pub fn normalize_priority(raw: &str) -> Result<Priority, NormalizeError> {
    let folded = raw.trim().to_ascii_lowercase();
    if NO_PRIORITY_SYNONYMS.contains(&folded.as_str()) {
        return Ok(Priority::default());
    }
    Priority::from_db(&folded).ok_or_else(|| NormalizeError::InvalidPriority(raw.to_string()))
}

/// Parses a due date into epoch milliseconds.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00Z`, any offset) or a bare calendar
/// date (`2024-05-01`, taken as midnight UTC). Blank input yields `None`.
pub fn normalize_due_date(raw: &str) -> Result<Option<i64>, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(timestamp.timestamp_millis()));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc().timestamp_millis()))
        .ok_or_else(|| NormalizeError::InvalidDueDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{normalize_due_date, normalize_priority, NormalizeError};
    use crate::model::card::Priority;

    #[test]
    fn priority_is_trimmed_and_case_folded() {
        assert_eq!(normalize_priority(" HIGH ").unwrap(), Priority::High);
        assert_eq!(normalize_priority("Medium").unwrap(), Priority::Medium);
        assert_eq!(normalize_priority("low").unwrap(), Priority::Low);
    }

    #[test]
    fn no_priority_synonyms_collapse_to_low() {
        for raw in ["", "  ", "None", "NULL", "no priority", "N/A"] {
            assert_eq!(normalize_priority(raw).unwrap(), Priority::Low, "{raw:?}");
        }
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let err = normalize_priority("urgent").unwrap_err();
        assert_eq!(err, NormalizeError::InvalidPriority("urgent".to_string()));
    }

    #[test]
    fn due_date_accepts_rfc3339_and_calendar_dates() {
        assert_eq!(
            normalize_due_date("1970-01-02").unwrap(),
            Some(86_400_000)
        );
        assert_eq!(
            normalize_due_date("1970-01-01T01:00:00+01:00").unwrap(),
            Some(0)
        );
        assert_eq!(normalize_due_date("   ").unwrap(), None);
    }

    #[test]
    fn unparseable_due_date_is_rejected() {
        assert!(matches!(
            normalize_due_date("next tuesday"),
            Err(NormalizeError::InvalidDueDate(_))
        ));
        assert!(normalize_due_date("2024-02-30").is_err());
    }
}
