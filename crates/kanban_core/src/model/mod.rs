//! Board domain model.
//!
//! # Responsibility
//! - Define columns, cards and the field rules shared by every write path.
//! - Normalize loosely-typed client input (priority, due date) into typed values.
//!
//! # Invariants
//! - Every column and card is identified by a stable UUID.
//! - A card's `order` is only changed by the ordering engine.

pub mod card;
pub mod column;
pub mod normalize;

use chrono::Utc;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Caller identity handed in by the authentication layer.
pub type OwnerId = Uuid;

/// Current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Field-level validation failure for columns and cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    /// Trimmed title length (in chars) is outside the allowed range.
    TitleLength {
        min: usize,
        max: usize,
        actual: usize,
    },
    /// Description exceeds the allowed length (in chars).
    DescriptionTooLong { max: usize, actual: usize },
}

impl Display for FieldValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleLength { min, max, actual } => write!(
                f,
                "title must be {min}-{max} characters, got {actual}"
            ),
            Self::DescriptionTooLong { max, actual } => write!(
                f,
                "description must be at most {max} characters, got {actual}"
            ),
        }
    }
}

impl Error for FieldValidationError {}

pub(crate) fn check_title(title: &str, min: usize, max: usize) -> Result<(), FieldValidationError> {
    let actual = title.chars().count();
    if actual < min || actual > max {
        return Err(FieldValidationError::TitleLength { min, max, actual });
    }
    Ok(())
}
