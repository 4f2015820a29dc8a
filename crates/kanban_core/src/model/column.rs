//! Column domain model.

use crate::model::{check_title, now_epoch_ms, FieldValidationError, OwnerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ColumnId = Uuid;

pub const COLUMN_TITLE_MIN_CHARS: usize = 1;
pub const COLUMN_TITLE_MAX_CHARS: usize = 100;

/// Container of ordered cards, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub owner: OwnerId,
    pub title: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Column {
    /// Creates a column with a generated id; the title is trimmed.
    pub fn new(owner: OwnerId, title: impl AsRef<str>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            owner,
            title: title.as_ref().trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), FieldValidationError> {
        validate_column_title(&self.title)
    }

    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner == owner
    }
}

/// Checks a (trimmed) column title against the length bounds.
pub fn validate_column_title(title: &str) -> Result<(), FieldValidationError> {
    check_title(title, COLUMN_TITLE_MIN_CHARS, COLUMN_TITLE_MAX_CHARS)
}
