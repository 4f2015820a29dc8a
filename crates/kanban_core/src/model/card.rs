//! Card domain model.
//!
//! # Invariants
//! - `title` is stored trimmed and is 3-100 characters long.
//! - `description` is at most 500 characters.
//! - `order` is a zero-based position, dense per column.

use crate::model::column::ColumnId;
use crate::model::{check_title, now_epoch_ms, FieldValidationError, OwnerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CardId = Uuid;

pub const CARD_TITLE_MIN_CHARS: usize = 3;
pub const CARD_TITLE_MAX_CHARS: usize = 100;
pub const CARD_DESCRIPTION_MAX_CHARS: usize = 500;

/// Card priority. `Low` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses an exact storage name. Client input goes through
    /// [`crate::model::normalize::normalize_priority`] instead.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// User-editable card content. Placement (`column`, `order`) is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFields {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Unix epoch milliseconds.
    pub due_at: Option<i64>,
}

impl CardFields {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_at(mut self, due_at: Option<i64>) -> Self {
        self.due_at = due_at;
        self
    }

    pub fn validate(&self) -> Result<(), FieldValidationError> {
        check_title(&self.title, CARD_TITLE_MIN_CHARS, CARD_TITLE_MAX_CHARS)?;
        let actual = self.description.chars().count();
        if actual > CARD_DESCRIPTION_MAX_CHARS {
            return Err(FieldValidationError::DescriptionTooLong {
                max: CARD_DESCRIPTION_MAX_CHARS,
                actual,
            });
        }
        Ok(())
    }
}

/// Partial update of [`CardFields`]; `None` leaves a field untouched.
///
/// `due_at: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_at: Option<Option<i64>>,
}

impl CardPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_at.is_none()
    }

    /// Applies this patch on top of `fields`, returning the merged result.
    pub fn apply(self, mut fields: CardFields) -> CardFields {
        if let Some(title) = self.title {
            fields.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
        if let Some(priority) = self.priority {
            fields.priority = priority;
        }
        if let Some(due_at) = self.due_at {
            fields.due_at = due_at;
        }
        fields
    }
}

/// Persisted card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub owner: OwnerId,
    pub column: ColumnId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Unix epoch milliseconds.
    pub due_at: Option<i64>,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Card {
    /// Builds a new card record at `order` inside `column`.
    pub fn new(owner: OwnerId, column: ColumnId, fields: CardFields, order: i64) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            owner,
            column,
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            due_at: fields.due_at,
            order,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn fields(&self) -> CardFields {
        CardFields {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_at: self.due_at,
        }
    }

    pub fn validate(&self) -> Result<(), FieldValidationError> {
        self.fields().validate()
    }

    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner == owner
    }
}

#[cfg(test)]
mod tests {
    use super::{CardFields, CardPatch, Priority, CARD_DESCRIPTION_MAX_CHARS};
    use crate::model::FieldValidationError;

    #[test]
    fn card_fields_trim_title_and_default_to_low_priority() {
        let fields = CardFields::new("  Write docs  ");
        assert_eq!(fields.title, "Write docs");
        assert_eq!(fields.priority, Priority::Low);
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn title_bounds_are_counted_in_chars() {
        assert!(matches!(
            CardFields::new("ab").validate(),
            Err(FieldValidationError::TitleLength { actual: 2, .. })
        ));
        assert!(CardFields::new("äöü").validate().is_ok());
        assert!(CardFields::new("x".repeat(101)).validate().is_err());
    }

    #[test]
    fn description_limit_is_enforced() {
        let fields =
            CardFields::new("Title").with_description("d".repeat(CARD_DESCRIPTION_MAX_CHARS + 1));
        assert!(matches!(
            fields.validate(),
            Err(FieldValidationError::DescriptionTooLong { actual: 501, .. })
        ));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let base = CardFields::new("Original")
            .with_priority(Priority::High)
            .with_due_at(Some(10));
        let patched = CardPatch {
            title: Some(" Renamed ".to_string()),
            due_at: Some(None),
            ..CardPatch::default()
        }
        .apply(base);

        assert_eq!(patched.title, "Renamed");
        assert_eq!(patched.priority, Priority::High);
        assert_eq!(patched.due_at, None);
    }
}
