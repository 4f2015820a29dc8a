//! JSON payloads for card create/update, reorder and move.
//!
//! # Invariants
//! - Due date may arrive as `due_at`, `dueDate` or `due_date`.
//! - `null` and `""` for the due date mean "no due date".
//! - A reorder body must be a JSON array.

use crate::model::card::{CardFields, CardPatch};
use crate::model::column::ColumnId;
use crate::model::normalize::{normalize_due_date, normalize_priority};
use crate::service::error::KanbanError;
use crate::service::ordering_engine::OrderAssignment;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Card content as sent by clients, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// Outer `None`: field absent. `Some(None)`: explicit `null`.
    #[serde(
        default,
        alias = "dueDate",
        alias = "due_date",
        deserialize_with = "present_field"
    )]
    pub due_at: Option<Option<String>>,
}

impl CardPayload {
    pub fn from_json(value: Value) -> Result<Self, KanbanError> {
        serde_json::from_value(value)
            .map_err(|err| KanbanError::bad_request(format!("invalid card payload: {err}")))
    }

    /// Builds create-time fields. `title` is required; priority defaults to low.
    pub fn into_fields(self) -> Result<CardFields, KanbanError> {
        let title = self
            .title
            .ok_or_else(|| KanbanError::bad_request("title is required"))?;
        let priority = match self.priority {
            Some(raw) => normalize_priority(&raw)?,
            None => Default::default(),
        };
        let due_at = normalize_optional_due(self.due_at.flatten())?;

        let fields = CardFields::new(title)
            .with_description(self.description.unwrap_or_default())
            .with_priority(priority)
            .with_due_at(due_at);
        fields.validate()?;
        Ok(fields)
    }

    /// Builds a partial update; absent fields stay untouched.
    pub fn into_patch(self) -> Result<CardPatch, KanbanError> {
        let priority = self
            .priority
            .map(|raw| normalize_priority(&raw))
            .transpose()?;
        let due_at = self.due_at.map(normalize_optional_due).transpose()?;

        Ok(CardPatch {
            title: self.title,
            description: self.description,
            priority,
            due_at,
        })
    }
}

/// Reorder request body: `[{"card_id": .., "order": ..}, ..]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPayload {
    pub assignments: Vec<OrderAssignment>,
}

impl ReorderPayload {
    pub fn from_json(value: &Value) -> Result<Self, KanbanError> {
        let items = value
            .as_array()
            .ok_or_else(|| KanbanError::bad_request("reorder payload must be an array"))?;
        let assignments = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                OrderAssignment::deserialize(item).map_err(|err| {
                    KanbanError::bad_request(format!("invalid reorder entry at index {index}: {err}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { assignments })
    }
}

/// Move request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MovePayload {
    #[serde(alias = "columnId", alias = "column", alias = "destinationColumnId")]
    pub column_id: ColumnId,
    #[serde(alias = "newPosition", alias = "order")]
    pub position: i64,
}

impl MovePayload {
    pub fn from_json(value: Value) -> Result<Self, KanbanError> {
        serde_json::from_value(value)
            .map_err(|err| KanbanError::bad_request(format!("invalid move payload: {err}")))
    }
}

fn normalize_optional_due(raw: Option<String>) -> Result<Option<i64>, KanbanError> {
    match raw {
        Some(value) => Ok(normalize_due_date(&value)?),
        None => Ok(None),
    }
}

fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
