//! Core domain logic for the Kanban board backend.
//! This crate is the single source of truth for card ordering invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::payload::{CardPayload, MovePayload, ReorderPayload};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::card::{Card, CardFields, CardId, CardPatch, Priority};
pub use model::column::{Column, ColumnId};
pub use model::normalize::{normalize_due_date, normalize_priority, NormalizeError};
pub use model::{FieldValidationError, OwnerId};
pub use repo::card_repo::{CardRepository, OrderBound, OrderShift, SqliteCardRepository};
pub use repo::column_repo::{ColumnRepository, SqliteColumnRepository};
pub use repo::{RepoError, RepoResult};
pub use service::card_service::CardService;
pub use service::column_service::ColumnService;
pub use service::error::{ErrorKind, KanbanError};
pub use service::ordering_engine::{OrderAssignment, OrderingEngine};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
