//! Board use-case services.
//!
//! # Responsibility
//! - Enforce ownership above the repository layer.
//! - Keep ordering rules in one place (`ordering_engine`).
//!
//! # Invariants
//! - Caller identity is always an explicit `OwnerId` argument.
//! - Ownership is checked before any write, so a rejected call changes nothing.

pub mod card_service;
pub mod column_service;
pub mod error;
pub mod ordering_engine;

use crate::model::card::{Card, CardId};
use crate::model::column::{Column, ColumnId};
use crate::model::OwnerId;
use crate::repo::card_repo::CardRepository;
use crate::repo::column_repo::ColumnRepository;
use error::KanbanError;

fn owned_column<C: ColumnRepository>(
    columns: &C,
    id: ColumnId,
    owner: OwnerId,
) -> Result<Column, KanbanError> {
    let column = columns
        .get_column(id)?
        .ok_or(KanbanError::ColumnNotFound(id))?;
    if !column.is_owned_by(owner) {
        return Err(KanbanError::Forbidden {
            resource: "column",
            id,
        });
    }
    Ok(column)
}

fn owned_card<K: CardRepository>(
    cards: &K,
    id: CardId,
    owner: OwnerId,
) -> Result<Card, KanbanError> {
    let card = cards.get_card(id)?.ok_or(KanbanError::CardNotFound(id))?;
    if !card.is_owned_by(owner) {
        return Err(KanbanError::Forbidden { resource: "card", id });
    }
    Ok(card)
}
