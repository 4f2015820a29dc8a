//! Card ordering engine.
//!
//! # Responsibility
//! - Append, remove, reorder and move cards while keeping every column's
//!   `order` values dense.
//!
//! # Invariants
//! - For every column C, card orders are exactly `0..count(C)` before and
//!   after each successful call.
//! - Each call runs its shifts and final write inside one store transaction;
//!   a failure at any step leaves no trace.
//! - Move positions are clamped to `[0, destination count]`.
//! - Reorder only accepts a full permutation of the column's cards.

use crate::model::card::{Card, CardFields, CardId};
use crate::model::column::ColumnId;
use crate::model::OwnerId;
use crate::repo::card_repo::{CardRepository, OrderShift};
use crate::repo::column_repo::ColumnRepository;
use crate::service::error::KanbanError;
use crate::service::{owned_card, owned_column};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Arguments;
use std::time::Instant;

/// One `(card, new order)` pair of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
    #[serde(alias = "cardId", alias = "id", alias = "_id")]
    pub card_id: CardId,
    pub order: i64,
}

impl OrderAssignment {
    pub fn new(card_id: CardId, order: i64) -> Self {
        Self { card_id, order }
    }
}

/// Ordering engine over column and card stores.
pub struct OrderingEngine<C: ColumnRepository, K: CardRepository> {
    columns: C,
    cards: K,
}

impl<C: ColumnRepository, K: CardRepository> OrderingEngine<C, K> {
    pub fn new(columns: C, cards: K) -> Self {
        Self { columns, cards }
    }

    /// Creates a card at the end of `column_id`.
    ///
    /// # Errors
    /// - `BadRequest` when `fields` break field rules.
    /// - `ColumnNotFound`, or `Forbidden` when `owner` does not own the column.
    pub fn append(
        &self,
        column_id: ColumnId,
        fields: CardFields,
        owner: OwnerId,
    ) -> Result<Card, KanbanError> {
        let started_at = Instant::now();
        let result = fields
            .validate()
            .map_err(KanbanError::from)
            .and_then(|()| {
                self.cards
                    .in_transaction(|| self.append_locked(column_id, fields, owner))
            });
        log_outcome(
            "card_append",
            started_at,
            &result,
            format_args!("column_id={column_id}"),
        );
        result
    }

    /// Deletes a card and closes the gap it leaves in its column.
    pub fn remove(&self, card_id: CardId, owner: OwnerId) -> Result<(), KanbanError> {
        let started_at = Instant::now();
        let result = self
            .cards
            .in_transaction(|| self.remove_locked(card_id, owner));
        log_outcome(
            "card_remove",
            started_at,
            &result,
            format_args!("card_id={card_id}"),
        );
        result
    }

    /// Applies a client-supplied arrangement of one column.
    ///
    /// `assignments` must name every card of the column exactly once, with
    /// orders forming exactly `0..N`. Cards whose order does not change are
    /// not written. Returns the column's cards in their new order.
    pub fn reorder(
        &self,
        column_id: ColumnId,
        assignments: &[OrderAssignment],
        owner: OwnerId,
    ) -> Result<Vec<Card>, KanbanError> {
        let started_at = Instant::now();
        let result = self
            .cards
            .in_transaction(|| self.reorder_locked(column_id, assignments, owner));
        log_outcome(
            "card_reorder",
            started_at,
            &result,
            format_args!(
                "column_id={column_id} assignments={}",
                assignments.len()
            ),
        );
        result
    }

    /// Moves a card to `new_position` inside `destination` (which may be its
    /// current column).
    ///
    /// `new_position` is clamped to `[0, destination count]`, the count not
    /// including the moved card.
    pub fn move_card(
        &self,
        card_id: CardId,
        destination: ColumnId,
        new_position: i64,
        owner: OwnerId,
    ) -> Result<Card, KanbanError> {
        let started_at = Instant::now();
        let result = self
            .cards
            .in_transaction(|| self.move_locked(card_id, destination, new_position, owner));
        log_outcome(
            "card_move",
            started_at,
            &result,
            format_args!(
                "card_id={card_id} to_column={destination} requested_position={new_position}"
            ),
        );
        result
    }

    fn append_locked(
        &self,
        column_id: ColumnId,
        fields: CardFields,
        owner: OwnerId,
    ) -> Result<Card, KanbanError> {
        let column = owned_column(&self.columns, column_id, owner)?;
        let order = self.cards.count_cards(column.id)?;
        let card = Card::new(owner, column.id, fields, order);
        self.cards.insert_card(&card)?;
        Ok(card)
    }

    fn remove_locked(&self, card_id: CardId, owner: OwnerId) -> Result<(), KanbanError> {
        let card = owned_card(&self.cards, card_id, owner)?;
        self.cards.delete_card(card.id)?;
        self.cards
            .shift_orders(&OrderShift::close_gap(card.column, card.order, None))?;
        Ok(())
    }

    fn reorder_locked(
        &self,
        column_id: ColumnId,
        assignments: &[OrderAssignment],
        owner: OwnerId,
    ) -> Result<Vec<Card>, KanbanError> {
        let column = owned_column(&self.columns, column_id, owner)?;
        let current = self.cards.list_cards(column.id)?;
        validate_permutation(&current, assignments)?;

        for assignment in assignments {
            self.cards
                .set_order(assignment.card_id, column.id, assignment.order)?;
        }
        Ok(self.cards.list_cards(column.id)?)
    }

    fn move_locked(
        &self,
        card_id: CardId,
        destination: ColumnId,
        new_position: i64,
        owner: OwnerId,
    ) -> Result<Card, KanbanError> {
        let card = owned_card(&self.cards, card_id, owner)?;
        let destination = owned_column(&self.columns, destination, owner)?;

        let mut capacity = self.cards.count_cards(destination.id)?;
        if destination.id == card.column {
            capacity -= 1;
        }
        let position = new_position.clamp(0, capacity.max(0));

        self.cards
            .shift_orders(&OrderShift::close_gap(card.column, card.order, Some(card.id)))?;
        self.cards
            .shift_orders(&OrderShift::open_gap(destination.id, position, Some(card.id)))?;
        self.cards.set_position(card.id, destination.id, position)?;

        self.cards
            .get_card(card.id)?
            .ok_or(KanbanError::CardNotFound(card.id))
    }
}

/// Checks that `assignments` is a permutation of `current` onto `0..N`.
fn validate_permutation(
    current: &[Card],
    assignments: &[OrderAssignment],
) -> Result<(), KanbanError> {
    if assignments.len() != current.len() {
        return Err(KanbanError::bad_request(format!(
            "reorder must assign all {} cards of the column, got {}",
            current.len(),
            assignments.len()
        )));
    }

    let members: HashSet<CardId> = current.iter().map(|card| card.id).collect();
    let mut seen_cards = HashSet::with_capacity(assignments.len());
    let mut taken_slots = vec![false; assignments.len()];

    for assignment in assignments {
        if assignment.order < 0 {
            return Err(KanbanError::bad_request(format!(
                "order must be non-negative, got {} for card {}",
                assignment.order, assignment.card_id
            )));
        }
        if !members.contains(&assignment.card_id) {
            return Err(KanbanError::bad_request(format!(
                "card {} is not in this column",
                assignment.card_id
            )));
        }
        if !seen_cards.insert(assignment.card_id) {
            return Err(KanbanError::bad_request(format!(
                "card {} is assigned more than once",
                assignment.card_id
            )));
        }
        let slot = usize::try_from(assignment.order)
            .ok()
            .and_then(|index| taken_slots.get_mut(index))
            .ok_or_else(|| {
                KanbanError::bad_request(format!(
                    "order {} is out of range 0..{}",
                    assignment.order,
                    current.len()
                ))
            })?;
        if *slot {
            return Err(KanbanError::bad_request(format!(
                "order {} is assigned more than once",
                assignment.order
            )));
        }
        *slot = true;
    }
    Ok(())
}

fn log_outcome<T>(
    event: &str,
    started_at: Instant,
    result: &Result<T, KanbanError>,
    details: Arguments<'_>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={event} module=ordering status=ok {details} duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={event} module=ordering status=error {details} duration_ms={duration_ms} error_kind={}",
            err.kind().as_str()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_permutation, OrderAssignment};
    use crate::model::card::{Card, CardFields};
    use crate::service::error::ErrorKind;
    use uuid::Uuid;

    fn column_of(count: i64) -> Vec<Card> {
        let owner = Uuid::new_v4();
        let column = Uuid::new_v4();
        (0..count)
            .map(|order| Card::new(owner, column, CardFields::new("Card"), order))
            .collect()
    }

    #[test]
    fn accepts_any_full_permutation() {
        let cards = column_of(3);
        let assignments = [
            OrderAssignment::new(cards[0].id, 2),
            OrderAssignment::new(cards[1].id, 0),
            OrderAssignment::new(cards[2].id, 1),
        ];
        assert!(validate_permutation(&cards, &assignments).is_ok());
        assert!(validate_permutation(&[], &[]).is_ok());
    }

    #[test]
    fn rejects_duplicate_orders_and_gaps() {
        let cards = column_of(3);
        let duplicate = [
            OrderAssignment::new(cards[0].id, 0),
            OrderAssignment::new(cards[1].id, 0),
            OrderAssignment::new(cards[2].id, 1),
        ];
        let gap = [
            OrderAssignment::new(cards[0].id, 0),
            OrderAssignment::new(cards[1].id, 1),
            OrderAssignment::new(cards[2].id, 3),
        ];
        for assignments in [duplicate, gap] {
            let err = validate_permutation(&cards, &assignments).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
        }
    }

    #[test]
    fn rejects_partial_foreign_and_negative_assignments() {
        let cards = column_of(2);
        let partial = [OrderAssignment::new(cards[0].id, 0)];
        let foreign = [
            OrderAssignment::new(cards[0].id, 0),
            OrderAssignment::new(Uuid::new_v4(), 1),
        ];
        let negative = [
            OrderAssignment::new(cards[0].id, -1),
            OrderAssignment::new(cards[1].id, 0),
        ];
        let repeated_card = [
            OrderAssignment::new(cards[0].id, 0),
            OrderAssignment::new(cards[0].id, 1),
        ];

        assert!(validate_permutation(&cards, &partial).is_err());
        assert!(validate_permutation(&cards, &foreign).is_err());
        assert!(validate_permutation(&cards, &negative).is_err());
        assert!(validate_permutation(&cards, &repeated_card).is_err());
    }
}
