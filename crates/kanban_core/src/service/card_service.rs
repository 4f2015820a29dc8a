//! Card read and content-edit service.
//!
//! Placement changes (`column`, `order`) go through
//! [`crate::service::ordering_engine::OrderingEngine`]; this service never
//! touches them.

use crate::model::card::{Card, CardId, CardPatch};
use crate::model::column::ColumnId;
use crate::model::OwnerId;
use crate::repo::card_repo::CardRepository;
use crate::repo::column_repo::ColumnRepository;
use crate::service::error::KanbanError;
use crate::service::{owned_card, owned_column};
use log::debug;

/// Card service facade.
pub struct CardService<C: ColumnRepository, K: CardRepository> {
    columns: C,
    cards: K,
}

impl<C: ColumnRepository, K: CardRepository> CardService<C, K> {
    pub fn new(columns: C, cards: K) -> Self {
        Self { columns, cards }
    }

    pub fn get_card(&self, id: CardId, owner: OwnerId) -> Result<Card, KanbanError> {
        owned_card(&self.cards, id, owner)
    }

    /// Lists a column's cards by `order`, then creation time.
    pub fn list_cards(&self, column_id: ColumnId, owner: OwnerId) -> Result<Vec<Card>, KanbanError> {
        let column = owned_column(&self.columns, column_id, owner)?;
        Ok(self.cards.list_cards(column.id)?)
    }

    /// Updates card content. An empty patch returns the card unchanged.
    pub fn update_card(
        &self,
        id: CardId,
        patch: CardPatch,
        owner: OwnerId,
    ) -> Result<Card, KanbanError> {
        let card = owned_card(&self.cards, id, owner)?;
        if patch.is_empty() {
            return Ok(card);
        }

        let fields = patch.apply(card.fields());
        fields.validate()?;
        self.cards.update_fields(id, &fields)?;
        debug!("event=card_update module=card status=ok card_id={id}");

        owned_card(&self.cards, id, owner)
    }
}
