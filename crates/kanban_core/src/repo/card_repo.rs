//! Card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist cards and expose the primitive moves the ordering engine composes:
//!   count, bulk order shift, scoped order assignment, placement update.
//! - Provide the unit-of-work boundary (`in_transaction`) for multi-step
//!   ordering operations.
//!
//! # Invariants
//! - Column listing is deterministic: `sort_order ASC, created_at ASC, card_uuid ASC`.
//! - Bulk shifts never touch the excluded card.
//! - Nothing here checks ownership or order density.

use crate::model::card::{Card, CardFields, CardId, Priority};
use crate::model::column::ColumnId;
use crate::model::now_epoch_ms;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const CARD_SELECT_SQL: &str = "SELECT
    card_uuid,
    column_uuid,
    owner_uuid,
    title,
    description,
    priority,
    due_at,
    sort_order,
    created_at,
    updated_at
FROM cards";

/// Which side of the pivot a bulk shift applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBound {
    /// `order > pivot`
    Above(i64),
    /// `order >= pivot`
    AtOrAbove(i64),
}

/// Bulk `order += delta` over one column's cards matching `bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderShift {
    pub column: ColumnId,
    pub bound: OrderBound,
    pub delta: i64,
    /// Card left out of the shift (the one being moved).
    pub exclude: Option<CardId>,
}

impl OrderShift {
    /// Decrements every card after `order`, closing the gap it leaves.
    pub fn close_gap(column: ColumnId, order: i64, exclude: Option<CardId>) -> Self {
        Self {
            column,
            bound: OrderBound::Above(order),
            delta: -1,
            exclude,
        }
    }

    /// Increments every card at or after `position`, freeing that slot.
    pub fn open_gap(column: ColumnId, position: i64, exclude: Option<CardId>) -> Self {
        Self {
            column,
            bound: OrderBound::AtOrAbove(position),
            delta: 1,
            exclude,
        }
    }
}

/// Card store contract used by the ordering engine and card service.
pub trait CardRepository {
    fn insert_card(&self, card: &Card) -> RepoResult<()>;
    fn get_card(&self, id: CardId) -> RepoResult<Option<Card>>;
    /// Lists one column's cards in display order.
    fn list_cards(&self, column: ColumnId) -> RepoResult<Vec<Card>>;
    fn count_cards(&self, column: ColumnId) -> RepoResult<i64>;
    /// Applies a bulk shift and returns the number of cards touched.
    fn shift_orders(&self, shift: &OrderShift) -> RepoResult<usize>;
    /// Sets `order` for a card, scoped to `column`.
    ///
    /// Returns `false` when nothing changed: the card is not in `column`, or
    /// it already has that order (no write, `updated_at` untouched).
    fn set_order(&self, id: CardId, column: ColumnId, order: i64) -> RepoResult<bool>;
    /// Places a card at `order` inside `column`.
    fn set_position(&self, id: CardId, column: ColumnId, order: i64) -> RepoResult<()>;
    fn update_fields(&self, id: CardId, fields: &CardFields) -> RepoResult<()>;
    fn delete_card(&self, id: CardId) -> RepoResult<()>;
    /// Runs `work` as one atomic unit holding the store's write lock.
    ///
    /// Commits when `work` returns `Ok`, rolls back otherwise. Must not be
    /// nested.
    fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn insert_card(&self, card: &Card) -> RepoResult<()> {
        card.validate()?;
        self.conn.execute(
            "INSERT INTO cards (
                card_uuid,
                column_uuid,
                owner_uuid,
                title,
                description,
                priority,
                due_at,
                sort_order,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                card.id.to_string(),
                card.column.to_string(),
                card.owner.to_string(),
                card.title.as_str(),
                card.description.as_str(),
                card.priority.as_str(),
                card.due_at,
                card.order,
                card.created_at,
                card.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_card(&self, id: CardId) -> RepoResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE card_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_card_row(row)?));
        }
        Ok(None)
    }

    fn list_cards(&self, column: ColumnId) -> RepoResult<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CARD_SELECT_SQL}
             WHERE column_uuid = ?1
             ORDER BY sort_order ASC, created_at ASC, card_uuid ASC;"
        ))?;
        let mut rows = stmt.query([column.to_string()])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }
        Ok(cards)
    }

    fn count_cards(&self, column: ColumnId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM cards WHERE column_uuid = ?1;",
            [column.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn shift_orders(&self, shift: &OrderShift) -> RepoResult<usize> {
        let (sql, pivot) = match shift.bound {
            OrderBound::Above(pivot) => (
                "UPDATE cards
                 SET sort_order = sort_order + ?2,
                     updated_at = ?3
                 WHERE column_uuid = ?1
                   AND sort_order > ?4
                   AND (?5 IS NULL OR card_uuid != ?5);",
                pivot,
            ),
            OrderBound::AtOrAbove(pivot) => (
                "UPDATE cards
                 SET sort_order = sort_order + ?2,
                     updated_at = ?3
                 WHERE column_uuid = ?1
                   AND sort_order >= ?4
                   AND (?5 IS NULL OR card_uuid != ?5);",
                pivot,
            ),
        };
        let changed = self.conn.execute(
            sql,
            params![
                shift.column.to_string(),
                shift.delta,
                now_epoch_ms(),
                pivot,
                shift.exclude.map(|id| id.to_string()),
            ],
        )?;
        Ok(changed)
    }

    fn set_order(&self, id: CardId, column: ColumnId, order: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE cards
             SET sort_order = ?3,
                 updated_at = ?4
             WHERE card_uuid = ?1
               AND column_uuid = ?2
               AND sort_order != ?3;",
            params![id.to_string(), column.to_string(), order, now_epoch_ms()],
        )?;
        Ok(changed > 0)
    }

    fn set_position(&self, id: CardId, column: ColumnId, order: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE cards
             SET column_uuid = ?2,
                 sort_order = ?3,
                 updated_at = ?4
             WHERE card_uuid = ?1;",
            params![id.to_string(), column.to_string(), order, now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(id));
        }
        Ok(())
    }

    fn update_fields(&self, id: CardId, fields: &CardFields) -> RepoResult<()> {
        fields.validate()?;
        let changed = self.conn.execute(
            "UPDATE cards
             SET title = ?2,
                 description = ?3,
                 priority = ?4,
                 due_at = ?5,
                 updated_at = ?6
             WHERE card_uuid = ?1;",
            params![
                id.to_string(),
                fields.title.as_str(),
                fields.description.as_str(),
                fields.priority.as_str(),
                fields.due_at,
                now_epoch_ms(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(id));
        }
        Ok(())
    }

    fn delete_card(&self, id: CardId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE card_uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::CardNotFound(id));
        }
        Ok(())
    }

    fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        // IMMEDIATE takes the write lock up front so two ordering operations
        // never interleave their shift and final write.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = work()?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    let id_text: String = row.get("card_uuid")?;
    let column_text: String = row.get("column_uuid")?;
    let owner_text: String = row.get("owner_uuid")?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::from_db(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in cards.priority"))
    })?;

    let order: i64 = row.get("sort_order")?;
    if order < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative order `{order}` in cards.sort_order"
        )));
    }

    Ok(Card {
        id: parse_uuid(&id_text, "cards.card_uuid")?,
        owner: parse_uuid(&owner_text, "cards.owner_uuid")?,
        column: parse_uuid(&column_text, "cards.column_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        due_at: row.get("due_at")?,
        order,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
