//! Column repository contract and SQLite implementation.

use crate::model::column::{Column, ColumnId};
use crate::model::{now_epoch_ms, OwnerId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const COLUMN_SELECT_SQL: &str = "SELECT
    column_uuid,
    owner_uuid,
    title,
    created_at,
    updated_at
FROM board_columns";

/// Column lookup and lifecycle contract.
pub trait ColumnRepository {
    fn insert_column(&self, column: &Column) -> RepoResult<()>;
    fn get_column(&self, id: ColumnId) -> RepoResult<Option<Column>>;
    /// Lists an owner's columns by `created_at ASC, column_uuid ASC`.
    fn list_columns(&self, owner: OwnerId) -> RepoResult<Vec<Column>>;
    fn rename_column(&self, id: ColumnId, title: &str) -> RepoResult<()>;
    /// Deletes one column; its cards go with it.
    fn delete_column(&self, id: ColumnId) -> RepoResult<()>;
}

/// SQLite-backed column repository.
pub struct SqliteColumnRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteColumnRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ColumnRepository for SqliteColumnRepository<'_> {
    fn insert_column(&self, column: &Column) -> RepoResult<()> {
        column.validate()?;
        self.conn.execute(
            "INSERT INTO board_columns (
                column_uuid,
                owner_uuid,
                title,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                column.id.to_string(),
                column.owner.to_string(),
                column.title.as_str(),
                column.created_at,
                column.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_column(&self, id: ColumnId) -> RepoResult<Option<Column>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COLUMN_SELECT_SQL} WHERE column_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_column_row(row)?));
        }
        Ok(None)
    }

    fn list_columns(&self, owner: OwnerId) -> RepoResult<Vec<Column>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLUMN_SELECT_SQL}
             WHERE owner_uuid = ?1
             ORDER BY created_at ASC, column_uuid ASC;"
        ))?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(parse_column_row(row)?);
        }
        Ok(columns)
    }

    fn rename_column(&self, id: ColumnId, title: &str) -> RepoResult<()> {
        crate::model::column::validate_column_title(title)?;
        let changed = self.conn.execute(
            "UPDATE board_columns
             SET title = ?2,
                 updated_at = ?3
             WHERE column_uuid = ?1;",
            params![id.to_string(), title, now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::ColumnNotFound(id));
        }
        Ok(())
    }

    fn delete_column(&self, id: ColumnId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM board_columns WHERE column_uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::ColumnNotFound(id));
        }
        Ok(())
    }
}

fn parse_column_row(row: &Row<'_>) -> RepoResult<Column> {
    let id_text: String = row.get("column_uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    Ok(Column {
        id: parse_uuid(&id_text, "board_columns.column_uuid")?,
        owner: parse_uuid(&owner_text, "board_columns.owner_uuid")?,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
