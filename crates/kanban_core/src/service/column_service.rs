//! Column use-case service.
//!
//! # Invariants
//! - Only the owner can read, rename or delete a column.
//! - Deleting a column deletes its cards.

use crate::model::column::{validate_column_title, Column, ColumnId};
use crate::model::OwnerId;
use crate::repo::column_repo::ColumnRepository;
use crate::service::error::KanbanError;
use crate::service::owned_column;
use log::info;

/// Column service facade.
pub struct ColumnService<C: ColumnRepository> {
    repo: C,
}

impl<C: ColumnRepository> ColumnService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Creates an empty column owned by `owner`.
    pub fn create_column(
        &self,
        owner: OwnerId,
        title: impl AsRef<str>,
    ) -> Result<Column, KanbanError> {
        let column = Column::new(owner, title);
        column.validate()?;
        self.repo.insert_column(&column)?;
        info!(
            "event=column_create module=column status=ok column_id={}",
            column.id
        );
        Ok(column)
    }

    /// Lists the caller's columns, oldest first.
    pub fn list_columns(&self, owner: OwnerId) -> Result<Vec<Column>, KanbanError> {
        Ok(self.repo.list_columns(owner)?)
    }

    pub fn get_column(&self, id: ColumnId, owner: OwnerId) -> Result<Column, KanbanError> {
        owned_column(&self.repo, id, owner)
    }

    pub fn rename_column(
        &self,
        id: ColumnId,
        title: impl AsRef<str>,
        owner: OwnerId,
    ) -> Result<Column, KanbanError> {
        let title = title.as_ref().trim();
        validate_column_title(title)?;
        owned_column(&self.repo, id, owner)?;
        self.repo.rename_column(id, title)?;
        owned_column(&self.repo, id, owner)
    }

    pub fn delete_column(&self, id: ColumnId, owner: OwnerId) -> Result<(), KanbanError> {
        owned_column(&self.repo, id, owner)?;
        self.repo.delete_column(id)?;
        info!("event=column_delete module=column status=ok column_id={id}");
        Ok(())
    }
}
