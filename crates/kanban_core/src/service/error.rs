//! Service error taxonomy.
//!
//! Every service call fails with one [`KanbanError`]; [`KanbanError::kind`]
//! gives the caller a coarse class to map onto response codes.

use crate::model::card::CardId;
use crate::model::column::ColumnId;
use crate::model::normalize::NormalizeError;
use crate::model::FieldValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Coarse failure class of a [`KanbanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Forbidden,
    Internal,
}

impl ErrorKind {
    /// Stable name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Internal => "internal",
        }
    }
}

/// Errors from board service operations.
#[derive(Debug)]
pub enum KanbanError {
    /// Malformed or out-of-contract input.
    BadRequest(String),
    ColumnNotFound(ColumnId),
    CardNotFound(CardId),
    /// Caller does not own the referenced resource.
    Forbidden {
        resource: &'static str,
        id: Uuid,
    },
    /// Storage-level failure.
    Repo(RepoError),
}

impl KanbanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::ColumnNotFound(_) | Self::CardNotFound(_) => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl Display for KanbanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::CardNotFound(id) => write!(f, "card not found: {id}"),
            Self::Forbidden { resource, id } => {
                write!(f, "forbidden: caller does not own {resource} {id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for KanbanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for KanbanError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ColumnNotFound(id) => Self::ColumnNotFound(id),
            RepoError::CardNotFound(id) => Self::CardNotFound(id),
            RepoError::Validation(err) => Self::BadRequest(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

impl From<FieldValidationError> for KanbanError {
    fn from(value: FieldValidationError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

impl From<NormalizeError> for KanbanError {
    fn from(value: NormalizeError) -> Self {
        Self::BadRequest(value.to_string())
    }
}
