//! Error types for board operations.

use thiserror::Error;

use crate::column::ColumnId;
use crate::store::StoreError;
use crate::task::TaskId;

/// A client-supplied field failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// Title was empty or whitespace only.
    #[error("title cannot be empty")]
    EmptyTitle,
    /// Title exceeds the maximum length.
    #[error("title too long (max {max} characters)")]
    TitleTooLong {
        /// Maximum length in characters.
        max: usize,
    },
    /// Color name is not one of the supported colors.
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    /// Priority name is not low, medium or high.
    #[error("unknown priority `{0}`")]
    UnknownPriority(String),
    /// Progress is outside `0..=max`.
    #[error("progress must be between 0 and {max}, got {value}")]
    ProgressOutOfRange {
        /// Rejected value.
        value: i64,
        /// Highest accepted step.
        max: u8,
    },
    /// An integer flag was neither 0 nor 1.
    #[error("`{field}` must be a boolean, got {value}")]
    InvalidFlag {
        /// Wire name of the field.
        field: &'static str,
        /// Rejected value.
        value: i64,
    },
    /// A task referenced a column that does not exist.
    #[error("column {0} does not exist")]
    UnknownColumn(ColumnId),
}

/// Errors returned by board and engine operations.
///
/// A failed operation leaves the board as it was. Column deletion spans
/// two stores and undoes its task relocation if removing the column fails.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Column with the given ID was not found.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),
    /// Task with the given ID was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Requested position lies outside `0..=max`.
    #[error("invalid position {position} (expected 0..={max})")]
    InvalidPosition {
        /// Rejected position.
        position: i64,
        /// Highest valid position for this move.
        max: u32,
    },
    /// The last column cannot be deleted while tasks still reference it.
    #[error("cannot delete column {column}: it is the last column and holds {tasks} task(s)")]
    LastColumnHasTasks {
        /// Column that was to be deleted.
        column: ColumnId,
        /// Number of tasks that would be orphaned.
        tasks: usize,
    },
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BoardError {
    /// Returns `true` for errors caused by the caller rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
