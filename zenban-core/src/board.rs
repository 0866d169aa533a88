//! The board: columns and tasks kept consistent with each other.
//!
//! [`Board`] owns one column store and one task store and routes every
//! mutation through the [`engine`](crate::engine). It enforces the
//! cross-store rules the engine cannot see: tasks must reference an existing
//! column, and deleting a column hands its tasks to a survivor.

use chrono::Utc;

use crate::column::{Column, ColumnId, ColumnPatch, NewColumn};
use crate::engine;
use crate::error::{BoardError, ValidationError};
use crate::store::{ChangeSet, EntityStore, MemStore, StoreError};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

/// Outcome of a column deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRemoval {
    /// The deleted column.
    pub column: Column,
    /// Column that received the deleted column's tasks, if it had any.
    pub destination: Option<ColumnId>,
    /// Tasks that were reassigned, in their new order.
    pub reassigned: Vec<Task>,
}

/// A violated board invariant, found by [`Board::check_integrity`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// Column positions are not exactly `0..N-1`.
    #[error("column positions are not contiguous: {0:?}")]
    ColumnPositions(Vec<u32>),
    /// Task positions in one column are not exactly `0..M-1`.
    #[error("task positions in column {column} are not contiguous: {positions:?}")]
    TaskPositions {
        /// Affected column.
        column: ColumnId,
        /// Positions found, in listing order.
        positions: Vec<u32>,
    },
    /// A task references a column that does not exist.
    #[error("task {task} references missing column {column}")]
    OrphanedTask {
        /// Offending task.
        task: TaskId,
        /// Missing column.
        column: ColumnId,
    },
    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Columns and tasks behind their stores.
///
/// Not synchronized; each method is one atomic unit only when the caller
/// holds the board exclusively (e.g. behind a mutex).
#[derive(Debug, Clone, Default)]
pub struct Board<C = MemStore<Column>, T = MemStore<Task>> {
    columns: C,
    tasks: T,
}

impl Board {
    /// Creates an empty in-memory board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C, T> Board<C, T>
where
    C: EntityStore<Column>,
    T: EntityStore<Task>,
{
    /// Creates a board over the given stores.
    #[must_use]
    pub const fn with_stores(columns: C, tasks: T) -> Self {
        Self { columns, tasks }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Columns
    // ─────────────────────────────────────────────────────────────────────

    /// Returns all columns ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store fails.
    pub fn columns(&self) -> Result<Vec<Column>, BoardError> {
        Ok(self.columns.list(())?)
    }

    /// Looks up one column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown id.
    pub fn column(&self, id: ColumnId) -> Result<Column, BoardError> {
        self.columns.get(id)?.ok_or(BoardError::ColumnNotFound(id))
    }

    /// Creates a column at the right end of the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store fails.
    pub fn create_column(&mut self, new: NewColumn) -> Result<Column, BoardError> {
        let id = self.columns.next_id()?;
        let column = engine::append(&mut self.columns, Column::from_new(id, new))?;
        tracing::info!(column_id = %column.id, position = column.position, "column created");
        Ok(column)
    }

    /// Updates a column's title, color or slider flag.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown id.
    pub fn update_column(&mut self, id: ColumnId, patch: &ColumnPatch) -> Result<Column, BoardError> {
        let mut column = self.column(id)?;
        column.apply(patch);
        self.columns.put(column.clone())?;
        tracing::info!(column_id = %id, "column updated");
        Ok(column)
    }

    /// Deletes a column, handing its tasks to the surviving column with the
    /// lowest id.
    ///
    /// Reassigned tasks are appended after the destination's own tasks in
    /// their previous order, and the remaining columns are compacted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown id, or
    /// [`BoardError::LastColumnHasTasks`] if no column would be left to take
    /// the tasks.
    pub fn delete_column(&mut self, id: ColumnId) -> Result<ColumnRemoval, BoardError> {
        self.column(id)?;
        let orphans = self.tasks.list(id)?;
        let destination = self
            .columns
            .list_all()?
            .into_iter()
            .map(|column| column.id)
            .filter(|other| *other != id)
            .min();

        let reassigned = match destination {
            Some(to) => engine::relocate_all(&mut self.tasks, id, to)?,
            None if !orphans.is_empty() => {
                return Err(BoardError::LastColumnHasTasks {
                    column: id,
                    tasks: orphans.len(),
                });
            }
            None => Vec::new(),
        };
        let column = match engine::remove(&mut self.columns, id) {
            Ok(column) => column,
            Err(e) => {
                self.restore_tasks(orphans);
                return Err(e);
            }
        };

        tracing::info!(
            column_id = %id,
            destination = ?destination,
            reassigned = reassigned.len(),
            "column deleted"
        );
        Ok(ColumnRemoval {
            column,
            destination: destination.filter(|_| !reassigned.is_empty()),
            reassigned,
        })
    }

    /// Puts relocated tasks back where they were after a failed column
    /// removal. Relocation only appended to the destination, so its own
    /// tasks need no repair.
    fn restore_tasks(&mut self, original: Vec<Task>) {
        if original.is_empty() {
            return;
        }
        let count = original.len();
        let mut changes = ChangeSet::new();
        for task in original {
            changes.put(task);
        }
        match self.tasks.commit(changes) {
            Ok(()) => tracing::warn!(tasks = count, "column removal failed, tasks restored"),
            Err(e) => tracing::error!(error = %e, tasks = count, "failed to restore tasks"),
        }
    }

    /// Moves a column to `position`, shifting the columns in between.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] for an unknown id, or
    /// [`BoardError::InvalidPosition`] if `position` is not a current slot.
    pub fn move_column(&mut self, id: ColumnId, position: i64) -> Result<Column, BoardError> {
        let column = engine::move_within(&mut self.columns, id, position)?;
        tracing::info!(column_id = %id, position = column.position, "column moved");
        Ok(column)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tasks
    // ─────────────────────────────────────────────────────────────────────

    /// Returns every task, grouped by column in board order and ordered by
    /// position within each column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store fails.
    pub fn tasks(&self) -> Result<Vec<Task>, BoardError> {
        let mut all = Vec::new();
        for column in self.columns()? {
            all.extend(self.tasks.list(column.id)?);
        }
        Ok(all)
    }

    /// Returns the tasks of one column ordered by position. An unknown
    /// column simply has no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store fails.
    pub fn tasks_in(&self, column: ColumnId) -> Result<Vec<Task>, BoardError> {
        Ok(self.tasks.list(column)?)
    }

    /// Looks up one task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] for an unknown id.
    pub fn task(&self, id: TaskId) -> Result<Task, BoardError> {
        self.tasks.get(id)?.ok_or(BoardError::TaskNotFound(id))
    }

    /// Creates a task at the bottom of its column.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownColumn`] if the column does not
    /// exist.
    pub fn create_task(&mut self, new: NewTask) -> Result<Task, BoardError> {
        if self.columns.get(new.column_id)?.is_none() {
            return Err(ValidationError::UnknownColumn(new.column_id).into());
        }
        let id = self.tasks.next_id()?;
        let task = engine::append(&mut self.tasks, Task::from_new(id, new, Utc::now()))?;
        tracing::info!(
            task_id = %task.id,
            column_id = %task.column_id,
            position = task.position,
            "task created"
        );
        Ok(task)
    }

    /// Updates a task's content fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] for an unknown id.
    pub fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task, BoardError> {
        let mut task = self.task(id)?;
        task.apply(patch);
        self.tasks.put(task.clone())?;
        tracing::info!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Deletes a task and compacts its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] for an unknown id.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Task, BoardError> {
        let task = engine::remove(&mut self.tasks, id)?;
        tracing::info!(task_id = %id, column_id = %task.column_id, "task deleted");
        Ok(task)
    }

    /// Moves a task to `position` in `column`, which may be its own.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] or [`BoardError::ColumnNotFound`]
    /// for unknown ids, or [`BoardError::InvalidPosition`] if `position` is
    /// not a valid slot in the destination.
    pub fn move_task(
        &mut self,
        id: TaskId,
        column: ColumnId,
        position: i64,
    ) -> Result<Task, BoardError> {
        self.task(id)?;
        self.column(column)?;
        let task = engine::move_across(&mut self.tasks, id, column, position)?;
        tracing::info!(
            task_id = %id,
            column_id = %task.column_id,
            position = task.position,
            "task moved"
        );
        Ok(task)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Invariants
    // ─────────────────────────────────────────────────────────────────────

    /// Verifies that positions are contiguous everywhere and that every
    /// task references an existing column.
    ///
    /// # Errors
    ///
    /// Returns the first [`IntegrityError`] found.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let columns = self.columns.list(())?;
        if !engine::is_contiguous(&columns) {
            return Err(IntegrityError::ColumnPositions(
                columns.iter().map(|c| c.position).collect(),
            ));
        }

        let mut listed = 0;
        for column in &columns {
            let tasks = self.tasks.list(column.id)?;
            if !engine::is_contiguous(&tasks) {
                return Err(IntegrityError::TaskPositions {
                    column: column.id,
                    positions: tasks.iter().map(|t| t.position).collect(),
                });
            }
            listed += tasks.len();
        }

        let all = self.tasks.list_all()?;
        if all.len() != listed
            && let Some(orphan) = all
                .iter()
                .find(|task| !columns.iter().any(|c| c.id == task.column_id))
        {
            return Err(IntegrityError::OrphanedTask {
                task: orphan.id,
                column: orphan.column_id,
            });
        }
        Ok(())
    }
}
