//! Task cards.
//!
//! A [`Task`] lives in exactly one column. Positions are ranked per column:
//! the tasks sharing a `column_id` form their own contiguous `0..M-1`
//! sequence, independent of every other column.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::error::{BoardError, ValidationError};
use crate::store::{Positioned, Relocatable};
use crate::validate::{normalize_assignees, validate_title};

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 100;

/// Highest progress step a task can report.
pub const MAX_PROGRESS: u8 = 5;

/// Unique identifier for a task, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u32);

impl TaskId {
    /// Creates a `TaskId` from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for TaskId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<TaskId> for u32 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal priority (the default).
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ValidationError::UnknownPriority(other.to_string())),
        }
    }
}

/// A task card as stored and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier, immutable.
    pub id: TaskId,
    /// Task title, 1 to [`MAX_TASK_TITLE_LENGTH`] characters.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Task priority.
    pub priority: Priority,
    /// Owning column.
    pub column_id: ColumnId,
    /// Zero-based rank within the owning column.
    pub position: u32,
    /// Progress step, `0..=MAX_PROGRESS`.
    pub progress: u8,
    /// Comma-separated assignee names.
    pub assignees: Option<String>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from validated input. The position is provisional;
    /// the engine assigns the real one when the task is appended.
    #[must_use]
    pub fn from_new(id: TaskId, new: NewTask, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            priority: new.priority,
            column_id: new.column_id,
            position: 0,
            progress: new.progress,
            assignees: new.assignees,
            created_at,
        }
    }

    /// Applies a validated partial update. Column and position are never
    /// touched; those change only through a move.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(assignees) = &patch.assignees {
            self.assignees.clone_from(assignees);
        }
    }
}

impl Positioned for Task {
    type Id = TaskId;
    type Container = ColumnId;

    fn id(&self) -> TaskId {
        self.id
    }

    fn container(&self) -> ColumnId {
        self.column_id
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    fn not_found(id: TaskId) -> BoardError {
        BoardError::TaskNotFound(id)
    }
}

impl Relocatable for Task {
    fn set_container(&mut self, container: ColumnId) {
        self.column_id = container;
    }
}

/// Loosely-typed task input as received from a client.
///
/// Unknown fields (including `position`, `id` and `createdAt`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Requested title.
    pub title: Option<String>,
    /// Requested description; an empty string clears it on update.
    pub description: Option<String>,
    /// Requested priority name.
    pub priority: Option<String>,
    /// Target column; required on create, ignored on update.
    pub column_id: Option<ColumnId>,
    /// Requested progress step.
    pub progress: Option<i64>,
    /// Comma-separated assignees; an empty string clears them on update.
    pub assignees: Option<String>,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Description, `None` when absent or blank.
    pub description: Option<String>,
    /// Priority.
    pub priority: Priority,
    /// Column the task is created in.
    pub column_id: ColumnId,
    /// Progress step.
    pub progress: u8,
    /// Normalized assignee list.
    pub assignees: Option<String>,
}

impl NewTask {
    /// Creates a task input with default priority and no progress.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] or
    /// [`ValidationError::TitleTooLong`] for an unusable title.
    pub fn new(title: &str, column_id: ColumnId) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title, MAX_TASK_TITLE_LENGTH)?,
            description: None,
            priority: Priority::default(),
            column_id,
            progress: 0,
            assignees: None,
        })
    }
}

impl TryFrom<TaskDraft> for NewTask {
    type Error = ValidationError;

    fn try_from(draft: TaskDraft) -> Result<Self, Self::Error> {
        let title = draft
            .title
            .ok_or(ValidationError::MissingField("title"))?;
        let column_id = draft
            .column_id
            .ok_or(ValidationError::MissingField("columnId"))?;
        Ok(Self {
            title: validate_title(&title, MAX_TASK_TITLE_LENGTH)?,
            description: draft.description.and_then(non_blank),
            priority: draft
                .priority
                .as_deref()
                .map(str::parse)
                .transpose()?
                .unwrap_or_default(),
            column_id,
            progress: draft.progress.map(validate_progress).transpose()?.unwrap_or(0),
            assignees: draft.assignees.as_deref().and_then(normalize_assignees),
        })
    }
}

/// Validated partial update for a task.
///
/// The nested `Option`s distinguish "leave unchanged" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<Option<String>>,
    /// New priority, if changing.
    pub priority: Option<Priority>,
    /// New progress step, if changing.
    pub progress: Option<u8>,
    /// New assignees, if changing.
    pub assignees: Option<Option<String>>,
}

impl TryFrom<TaskDraft> for TaskPatch {
    type Error = ValidationError;

    fn try_from(draft: TaskDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            title: draft
                .title
                .map(|title| validate_title(&title, MAX_TASK_TITLE_LENGTH))
                .transpose()?,
            description: draft.description.map(non_blank),
            priority: draft.priority.as_deref().map(str::parse).transpose()?,
            progress: draft.progress.map(validate_progress).transpose()?,
            assignees: draft.assignees.as_deref().map(normalize_assignees),
        })
    }
}

fn validate_progress(value: i64) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|progress| *progress <= MAX_PROGRESS)
        .ok_or(ValidationError::ProgressOutOfRange {
            value,
            max: MAX_PROGRESS,
        })
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
