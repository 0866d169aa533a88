//! Board model and position reindexing engine for Zenban.
//!
//! Columns are ranked left to right across the whole board; tasks are
//! ranked top to bottom within their column. Every operation in this crate
//! keeps those ranks contiguous from zero.

pub mod board;
pub mod column;
pub mod engine;
pub mod error;
pub mod seed;
pub mod store;
pub mod task;
pub mod validate;

pub use board::{Board, ColumnRemoval, IntegrityError};
pub use column::{Column, ColumnColor, ColumnDraft, ColumnId, ColumnPatch, NewColumn};
pub use error::{BoardError, ValidationError};
pub use store::{ChangeSet, EntityStore, MemStore, Positioned, Relocatable, StoreError};
pub use task::{NewTask, Priority, Task, TaskDraft, TaskId, TaskPatch};
