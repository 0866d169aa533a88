//! Shared server state.
//!
//! The whole board sits behind one [`parking_lot::Mutex`]. Column deletion
//! touches both columns and tasks, so a single lock is the simplest boundary
//! under which every request's read-modify-write runs as one unit.

use parking_lot::Mutex;
use zenban_core::{Board, BoardError};

/// State shared by all request handlers.
pub struct AppState {
    board: Mutex<Board>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Board::new())
    }
}

impl AppState {
    /// Wraps a board for sharing between handlers.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board: Mutex::new(board),
        }
    }

    /// Runs a read-only operation against the board.
    ///
    /// # Errors
    ///
    /// Propagates the operation's [`BoardError`].
    pub fn read<R>(&self, op: impl FnOnce(&Board) -> Result<R, BoardError>) -> Result<R, BoardError> {
        let board = self.board.lock();
        op(&board)
    }

    /// Runs a mutating operation against the board while holding the lock.
    ///
    /// After a successful mutation the board invariants are re-checked when
    /// debug logging is enabled.
    ///
    /// # Errors
    ///
    /// Propagates the operation's [`BoardError`].
    pub fn write<R>(
        &self,
        op: impl FnOnce(&mut Board) -> Result<R, BoardError>,
    ) -> Result<R, BoardError> {
        let mut board = self.board.lock();
        let result = op(&mut board)?;
        if tracing::enabled!(tracing::Level::DEBUG)
            && let Err(e) = board.check_integrity()
        {
            tracing::error!(error = %e, "board invariant violated after mutation");
        }
        drop(board);
        Ok(result)
    }
}
