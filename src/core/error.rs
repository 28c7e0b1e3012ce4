//! Error types for the crate.
//!
//! Rules and search never fail: an empty move list is a loss, an overlong
//! rollout is a draw. Errors only come from the boundaries where outside data
//! enters (server messages, weight vectors, square notation) and from the
//! move-index consistency check.

use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid cell label '{label}' at row {row}, column {col}")]
    InvalidCellLabel { label: String, row: usize, col: usize },

    #[error("invalid turn label '{0}' (expected WHITE, BLACK, WHITEWIN, BLACKWIN or DRAW)")]
    InvalidTurnLabel(String),

    #[error("board must be 9x9, got {rows} rows with a {cols}-cell row")]
    InvalidGridShape { rows: usize, cols: usize },

    #[error("invalid square '{0}' (expected A1 through I9)")]
    InvalidSquare(String),

    #[error("game is already over ({0})")]
    GameOver(String),

    #[error("board has no king")]
    MissingKing,

    #[error("board has {0} kings")]
    MultipleKings(usize),

    #[error("invalid weights: {message}")]
    InvalidWeights { message: String },

    #[error("move index disagrees with the board for the piece at {square} looking {direction}")]
    IndexDesync { square: String, direction: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error with the operation that failed.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}
