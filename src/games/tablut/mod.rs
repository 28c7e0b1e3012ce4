//! Tablut: the 9x9 rules engine, its incremental move index, the playout
//! heuristic and the match-server messages.
//!
//! White (with the King) tries to walk the King onto an escape cell on the
//! board edge; Black, starting from the four camps, tries to capture it.

pub mod game;
pub mod geometry;
pub mod grid;
pub mod index;
pub mod opening;
pub mod piece;
pub mod policy;
pub mod state;
pub mod tactics;
pub mod weights;
pub mod wire;

pub use game::{Outcome, TablutGame, DEFAULT_MAX_ROLLOUT_PLIES};
pub use geometry::{CellKind, Direction, Position};
pub use grid::{Grid, TemporaryMove};
pub use index::MoveIndex;
pub use opening::OpeningBook;
pub use piece::{Action, Capture, Piece, PieceKind, Side};
pub use policy::TablutPolicy;
pub use state::{GameState, Status};
pub use weights::Weights;
pub use wire::{ServerAction, ServerState, Turn};
