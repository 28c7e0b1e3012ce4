//! Tablut game state: the grid, the move index and everything derived from
//! move history.
//!
//! The grid and the index are only ever mutated together through
//! [`GameState::apply_action`]. Read-only peeks go through
//! [`GameState::temporary`], whose guard borrows the state mutably so nothing
//! can query the index while the grid is out of step with it.

use std::fmt;
use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::geometry::{cell_kind, CellKind, Position};
use super::grid::{Grid, TemporaryMove};
use super::index::MoveIndex;
use super::piece::{Action, PieceKind, Side};
use crate::core::{Error, Result};

/// Whether the game is over, and how.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Ongoing,
    WhiteWin,
    BlackWin,
    Draw,
}

impl Status {
    /// Status when `side` has won.
    #[must_use]
    pub const fn win_for(side: Side) -> Self {
        match side {
            Side::White => Status::WhiteWin,
            Side::Black => Status::BlackWin,
        }
    }

    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Status::WhiteWin => Some(Side::White),
            Status::BlackWin => Some(Side::Black),
            Status::Ongoing | Status::Draw => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Status::Ongoing)
    }
}

/// Full game state.
///
/// Cloning is cheap: the index lists and the repetition history are shared
/// until one side writes to them.
#[derive(Clone)]
pub struct GameState {
    grid: Grid,
    turn: Side,
    king: Option<Position>,
    white_count: u8,
    black_count: u8,
    status: Status,
    /// Boards seen since the last capture, current one included.
    history: Vector<Grid>,
    first_move: bool,
    first_action: Option<Action>,
    last_action: Option<Action>,
    index: Arc<MoveIndex>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The standard starting position, White to move.
    #[must_use]
    pub fn new() -> Self {
        let grid = Grid::standard();
        let mut state = Self::assemble(grid, Side::White, grid.find_king());
        state.first_move = true;
        state
    }

    /// A state built from an arbitrary board, e.g. a server snapshot.
    ///
    /// The opening book is disabled for such states since the first moves are
    /// unknown. A King already on an escape cell, an exhausted Black army or a
    /// side to move without moves yields a finished game.
    pub fn from_grid(grid: Grid, turn: Side) -> Result<Self> {
        let kings = grid.count(PieceKind::King);
        match kings {
            0 => return Err(Error::MissingKing),
            1 => {}
            n => return Err(Error::MultipleKings(n)),
        }
        let mut state = Self::assemble(grid, turn, grid.find_king());
        if state.king.is_some_and(|k| cell_kind(k) == CellKind::Escape) || state.black_count == 0 {
            state.status = Status::WhiteWin;
        } else if !state.index.has_actions(&state.grid, turn) {
            state.status = Status::win_for(turn.opponent());
        }
        Ok(state)
    }

    fn assemble(grid: Grid, turn: Side, king: Option<Position>) -> Self {
        let count = |kind| u8::try_from(grid.count(kind)).unwrap_or(u8::MAX);
        Self {
            grid,
            turn,
            king,
            white_count: count(PieceKind::White) + count(PieceKind::King),
            black_count: count(PieceKind::Black),
            status: Status::Ongoing,
            history: Vector::unit(grid),
            first_move: false,
            first_action: None,
            last_action: None,
            index: Arc::new(MoveIndex::build(&grid)),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Side to move.
    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// King position, `None` once captured.
    #[must_use]
    pub fn king(&self) -> Option<Position> {
        self.king
    }

    /// Live White pieces, King included.
    #[must_use]
    pub fn white_count(&self) -> u8 {
        self.white_count
    }

    #[must_use]
    pub fn black_count(&self) -> u8 {
        self.black_count
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn is_white_win(&self) -> bool {
        self.status == Status::WhiteWin
    }

    #[must_use]
    pub fn is_black_win(&self) -> bool {
        self.status == Status::BlackWin
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.status == Status::Draw
    }

    /// Number of boards a repetition is checked against.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// True until both sides have made their first move of a standard game.
    #[must_use]
    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    /// White's first move, once played.
    #[must_use]
    pub fn first_action(&self) -> Option<&Action> {
        self.first_action.as_ref()
    }

    /// The move that produced this state.
    #[must_use]
    pub fn last_action(&self) -> Option<&Action> {
        self.last_action.as_ref()
    }

    #[must_use]
    pub fn index(&self) -> &MoveIndex {
        &self.index
    }

    /// Legal moves for the side to move. Empty once the game is over.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.index.legal_actions(&self.grid, self.turn)
    }

    /// Legal moves of the piece at `pos`.
    pub fn actions_from(&self, pos: Position) -> impl Iterator<Item = &Action> + '_ {
        self.index.actions_from(pos)
    }

    /// Play `action`, which must come from this state's own move generation.
    pub fn apply_action(&mut self, action: &Action) {
        debug_assert!(!self.is_terminal(), "move applied to a finished game");
        debug_assert_eq!(action.side(), Some(self.turn), "move played out of turn");

        if self.first_move {
            match self.turn {
                Side::White => self.first_action = Some(action.clone()),
                Side::Black => self.first_move = false,
            }
        }

        let mover = action.kind();
        self.grid.set(action.from(), PieceKind::Empty);
        self.grid.set(action.to, mover);
        for capture in &action.captures {
            self.grid.set(capture.position(), PieceKind::Empty);
        }
        if mover == PieceKind::King {
            self.king = Some(action.to);
        }
        Arc::make_mut(&mut self.index).update(&self.grid, action);

        if action.is_capture() {
            for capture in &action.captures {
                match capture.piece.kind {
                    PieceKind::King => {
                        self.king = None;
                        self.white_count = self.white_count.saturating_sub(1);
                        self.status = Status::BlackWin;
                    }
                    PieceKind::White => self.white_count = self.white_count.saturating_sub(1),
                    PieceKind::Black => self.black_count = self.black_count.saturating_sub(1),
                    PieceKind::Empty => {}
                }
            }
            self.history.clear();
        }

        if mover == PieceKind::King && cell_kind(action.to) == CellKind::Escape {
            self.status = Status::WhiteWin;
        } else if !self.status.is_terminal() {
            if self.black_count == 0 {
                self.status = Status::WhiteWin;
            } else if self.white_count == 0 {
                self.status = Status::BlackWin;
            } else if !action.is_capture() && self.history.iter().any(|seen| *seen == self.grid) {
                self.status = Status::Draw;
            }
        }
        self.history.push_back(self.grid);

        self.last_action = Some(action.clone());
        self.turn = self.turn.opponent();

        if !self.status.is_terminal() && !self.index.has_actions(&self.grid, self.turn) {
            self.status = Status::win_for(self.turn.opponent());
        }

        self.assert_index(action);
    }

    #[cfg(any(test, feature = "index-check"))]
    fn assert_index(&self, action: &Action) {
        if let Err(err) = self.check_index() {
            panic!("{err} after {action}\n{}", self.grid);
        }
    }

    #[cfg(not(any(test, feature = "index-check")))]
    fn assert_index(&self, _action: &Action) {}

    /// Compare the live index with a full rebuild.
    pub fn check_index(&self) -> Result<()> {
        match self.index.first_difference(&MoveIndex::build(&self.grid)) {
            None => Ok(()),
            Some((pos, dir)) => Err(Error::IndexDesync {
                square: pos.to_square(),
                direction: dir.to_string(),
            }),
        }
    }

    /// Show `action` on the grid until the guard drops. The index is not
    /// touched and cannot be read meanwhile.
    pub fn temporary<'a>(&'a mut self, action: &'a Action) -> TemporaryMove<'a> {
        let king = self.king;
        self.grid.temporary(action, king)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("turn", &self.turn)
            .field("status", &self.status)
            .field("king", &self.king)
            .field("white_count", &self.white_count)
            .field("black_count", &self.black_count)
            .field("history_len", &self.history.len())
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}
