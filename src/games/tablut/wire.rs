//! Match-server messages.
//!
//! The server sends the board as a 9x9 array of cell labels plus a turn
//! label and expects back the chosen move as two squares in `E3` notation.
//! Anything the server sends that does not fit is rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::{Position, BOARD_SIZE};
use super::grid::Grid;
use super::piece::{Action, PieceKind, Side};
use super::state::{GameState, Status};
use crate::core::{Error, Result};

/// Turn label of a server state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    White,
    Black,
    WhiteWin,
    BlackWin,
    Draw,
}

impl Turn {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Turn::White => "WHITE",
            Turn::Black => "BLACK",
            Turn::WhiteWin => "WHITEWIN",
            Turn::BlackWin => "BLACKWIN",
            Turn::Draw => "DRAW",
        }
    }

    /// Side to move, `None` once the game is over.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Turn::White => Some(Side::White),
            Turn::Black => Some(Side::Black),
            Turn::WhiteWin | Turn::BlackWin | Turn::Draw => None,
        }
    }

    /// Label for `state`: the side to move, or the result when finished.
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        match state.status() {
            Status::Ongoing => match state.turn() {
                Side::White => Turn::White,
                Side::Black => Turn::Black,
            },
            Status::WhiteWin => Turn::WhiteWin,
            Status::BlackWin => Turn::BlackWin,
            Status::Draw => Turn::Draw,
        }
    }
}

impl FromStr for Turn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "WHITE" => Ok(Turn::White),
            "BLACK" => Ok(Turn::Black),
            "WHITEWIN" => Ok(Turn::WhiteWin),
            "BLACKWIN" => Ok(Turn::BlackWin),
            "DRAW" => Ok(Turn::Draw),
            other => Err(Error::InvalidTurnLabel(other.to_string())),
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const EMPTY: &str = "EMPTY";
const THRONE: &str = "THRONE";

fn cell_label(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::Empty => EMPTY,
        PieceKind::White => "WHITE",
        PieceKind::Black => "BLACK",
        PieceKind::King => "KING",
    }
}

fn parse_cell(label: &str, pos: Position) -> Result<PieceKind> {
    match label {
        "EMPTY" => Ok(PieceKind::Empty),
        "WHITE" => Ok(PieceKind::White),
        "BLACK" => Ok(PieceKind::Black),
        "KING" => Ok(PieceKind::King),
        THRONE if pos == Position::CITADEL => Ok(PieceKind::Empty),
        other => Err(Error::InvalidCellLabel {
            label: other.to_string(),
            row: pos.row as usize,
            col: pos.col as usize,
        }),
    }
}

/// A state message from the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState {
    pub board: Vec<Vec<String>>,
    pub turn: String,
}

impl ServerState {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode `state` the way the server would send it. An empty Citadel is
    /// labelled `THRONE`.
    #[must_use]
    pub fn from_game_state(state: &GameState) -> Self {
        let board = (0..BOARD_SIZE as u8)
            .map(|row| {
                (0..BOARD_SIZE as u8)
                    .map(|col| {
                        let pos = Position::new(row, col);
                        match state.grid().get(pos) {
                            PieceKind::Empty if pos == Position::CITADEL => THRONE.to_string(),
                            kind => cell_label(kind).to_string(),
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            board,
            turn: Turn::of(state).label().to_string(),
        }
    }

    pub fn parse_turn(&self) -> Result<Turn> {
        self.turn.parse()
    }

    /// Decode the board. Every row must have nine known labels.
    pub fn grid(&self) -> Result<Grid> {
        let shape_error = || Error::InvalidGridShape {
            rows: self.board.len(),
            cols: self
                .board
                .iter()
                .map(Vec::len)
                .find(|&len| len != BOARD_SIZE)
                .unwrap_or(BOARD_SIZE),
        };
        if self.board.len() != BOARD_SIZE || self.board.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(shape_error());
        }

        let mut grid = Grid::empty();
        for (r, row) in self.board.iter().enumerate() {
            for (c, label) in row.iter().enumerate() {
                let pos = Position::new(r as u8, c as u8);
                grid.set(pos, parse_cell(label, pos)?);
            }
        }
        Ok(grid)
    }

    /// Decode into a state ready for search. A finished game is an error
    /// since there is nothing to play.
    pub fn to_game_state(&self) -> Result<GameState> {
        let turn = self.parse_turn()?;
        let grid = self.grid()?;
        let side = turn.side().ok_or_else(|| Error::GameOver(turn.label().to_string()))?;
        GameState::from_grid(grid, side)
    }
}

/// A move message for the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAction {
    pub from: String,
    pub to: String,
}

impl ServerAction {
    #[must_use]
    pub fn from_action(action: &Action) -> Self {
        Self {
            from: action.from().to_square(),
            to: action.to.to_square(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Origin and destination squares.
    pub fn route(&self) -> Result<(Position, Position)> {
        Ok((Position::from_square(&self.from)?, Position::from_square(&self.to)?))
    }

    /// The legal move of `state` this message names, if any.
    pub fn resolve(&self, state: &GameState) -> Result<Option<Action>> {
        let (from, to) = self.route()?;
        Ok(state.actions_from(from).find(|a| a.to == to).cloned())
    }
}
