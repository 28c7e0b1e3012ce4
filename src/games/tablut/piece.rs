//! Pieces, sides, captures and actions.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::geometry::{Direction, Position};

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("White"),
            Side::Black => f.write_str("Black"),
        }
    }
}

/// Content of a board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    #[default]
    Empty,
    White,
    Black,
    King,
}

impl PieceKind {
    /// Owning side; the King plays for White.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            PieceKind::Empty => None,
            PieceKind::White | PieceKind::King => Some(Side::White),
            PieceKind::Black => Some(Side::Black),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, PieceKind::Empty)
    }

    /// True when both are pieces of opposite sides.
    #[must_use]
    pub fn is_enemy_of(self, other: PieceKind) -> bool {
        match (self.side(), other.side()) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    /// True when both are pieces of the same side.
    #[must_use]
    pub fn is_ally_of(self, other: PieceKind) -> bool {
        match (self.side(), other.side()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Character used in the text board dump.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Empty => '-',
            PieceKind::White => 'W',
            PieceKind::Black => 'B',
            PieceKind::King => 'K',
        }
    }
}

/// A piece on a specific cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub position: Position,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, position: Position) -> Self {
        Self { kind, position }
    }
}

/// A piece removed by a move. Identified by where it stood.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Capture {
    pub piece: Piece,
}

impl Capture {
    #[must_use]
    pub const fn new(piece: Piece) -> Self {
        Self { piece }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.piece.position
    }
}

impl PartialEq for Capture {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl Eq for Capture {}

impl Hash for Capture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position().hash(state);
    }
}

/// Captures triggered by one move. At most three: every flank except the one
/// the mover arrived from.
pub type Captures = SmallVec<[Capture; 3]>;

/// A move of one piece along a row or column.
///
/// Identity is (piece, destination). Captures are derived from the board and
/// `score` is whatever the caller assigned for ordering, so neither takes part
/// in equality or hashing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Action {
    /// The moving piece at its origin.
    pub piece: Piece,
    pub to: Position,
    pub captures: Captures,
    pub score: f64,
}

impl Action {
    #[must_use]
    pub fn new(piece: Piece, to: Position, captures: Captures) -> Self {
        Self {
            piece,
            to,
            captures,
            score: 0.0,
        }
    }

    #[must_use]
    pub const fn from(&self) -> Position {
        self.piece.position
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    /// Owning side of the mover.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.piece.kind.side()
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    #[must_use]
    pub fn captures_king(&self) -> bool {
        self.captures.iter().any(|c| c.piece.kind == PieceKind::King)
    }

    /// True when the move removes the piece standing on `pos`.
    #[must_use]
    pub fn captures_at(&self, pos: Position) -> bool {
        self.captures.iter().any(|c| c.position() == pos)
    }

    #[must_use]
    pub fn is_king_move(&self) -> bool {
        self.piece.kind == PieceKind::King
    }

    /// Direction of travel.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        Direction::between(self.from(), self.to)
    }

    /// Deterministic rank used to break ties between equally forced moves.
    /// Lower ranks first.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.to.index() * 100 + self.from().index()
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Total order on `score`.
    #[must_use]
    pub fn cmp_by_score(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.piece == other.piece && self.to == other.to
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.piece.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.piece.kind.symbol(), self.from(), self.to)?;
        for capture in &self.captures {
            write!(f, " x{}", capture.position())?;
        }
        Ok(())
    }
}
