//! The piece grid and the per-cell movement and capture rules.
//!
//! Everything here reads only the 81 cells, never the move index, which is
//! what lets heuristics peek ahead on a scratch grid through
//! [`TemporaryMove`].

use std::fmt;
use std::ops::Index;

use super::geometry::{cell_kind, is_terrain_blocker, CellKind, Direction, Position, BOARD_SIZE, CELL_COUNT};
use super::piece::{Action, Capture, Captures, Piece, PieceKind, Side};

const WHITE_START: [(u8, u8); 8] = [(4, 2), (4, 3), (2, 4), (3, 4), (4, 6), (4, 5), (6, 4), (5, 4)];

/// 9x9 piece placement.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [PieceKind; CELL_COUNT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A board with no pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [PieceKind::Empty; CELL_COUNT],
        }
    }

    /// The standard opening position: Black on every camp cell, eight White
    /// pieces in a cross around the King.
    #[must_use]
    pub fn standard() -> Self {
        let mut grid = Self::empty();
        for pos in Position::all() {
            if cell_kind(pos) == CellKind::Camp {
                grid.set(pos, PieceKind::Black);
            }
        }
        for (r, c) in WHITE_START {
            grid.set(Position::new(r, c), PieceKind::White);
        }
        grid.set(Position::CITADEL, PieceKind::King);
        grid
    }

    /// Build from rows of cell symbols (`B`, `W`, `K`, anything else empty).
    /// Extra rows or columns are ignored.
    #[must_use]
    pub fn from_symbols(rows: &[&str]) -> Self {
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate().take(BOARD_SIZE) {
            for (c, ch) in row.chars().filter(|ch| !ch.is_whitespace()).enumerate().take(BOARD_SIZE) {
                let kind = match ch {
                    'B' => PieceKind::Black,
                    'W' => PieceKind::White,
                    'K' => PieceKind::King,
                    _ => PieceKind::Empty,
                };
                grid.set(Position::new(r as u8, c as u8), kind);
            }
        }
        grid
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> PieceKind {
        self.cells[pos.index()]
    }

    pub fn set(&mut self, pos: Position, kind: PieceKind) {
        self.cells[pos.index()] = kind;
    }

    #[must_use]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    /// Occupied cells with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        Position::all()
            .map(|pos| Piece::new(self.get(pos), pos))
            .filter(|piece| !piece.kind.is_empty())
    }

    /// Pieces belonging to `side`, King included for White.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.kind.side() == Some(side))
    }

    #[must_use]
    pub fn count(&self, kind: PieceKind) -> usize {
        self.cells.iter().filter(|k| **k == kind).count()
    }

    /// Location of the King, scanning the board.
    #[must_use]
    pub fn find_king(&self) -> Option<Position> {
        Position::all().find(|pos| self.get(*pos) == PieceKind::King)
    }

    /// First occupied cell strictly beyond `from` in `dir`.
    #[must_use]
    pub fn first_occupied(&self, from: Position, dir: Direction) -> Option<Position> {
        let mut pos = from.step(dir)?;
        loop {
            if !self.is_empty(pos) {
                return Some(pos);
            }
            pos = pos.step(dir)?;
        }
    }

    /// Can `mover`, starting at `origin`, stop on or pass through `cell`?
    ///
    /// Camps are closed except to Black pieces that start inside a camp.
    #[must_use]
    pub fn can_enter(&self, mover: PieceKind, origin: Position, cell: Position) -> bool {
        if !self.is_empty(cell) {
            return false;
        }
        match cell_kind(cell) {
            CellKind::Normal | CellKind::Escape => true,
            CellKind::Camp => mover == PieceKind::Black && cell_kind(origin) == CellKind::Camp,
            CellKind::Citadel => false,
        }
    }

    /// Destinations reachable from `origin` sliding in `dir`, nearest first.
    pub fn slide(&self, origin: Position, dir: Direction) -> impl Iterator<Item = Position> + '_ {
        let mover = self.get(origin);
        std::iter::successors(origin.step(dir), move |pos| pos.step(dir))
            .take_while(move |cell| self.can_enter(mover, origin, *cell))
    }

    /// Does `cell` flank an enemy of `mover`?
    #[must_use]
    pub fn is_blocker(&self, cell: Position, mover: PieceKind) -> bool {
        self.get(cell).is_ally_of(mover) || is_terrain_blocker(cell)
    }

    /// Near the Citadel the King dies only when boxed in on all four sides by
    /// Black pieces or the Citadel itself; `landing` counts as Black.
    /// Elsewhere a plain sandwich is enough.
    #[must_use]
    pub fn king_trapped(&self, king: Position, landing: Position) -> bool {
        if !king.is_near_citadel() {
            return true;
        }
        king.neighbours().all(|n| {
            n == landing || self.get(n) == PieceKind::Black || cell_kind(n) == CellKind::Citadel
        })
    }

    /// Pieces captured if `mover` lands on `dest`.
    ///
    /// The mover's origin is irrelevant: a flanking pair never includes it.
    #[must_use]
    pub fn captures_at(&self, mover: PieceKind, dest: Position) -> Captures {
        let mut captures = Captures::new();
        for dir in Direction::ALL {
            let (Some(victim), Some(beyond)) = (dest.offset(dir, 1), dest.offset(dir, 2)) else {
                continue;
            };
            let kind = self.get(victim);
            if !kind.is_enemy_of(mover) || !self.is_blocker(beyond, mover) {
                continue;
            }
            if kind == PieceKind::King && !self.king_trapped(victim, dest) {
                continue;
            }
            captures.push(Capture::new(Piece::new(kind, victim)));
        }
        captures
    }

    /// Every move of the piece at `origin` in `dir`, captures resolved.
    #[must_use]
    pub fn ray_actions(&self, origin: Position, dir: Direction) -> Vec<Action> {
        let mover = self.get(origin);
        if mover.is_empty() {
            return Vec::new();
        }
        self.slide(origin, dir)
            .map(|to| Action::new(Piece::new(mover, origin), to, self.captures_at(mover, to)))
            .collect()
    }

    /// Apply only the grid effects of `action`. Must be paired with
    /// [`Grid::undo_temporary`]; prefer [`Grid::temporary`].
    pub fn apply_temporary(&mut self, action: &Action) {
        self.set(action.from(), PieceKind::Empty);
        self.set(action.to, action.kind());
        for capture in &action.captures {
            self.set(capture.position(), PieceKind::Empty);
        }
    }

    /// Reverse [`Grid::apply_temporary`].
    pub fn undo_temporary(&mut self, action: &Action) {
        for capture in &action.captures {
            self.set(capture.position(), capture.piece.kind);
        }
        self.set(action.to, PieceKind::Empty);
        self.set(action.from(), action.kind());
    }

    /// Apply `action` until the returned guard is dropped.
    ///
    /// `king` is where the King stands before the move.
    pub fn temporary<'a>(&'a mut self, action: &'a Action, king: Option<Position>) -> TemporaryMove<'a> {
        self.apply_temporary(action);
        let king = if action.captures_king() {
            None
        } else if action.is_king_move() {
            Some(action.to)
        } else {
            king
        };
        TemporaryMove {
            grid: self,
            action,
            king,
        }
    }
}

impl Index<Position> for Grid {
    type Output = PieceKind;

    fn index(&self, pos: Position) -> &PieceKind {
        &self.cells[pos.index()]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                write!(f, "{}", self.get(Position::new(row, col)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid")?;
        fmt::Display::fmt(self, f)
    }
}

/// A one-ply peek. The grid shows the move while the guard lives and is
/// restored exactly when it drops.
pub struct TemporaryMove<'a> {
    grid: &'a mut Grid,
    action: &'a Action,
    king: Option<Position>,
}

impl TemporaryMove<'_> {
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// King location after the move.
    #[must_use]
    pub fn king(&self) -> Option<Position> {
        self.king
    }
}

impl Drop for TemporaryMove<'_> {
    fn drop(&mut self) {
        self.grid.undo_temporary(self.action);
    }
}
