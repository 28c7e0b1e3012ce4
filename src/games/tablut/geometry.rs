//! Board geometry: positions, directions and the static terrain map.
//!
//! The 9x9 board is indexed row-major from the top-left corner. Terrain never
//! changes during a game, so it is a `const` table built at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Side length of the board.
pub const BOARD_SIZE: usize = 9;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Row and column of the Citadel.
pub const CENTER: u8 = 4;

/// A board cell. Invariant: `row < 9 && col < 9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// The Citadel.
    pub const CITADEL: Position = Position::new(CENTER, CENTER);

    /// Create a position. Panics in const context if out of range.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!((row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE);
        Self { row, col }
    }

    /// Create a position from signed coordinates, `None` when off the board.
    #[must_use]
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Row-major cell index in `0..81`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::new((index / BOARD_SIZE) as u8, (index % BOARD_SIZE) as u8)
    }

    /// Every cell, row-major.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Position::from_index)
    }

    /// The neighbouring cell in `dir`, if on the board.
    #[must_use]
    pub fn step(self, dir: Direction) -> Option<Self> {
        self.offset(dir, 1)
    }

    /// The cell `distance` steps away in `dir`, if on the board.
    #[must_use]
    pub fn offset(self, dir: Direction, distance: i32) -> Option<Self> {
        let (dr, dc) = dir.delta();
        Self::checked(
            i32::from(self.row) + dr * distance,
            i32::from(self.col) + dc * distance,
        )
    }

    /// Orthogonal neighbours that exist on the board.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        Direction::ALL.into_iter().filter_map(move |dir| self.step(dir))
    }

    /// Manhattan distance.
    #[must_use]
    pub fn distance(self, other: Position) -> u8 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True on the outermost ring.
    #[must_use]
    pub fn is_on_edge(self) -> bool {
        let last = (BOARD_SIZE - 1) as u8;
        self.row == 0 || self.col == 0 || self.row == last || self.col == last
    }

    /// True inside the 3x3 block centered on the Citadel.
    #[must_use]
    pub fn is_near_citadel(self) -> bool {
        (CENTER - 1..=CENTER + 1).contains(&self.row) && (CENTER - 1..=CENTER + 1).contains(&self.col)
    }

    /// True on the central row or column.
    #[must_use]
    pub fn is_on_center_axis(self) -> bool {
        self.row == CENTER || self.col == CENTER
    }

    /// Server notation: file letter `A`..`I` for the column, then 1-based rank.
    #[must_use]
    pub fn to_square(self) -> String {
        format!("{}{}", char::from(b'A' + self.col), self.row + 1)
    }

    /// Parse server notation such as `"E3"`: one file letter, one rank digit.
    /// Lowercase files are accepted.
    pub fn from_square(square: &str) -> Result<Self> {
        let &[file, rank] = square.as_bytes() else {
            return Err(Error::InvalidSquare(square.to_string()));
        };
        let file = file.to_ascii_uppercase();
        if !(b'A'..=b'I').contains(&file) || !(b'1'..=b'9').contains(&rank) {
            return Err(Error::InvalidSquare(square.to_string()));
        }
        Ok(Self::new(rank - b'1', file - b'A'))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_square())
    }
}

/// One of the four sliding directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// (row, col) step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Stable index in `0..4`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// The two directions on the other axis.
    #[must_use]
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Direction of travel from `from` to `to` when they share a row or column.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Option<Self> {
        use std::cmp::Ordering::*;
        match (to.row.cmp(&from.row), to.col.cmp(&from.col)) {
            (Less, Equal) => Some(Direction::Up),
            (Greater, Equal) => Some(Direction::Down),
            (Equal, Greater) => Some(Direction::Right),
            (Equal, Less) => Some(Direction::Left),
            _ => None,
        }
    }

    /// True for up and down.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// Static terrain of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Normal,
    Escape,
    Camp,
    Citadel,
}

const TERRAIN: [CellKind; CELL_COUNT] = build_terrain();

const fn build_terrain() -> [CellKind; CELL_COUNT] {
    let mut cells = [CellKind::Normal; CELL_COUNT];
    let last = BOARD_SIZE - 1;
    let mut i = 1;
    while i < last {
        let kind = if i >= 3 && i <= 5 { CellKind::Camp } else { CellKind::Escape };
        cells[i] = kind; // top
        cells[last * BOARD_SIZE + i] = kind; // bottom
        cells[i * BOARD_SIZE] = kind; // left
        cells[i * BOARD_SIZE + last] = kind; // right
        i += 1;
    }
    let c = CENTER as usize;
    cells[BOARD_SIZE + c] = CellKind::Camp;
    cells[(last - 1) * BOARD_SIZE + c] = CellKind::Camp;
    cells[c * BOARD_SIZE + 1] = CellKind::Camp;
    cells[c * BOARD_SIZE + last - 1] = CellKind::Camp;
    cells[c * BOARD_SIZE + c] = CellKind::Citadel;
    cells
}

/// Terrain at `pos`.
#[must_use]
pub fn cell_kind(pos: Position) -> CellKind {
    TERRAIN[pos.index()]
}

/// The middle cell of each camp's outer edge: camp terrain that never acts
/// as a capture blocker.
#[must_use]
pub fn is_edge_camp(pos: Position) -> bool {
    let last = (BOARD_SIZE - 1) as u8;
    (pos.col == CENTER && (pos.row == 0 || pos.row == last))
        || (pos.row == CENTER && (pos.col == 0 || pos.col == last))
}

/// True where terrain alone flanks a capture: the Citadel and inner camp cells.
#[must_use]
pub fn is_terrain_blocker(pos: Position) -> bool {
    match cell_kind(pos) {
        CellKind::Citadel => true,
        CellKind::Camp => !is_edge_camp(pos),
        CellKind::Normal | CellKind::Escape => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(kind: CellKind) -> usize {
        Position::all().filter(|p| cell_kind(*p) == kind).count()
    }

    #[test]
    fn test_terrain_counts() {
        assert_eq!(count(CellKind::Escape), 16);
        assert_eq!(count(CellKind::Camp), 16);
        assert_eq!(count(CellKind::Citadel), 1);
        assert_eq!(cell_kind(Position::CITADEL), CellKind::Citadel);
    }

    #[test]
    fn test_corners_are_normal() {
        for (r, c) in [(0, 0), (0, 8), (8, 0), (8, 8)] {
            assert_eq!(cell_kind(Position::new(r, c)), CellKind::Normal);
        }
    }

    #[test]
    fn test_camp_clusters() {
        for (r, c) in [(0, 3), (0, 4), (0, 5), (1, 4), (4, 1), (7, 4), (4, 7), (8, 5)] {
            assert_eq!(cell_kind(Position::new(r, c)), CellKind::Camp, "({r},{c})");
        }
        assert_eq!(cell_kind(Position::new(0, 2)), CellKind::Escape);
        assert_eq!(cell_kind(Position::new(6, 8)), CellKind::Escape);
    }

    #[test]
    fn test_edge_camps_do_not_block() {
        for (r, c) in [(0, 4), (4, 0), (8, 4), (4, 8)] {
            let pos = Position::new(r, c);
            assert!(is_edge_camp(pos));
            assert!(!is_terrain_blocker(pos));
        }
        assert!(is_terrain_blocker(Position::new(0, 3)));
        assert!(is_terrain_blocker(Position::new(1, 4)));
        assert!(is_terrain_blocker(Position::CITADEL));
        assert!(!is_terrain_blocker(Position::new(2, 2)));
    }

    #[test]
    fn test_square_notation() {
        assert_eq!(Position::new(2, 4).to_square(), "E3");
        assert_eq!(Position::new(0, 0).to_square(), "A1");
        assert_eq!(Position::from_square("E3").unwrap(), Position::new(2, 4));
        assert_eq!(Position::from_square("i9").unwrap(), Position::new(8, 8));
        for bad in ["", "E", "J1", "A0", "A10", "E-1", "3E", "E+3", "E03", " E3", "E3 "] {
            assert!(Position::from_square(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_direction_helpers() {
        let a = Position::new(4, 2);
        assert_eq!(Direction::between(a, Position::new(4, 7)), Some(Direction::Right));
        assert_eq!(Direction::between(a, Position::new(1, 2)), Some(Direction::Up));
        assert_eq!(Direction::between(a, Position::new(3, 3)), None);
        assert_eq!(a.offset(Direction::Left, 3), None);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.perpendicular(), [Direction::Up, Direction::Down]);
    }
}
