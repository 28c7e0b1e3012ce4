//! One-ply threat detection on a bare grid.
//!
//! These functions never consult the move index, so they are safe to call
//! inside a [`TemporaryMove`](super::grid::TemporaryMove) peek.

use super::geometry::{cell_kind, CellKind, Direction, Position};
use super::grid::Grid;
use super::piece::{PieceKind, Side};

/// Is there an open line from `from` to an empty escape cell in `dir`?
#[must_use]
pub fn escape_open(grid: &Grid, from: Position, dir: Direction) -> bool {
    let mut pos = from;
    while let Some(next) = pos.step(dir) {
        if !grid.is_empty(next) {
            return false;
        }
        match cell_kind(next) {
            CellKind::Escape => return true,
            CellKind::Camp | CellKind::Citadel => return false,
            CellKind::Normal => pos = next,
        }
    }
    false
}

/// Can some piece of `side` slide onto `landing` next move?
#[must_use]
pub fn reachable_by(grid: &Grid, landing: Position, side: Side) -> bool {
    Direction::ALL.into_iter().any(|dir| {
        grid.first_occupied(landing, dir).is_some_and(|piece| {
            grid.get(piece).side() == Some(side) && grid.slide(piece, dir.opposite()).any(|cell| cell == landing)
        })
    })
}

/// Could the piece on `target` be captured by its enemy's very next move?
#[must_use]
pub fn is_capturable(grid: &Grid, target: Position) -> bool {
    let victim = grid.get(target);
    let Some(attacker) = victim.side().map(Side::opponent) else {
        return false;
    };
    let attacker_kind = match attacker {
        Side::White => PieceKind::White,
        Side::Black => PieceKind::Black,
    };
    Direction::ALL.into_iter().any(|dir| {
        let (Some(landing), Some(beyond)) = (target.step(dir), target.step(dir.opposite())) else {
            return false;
        };
        grid.is_empty(landing)
            && grid.is_blocker(beyond, attacker_kind)
            && (victim != PieceKind::King || grid.king_trapped(target, landing))
            && reachable_by(grid, landing, attacker)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_escape_open() {
        let mut grid = Grid::empty();
        grid.set(p(2, 6), PieceKind::King);
        assert!(escape_open(&grid, p(2, 6), Direction::Right));
        assert!(escape_open(&grid, p(2, 6), Direction::Up));
        assert!(escape_open(&grid, p(2, 6), Direction::Left));
        assert!(escape_open(&grid, p(2, 6), Direction::Down));
    }

    #[test]
    fn test_escape_blocked_by_piece_and_camp() {
        let mut grid = Grid::empty();
        grid.set(p(2, 2), PieceKind::King);
        grid.set(p(2, 1), PieceKind::Black);
        assert!(!escape_open(&grid, p(2, 2), Direction::Left));
        assert!(escape_open(&grid, p(2, 2), Direction::Up));

        let mut grid = Grid::empty();
        grid.set(p(3, 3), PieceKind::King);
        assert!(!escape_open(&grid, p(3, 3), Direction::Up), "(0,3) is a camp");
    }

    #[test]
    fn test_reachable_by_needs_clear_line() {
        let mut grid = Grid::empty();
        grid.set(p(3, 4), PieceKind::White);
        assert!(!reachable_by(&grid, p(3, 2), Side::Black));
        grid.set(p(6, 2), PieceKind::Black);
        assert!(reachable_by(&grid, p(3, 2), Side::Black));
        grid.set(p(5, 2), PieceKind::White);
        assert!(!reachable_by(&grid, p(3, 2), Side::Black));
    }

    #[test]
    fn test_is_capturable() {
        let mut grid = Grid::empty();
        grid.set(p(2, 2), PieceKind::White);
        grid.set(p(2, 1), PieceKind::Black);
        assert!(!is_capturable(&grid, p(2, 2)));
        grid.set(p(6, 3), PieceKind::Black);
        assert!(is_capturable(&grid, p(2, 2)), "(6,3) can slide to (2,3)");
    }

    #[test]
    fn test_king_near_citadel_needs_encirclement() {
        let mut grid = Grid::empty();
        grid.set(p(3, 4), PieceKind::King);
        grid.set(p(3, 3), PieceKind::Black);
        grid.set(p(2, 6), PieceKind::Black);
        // (2,6) can land on (2,4), the Citadel flanks from below, but (3,5) is open.
        assert!(!is_capturable(&grid, p(3, 4)));
        grid.set(p(3, 5), PieceKind::Black);
        assert!(is_capturable(&grid, p(3, 4)));
    }
}
