//! Opening book for the first ply of each side.
//!
//! White always opens with the same move. Black answers White's opening from
//! a small table written for the upper arm of the cross; any other White
//! opening is mapped onto the table by one of the eight symmetries of the
//! board, and the reply is mapped back.

use rustc_hash::FxHashMap;

use super::geometry::{Position, BOARD_SIZE};

/// (origin, destination) of a move, independent of the pieces on the board.
pub type Route = (Position, Position);

/// White's opening: the outer piece of the upper arm steps three cells left.
pub const WHITE_OPENING: Route = (Position::new(2, 4), Position::new(2, 1));

const BLACK_REPLIES: [(Route, Route); 7] = [
    (route(2, 4, 2, 0), route(0, 5, 2, 5)),
    (route(2, 4, 2, 1), route(0, 5, 2, 5)),
    (route(2, 4, 2, 2), route(0, 5, 2, 5)),
    (route(2, 4, 2, 3), route(1, 4, 1, 6)),
    (route(3, 4, 3, 1), route(3, 8, 3, 4)),
    (route(3, 4, 3, 2), route(3, 8, 3, 4)),
    (route(3, 4, 3, 3), route(1, 4, 1, 6)),
];

const fn route(r1: u8, c1: u8, r2: u8, c2: u8) -> Route {
    (Position::new(r1, c1), Position::new(r2, c2))
}

/// The eight rotations and reflections of the square board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symmetry {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    MirrorColumns,
    MirrorRows,
    Transpose,
    AntiTranspose,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rotate90,
        Symmetry::Rotate180,
        Symmetry::Rotate270,
        Symmetry::MirrorColumns,
        Symmetry::MirrorRows,
        Symmetry::Transpose,
        Symmetry::AntiTranspose,
    ];

    #[must_use]
    pub fn apply(self, pos: Position) -> Position {
        let last = (BOARD_SIZE - 1) as u8;
        let (r, c) = (pos.row, pos.col);
        let (row, col) = match self {
            Symmetry::Identity => (r, c),
            Symmetry::Rotate90 => (c, last - r),
            Symmetry::Rotate180 => (last - r, last - c),
            Symmetry::Rotate270 => (last - c, r),
            Symmetry::MirrorColumns => (r, last - c),
            Symmetry::MirrorRows => (last - r, c),
            Symmetry::Transpose => (c, r),
            Symmetry::AntiTranspose => (last - c, last - r),
        };
        Position::new(row, col)
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Symmetry::Rotate90 => Symmetry::Rotate270,
            Symmetry::Rotate270 => Symmetry::Rotate90,
            other => other,
        }
    }

    #[must_use]
    pub fn apply_route(self, (from, to): Route) -> Route {
        (self.apply(from), self.apply(to))
    }
}

/// Reply table keyed by White's opening route.
#[derive(Clone, Debug)]
pub struct OpeningBook {
    replies: FxHashMap<Route, Route>,
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::standard()
    }
}

impl OpeningBook {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            replies: BLACK_REPLIES.into_iter().collect(),
        }
    }

    /// White's fixed first move.
    #[must_use]
    pub fn white_opening(&self) -> Route {
        WHITE_OPENING
    }

    /// Black's answer to White's first move, if the book covers it.
    #[must_use]
    pub fn black_reply(&self, white_first: Route) -> Option<Route> {
        Symmetry::ALL.into_iter().find_map(|sym| {
            self.replies
                .get(&sym.apply_route(white_first))
                .map(|reply| sym.inverse().apply_route(*reply))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetries_are_invertible() {
        for sym in Symmetry::ALL {
            for pos in Position::all() {
                assert_eq!(sym.inverse().apply(sym.apply(pos)), pos, "{sym:?}");
            }
            assert_eq!(sym.apply(Position::CITADEL), Position::CITADEL);
        }
    }

    #[test]
    fn test_direct_reply() {
        let book = OpeningBook::standard();
        assert_eq!(book.black_reply(WHITE_OPENING), Some(route(0, 5, 2, 5)));
        assert_eq!(book.black_reply(route(3, 4, 3, 3)), Some(route(1, 4, 1, 6)));
    }

    #[test]
    fn test_mirrored_reply() {
        let book = OpeningBook::standard();
        // Upper arm moving right mirrors the table across the central column.
        assert_eq!(book.black_reply(route(2, 4, 2, 7)), Some(route(0, 3, 2, 3)));
        // Left arm moving up is the upper arm moving left, transposed.
        assert_eq!(book.black_reply(route(4, 2, 1, 2)), Some(route(5, 0, 5, 2)));
    }

    #[test]
    fn test_unknown_opening() {
        let book = OpeningBook::standard();
        assert_eq!(book.black_reply(route(6, 6, 6, 7)), None);
    }
}
