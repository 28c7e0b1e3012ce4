//! Incrementally maintained move and capture index.
//!
//! ## Overview
//!
//! For every occupied cell the index stores four lists of legal actions, one
//! per direction, each action carrying the captures it would make. After a
//! move only the lists whose inputs changed are recomputed.
//!
//! A list for the piece at `P` looking in `dir` depends on:
//! - the empty run of cells from `P` in `dir` (where the piece can stop), and
//! - for each such destination `X`, the cells within two steps of `X`
//!   (flanked victims, the cells beyond them, the King's neighbours).
//!
//! A move changes a set of cells `S`: the origin, the destination and every
//! captured square. [`MoveIndex::update`] therefore:
//! 1. drops the lists of the origin and of captured squares, which are empty now;
//! 2. recomputes all four lists of the destination;
//! 3. for every cell `X` within two steps of a changed cell that is empty (or is
//!    the changed cell itself), finds the first piece in each direction from
//!    `X` and recomputes that piece's list looking back toward `X`.
//!
//! Step 3 covers lines of sight that opened at the origin and captured
//! squares, sight newly blocked at the destination, and captures that appear
//! or vanish beside any changed cell. Every list touched is a pure function of
//! the grid, so the result is identical to [`MoveIndex::build`].
//!
//! Lists are `Arc<[Action]>`, so cloning the index shares every list and a
//! mutation only reallocates the outer vector plus the lists it rewrites.

use std::sync::Arc;

use super::geometry::{Direction, Position, CELL_COUNT};
use super::grid::Grid;
use super::piece::{Action, Side};

/// Cells within Manhattan distance two, the changed cell included.
const NEIGHBOURHOOD: [(i32, i32); 13] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

const LIST_COUNT: usize = CELL_COUNT * 4;

fn slot(pos: Position, dir: Direction) -> usize {
    pos.index() * 4 + dir.index()
}

/// Per-cell, per-direction legal actions.
#[derive(Clone, Debug)]
pub struct MoveIndex {
    lists: Vec<Arc<[Action]>>,
}

impl MoveIndex {
    /// Full scan of `grid`.
    #[must_use]
    pub fn build(grid: &Grid) -> Self {
        let empty: Arc<[Action]> = Arc::from(Vec::new());
        let mut index = Self {
            lists: vec![empty; LIST_COUNT],
        };
        for piece in grid.pieces() {
            for dir in Direction::ALL {
                index.recompute(grid, piece.position, dir);
            }
        }
        index
    }

    /// Actions of the piece at `pos` moving in `dir`.
    #[must_use]
    pub fn actions(&self, pos: Position, dir: Direction) -> &[Action] {
        &self.lists[slot(pos, dir)]
    }

    /// All actions of the piece at `pos`.
    pub fn actions_from(&self, pos: Position) -> impl Iterator<Item = &Action> + '_ {
        Direction::ALL.into_iter().flat_map(move |dir| self.actions(pos, dir).iter())
    }

    /// All actions for `side` on `grid`.
    #[must_use]
    pub fn legal_actions(&self, grid: &Grid, side: Side) -> Vec<Action> {
        grid.pieces_of(side)
            .flat_map(|piece| self.actions_from(piece.position))
            .cloned()
            .collect()
    }

    /// True if `side` has at least one move.
    #[must_use]
    pub fn has_actions(&self, grid: &Grid, side: Side) -> bool {
        grid.pieces_of(side)
            .any(|piece| Direction::ALL.iter().any(|dir| !self.actions(piece.position, *dir).is_empty()))
    }

    /// Patch the index after `action` was applied to produce `grid`.
    pub fn update(&mut self, grid: &Grid, action: &Action) {
        self.clear(action.from());
        for capture in &action.captures {
            self.clear(capture.position());
        }

        let mut dirty = DirtyLists::default();
        for dir in Direction::ALL {
            dirty.mark(action.to, dir);
        }

        let changed = [action.from(), action.to]
            .into_iter()
            .chain(action.captures.iter().map(|c| c.position()));
        for cell in changed {
            for (dr, dc) in NEIGHBOURHOOD {
                let Some(x) = Position::checked(i32::from(cell.row) + dr, i32::from(cell.col) + dc) else {
                    continue;
                };
                if x != cell && !grid.is_empty(x) {
                    continue;
                }
                for dir in Direction::ALL {
                    if let Some(piece) = grid.first_occupied(x, dir) {
                        dirty.mark(piece, dir.opposite());
                    }
                }
            }
        }

        for (pos, dir) in dirty.drain() {
            self.recompute(grid, pos, dir);
        }
    }

    /// First list that differs from `other`, comparing actions and their
    /// captures without regard to order.
    #[must_use]
    pub fn first_difference(&self, other: &MoveIndex) -> Option<(Position, Direction)> {
        for pos in Position::all() {
            for dir in Direction::ALL {
                if !same_actions(self.actions(pos, dir), other.actions(pos, dir)) {
                    return Some((pos, dir));
                }
            }
        }
        None
    }

    fn clear(&mut self, pos: Position) {
        for dir in Direction::ALL {
            let slot = slot(pos, dir);
            if !self.lists[slot].is_empty() {
                self.lists[slot] = Arc::from(Vec::new());
            }
        }
    }

    fn recompute(&mut self, grid: &Grid, pos: Position, dir: Direction) {
        self.lists[slot(pos, dir)] = Arc::from(grid.ray_actions(pos, dir));
    }
}

fn same_actions(a: &[Action], b: &[Action]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| {
            b.iter().any(|y| {
                x == y && x.captures.len() == y.captures.len() && x.captures.iter().all(|c| y.captures.contains(c))
            })
        })
}

/// Deduplicated set of (piece, direction) lists awaiting recomputation.
struct DirtyLists {
    seen: [bool; LIST_COUNT],
    order: Vec<(Position, Direction)>,
}

impl Default for DirtyLists {
    fn default() -> Self {
        Self {
            seen: [false; LIST_COUNT],
            order: Vec::with_capacity(32),
        }
    }
}

impl DirtyLists {
    fn mark(&mut self, pos: Position, dir: Direction) {
        let slot = slot(pos, dir);
        if !self.seen[slot] {
            self.seen[slot] = true;
            self.order.push((pos, dir));
        }
    }

    fn drain(&mut self) -> impl Iterator<Item = (Position, Direction)> + '_ {
        self.order.drain(..)
    }
}
