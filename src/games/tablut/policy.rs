//! Heuristic move policy.
//!
//! ## Overview
//!
//! The policy turns the legal moves of a position into either
//! - a best-first list, used to seed MCTS expansion, or
//! - a weighted candidate set, sampled move by move during rollouts.
//!
//! Both start from the same forced tactics, checked in order:
//! 1. the opening book on each side's first move,
//! 2. an immediate win (lowest [`Action::rank`] if several),
//! 3. every move that prevents an immediate loss.
//!
//! Without forced tactics each move is scored with [`Weights`]. Moves that
//! hang the moved piece or the King are dropped; if nothing survives, every
//! legal move gets weight one.

use tracing::trace;

use crate::core::GameRng;

use super::geometry::{cell_kind, CellKind, Direction, Position, BOARD_SIZE, CENTER};
use super::grid::Grid;
use super::opening::{OpeningBook, Route};
use super::piece::{Action, PieceKind, Side};
use super::state::GameState;
use super::tactics::{escape_open, is_capturable};
use super::weights::Weights;

/// Weight of a King move that leaves the Citadel without cover.
const UNCOVERED_KING_WEIGHT: f64 = 35.0;

/// White pieces needed on one side of the board before the King leaves the
/// Citadel toward it.
const KING_COVER: usize = 3;

/// Ring of squares Black aims for while the King sits on the Citadel.
const BLACK_RING: [(u8, u8); 12] = [
    (2, 2),
    (2, 3),
    (2, 5),
    (2, 6),
    (3, 2),
    (3, 6),
    (5, 2),
    (5, 6),
    (6, 2),
    (6, 3),
    (6, 5),
    (6, 6),
];

/// Squares White develops to while the King sits on the Citadel:
/// `#` inner posts, `o` outposts that need a post on the same line.
const WHITE_FORMATION: [&str; BOARD_SIZE] = [
    ".........",
    "..o...o..",
    ".o##.##o.",
    "..##.##..",
    ".........",
    "..##.##..",
    ".o##.##o.",
    "..o...o..",
    ".........",
];

/// Heuristic policy parameterized by a weight vector.
#[derive(Clone, Debug, Default)]
pub struct TablutPolicy {
    weights: Weights,
    book: OpeningBook,
}

impl TablutPolicy {
    #[must_use]
    pub fn new(weights: Weights) -> Self {
        Self {
            weights,
            book: OpeningBook::standard(),
        }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Candidate moves for one rollout step, each carrying its sampling
    /// weight in `score`. Empty only when the game is over.
    #[must_use]
    pub fn simulation_actions(&self, state: &GameState) -> Vec<Action> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return actions;
        }
        if let Some(forced) = self.forced_actions(state, &actions) {
            return forced;
        }
        let weighted = self.weigh(state, &actions);
        if weighted.is_empty() {
            uniform(actions)
        } else {
            weighted
        }
    }

    /// Moves to expand, best first. King moves and captures lead; the rest
    /// follow by descending weight. Forced tactics replace the whole list.
    #[must_use]
    pub fn best_actions_first(&self, state: &GameState) -> Vec<Action> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return actions;
        }
        if let Some(forced) = self.forced_actions(state, &actions) {
            return forced;
        }

        let weighted = self.weigh(state, &actions);
        let score_of = |action: &Action| weighted.iter().find(|w| *w == action).map_or(0.0, |w| w.score);

        let (mut ordered, rest): (Vec<Action>, Vec<Action>) = actions
            .into_iter()
            .map(|a| {
                let score = score_of(&a);
                a.with_score(score)
            })
            .partition(|a| a.is_king_move() || a.is_capture());
        let mut rest: Vec<Action> = rest.into_iter().filter(|a| weighted.contains(a)).collect();

        ordered.sort_by(|a, b| b.cmp_by_score(a));
        rest.sort_by(|a, b| b.cmp_by_score(a));
        ordered.append(&mut rest);

        if ordered.is_empty() {
            state.legal_actions()
        } else {
            ordered
        }
    }

    /// Pick one rollout move by weighted sampling.
    pub fn sample(&self, state: &GameState, rng: &mut GameRng) -> Option<Action> {
        let mut candidates = self.simulation_actions(state);
        let weights: Vec<f64> = candidates.iter().map(|a| a.score).collect();
        let index = rng.choose_weighted(&weights)?;
        Some(candidates.swap_remove(index))
    }

    /// Opening book, immediate wins and loss prevention, in that order.
    #[must_use]
    pub fn forced_actions(&self, state: &GameState, actions: &[Action]) -> Option<Vec<Action>> {
        if let Some(opening) = self.opening_action(state, actions) {
            trace!(action = %opening, "opening book");
            return Some(vec![opening.with_score(1.0)]);
        }

        if let Some(win) = actions.iter().filter(|a| is_win(state, a)).min_by_key(|a| a.rank()) {
            trace!(action = %win, "winning move");
            return Some(vec![win.clone().with_score(1.0)]);
        }

        let defenses = self.defenses(state, actions);
        if defenses.is_empty() {
            None
        } else {
            trace!(count = defenses.len(), "forced defense");
            Some(uniform(defenses))
        }
    }

    fn opening_action(&self, state: &GameState, actions: &[Action]) -> Option<Action> {
        if !state.is_first_move() {
            return None;
        }
        let route = match state.turn() {
            Side::White => self.book.white_opening(),
            Side::Black => {
                let first = state.first_action()?;
                self.book.black_reply((first.from(), first.to))?
            }
        };
        find_route(actions, route)
    }

    fn defenses(&self, state: &GameState, actions: &[Action]) -> Vec<Action> {
        let Some(king) = state.king() else {
            return Vec::new();
        };
        match state.turn() {
            Side::Black => {
                let escape = state
                    .actions_from(king)
                    .filter(|a| cell_kind(a.to) == CellKind::Escape)
                    .min_by_key(|a| a.rank());
                if let Some(escape) = escape {
                    return actions
                        .iter()
                        .filter(|a| blocks_route(king, escape.to, a.to))
                        .cloned()
                        .collect();
                }
                match king_fork_line(state, king) {
                    Some(line) => actions.iter().filter(|a| line.contains(&a.to)).cloned().collect(),
                    None => Vec::new(),
                }
            }
            Side::White => {
                if !is_capturable(state.grid(), king) {
                    return Vec::new();
                }
                let mut look = Lookahead::new(state);
                actions.iter().filter(|a| !look.king_exposed(a)).cloned().collect()
            }
        }
    }

    fn weigh(&self, state: &GameState, actions: &[Action]) -> Vec<Action> {
        let w = &self.weights;
        let grid = state.grid();
        let king = state.king();
        let early = king == Some(Position::CITADEL);
        let region = king.filter(|_| !early).and_then(KingRegion::around);
        let previous = state.last_action().map(|a| a.to);
        let mut look = Lookahead::new(state);
        let mut breakout = Vec::new();
        let mut scored = Vec::with_capacity(actions.len());

        for action in actions {
            let safe_capture = action.is_capture()
                && match action.side() {
                    Some(Side::Black) => !look.opens_escape(action),
                    _ => !look.king_exposed(action),
                };

            let score = if safe_capture {
                if !action.is_king_move() && previous.is_some_and(|p| action.captures_at(p)) {
                    trace!(action = %action, "recapture");
                    return vec![action.clone().with_score(w.capture)];
                }
                Some(w.capture)
            } else {
                match action.kind() {
                    PieceKind::King => {
                        if look.king_exposed(action) {
                            None
                        } else if early {
                            if king_covered(grid, action.to) {
                                breakout.push(action.clone().with_score(w.capture));
                                None
                            } else {
                                Some(UNCOVERED_KING_WEIGHT)
                            }
                        } else if look.opens_escape(action) {
                            Some(w.king_check)
                        } else {
                            Some(w.standard)
                        }
                    }
                    PieceKind::Black => {
                        if look.piece_exposed(action) || look.opens_escape(action) {
                            None
                        } else if early {
                            is_black_ring(action.to).then_some(w.standard)
                        } else if king.is_some_and(|k| threatens_king(grid, k, action.to)) {
                            Some(w.black_attack)
                        } else {
                            Some(w.standard)
                        }
                    }
                    PieceKind::White => {
                        if look.piece_exposed(action) || look.king_exposed(action) {
                            None
                        } else if early {
                            (!action.to.is_on_center_axis() && valid_formation(grid, action)).then_some(w.standard)
                        } else if region.is_some_and(|r| r.contains(action.to))
                            && king.is_some_and(|k| heads_for_border(action, k))
                        {
                            Some(w.white_border)
                        } else {
                            Some(w.standard)
                        }
                    }
                    PieceKind::Empty => None,
                }
            };

            if let Some(score) = score {
                scored.push(action.clone().with_score(score));
            }
        }

        // A covered King leaves the Citadel before anything else happens.
        if breakout.is_empty() {
            scored
        } else {
            breakout
        }
    }
}

fn uniform(actions: Vec<Action>) -> Vec<Action> {
    actions.into_iter().map(|a| a.with_score(1.0)).collect()
}

fn find_route(actions: &[Action], (from, to): Route) -> Option<Action> {
    actions.iter().find(|a| a.from() == from && a.to == to).cloned()
}

/// Wins on the spot: takes the King, walks the King out, or takes the last
/// enemy piece.
fn is_win(state: &GameState, action: &Action) -> bool {
    if action.captures_king() {
        return true;
    }
    if action.is_king_move() && cell_kind(action.to) == CellKind::Escape {
        return true;
    }
    let enemies = match action.side() {
        Some(Side::White) => state.black_count(),
        Some(Side::Black) => state.white_count(),
        None => return false,
    };
    action.is_capture() && usize::from(enemies) <= action.captures.len()
}

/// Does a piece landing on `square` stand between the King and `escape`?
fn blocks_route(king: Position, escape: Position, square: Position) -> bool {
    Direction::between(king, escape).is_some_and(|dir| {
        Direction::between(king, square) == Some(dir) && king.distance(square) <= king.distance(escape)
    })
}

/// If the King can step to a square with two open escape lines, the line
/// through that square along those escapes.
fn king_fork_line(state: &GameState, king: Position) -> Option<Vec<Position>> {
    let grid = state.grid();
    let (_, square, axis) = state
        .actions_from(king)
        .filter_map(|a| {
            let dir = a.direction()?;
            let open = dir.perpendicular().into_iter().all(|d| escape_open(grid, a.to, d));
            open.then_some((a.rank(), a.to, dir.perpendicular()[0]))
        })
        .min_by_key(|(rank, _, _)| *rank)?;
    let line = (0..BOARD_SIZE as u8)
        .map(|i| {
            if axis.is_vertical() {
                Position::new(i, square.col)
            } else {
                Position::new(square.row, i)
            }
        })
        .collect();
    Some(line)
}

/// With the King on the Citadel, is the side of the board `dest` leads to
/// guarded by enough White pieces? Pieces on the cross axis do not count.
fn king_covered(grid: &Grid, dest: Position) -> bool {
    let Some(region) = KingRegion::around(dest) else {
        return false;
    };
    let along_row = dest.row == CENTER;
    grid.pieces()
        .filter(|p| p.kind == PieceKind::White)
        .filter(|p| if along_row { p.position.col != CENTER } else { p.position.row != CENTER })
        .filter(|p| region.contains(p.position))
        .count()
        >= KING_COVER
}

/// Black landing next to the King or on its row or column.
fn threatens_king(grid: &Grid, king: Position, dest: Position) -> bool {
    dest.neighbours().any(|n| grid.get(n) == PieceKind::King) || dest.row == king.row || dest.col == king.col
}

/// White leaving the King's row or column for the board edge.
fn heads_for_border(action: &Action, king: Position) -> bool {
    let from = action.from();
    (from.row == king.row || from.col == king.col) && action.to.is_on_edge()
}

fn is_black_ring(pos: Position) -> bool {
    BLACK_RING.contains(&(pos.row, pos.col))
}

fn formation(pos: Position) -> u8 {
    WHITE_FORMATION[pos.row as usize].as_bytes()[pos.col as usize]
}

/// A White developing move must land on a formation square and leave at
/// most one White post on each half of the row or column it lands on, with
/// none on the same half as the destination.
fn valid_formation(grid: &Grid, action: &Action) -> bool {
    let to = action.to;
    if formation(to) == b'.' {
        return false;
    }
    let line_ok = |along_row: bool| {
        let cell = |i: u8| if along_row { Position::new(to.row, i) } else { Position::new(i, to.col) };
        let coord = if along_row { to.col } else { to.row };
        if formation(to) == b'o' && formation(cell(2)) == b'.' {
            return false;
        }
        let mut found = 0;
        let mut i = 0;
        while i < BOARD_SIZE as u8 {
            let pos = cell(i);
            if i != CENTER
                && pos != action.from()
                && formation(pos) != b'.'
                && grid.get(pos).side() == Some(Side::White)
            {
                if (i < CENTER && coord < CENTER) || (i > CENTER && coord > CENTER) {
                    return false;
                }
                found += 1;
                if i < CENTER {
                    i = CENTER;
                } else if found > 1 {
                    return false;
                }
            }
            i += 1;
        }
        true
    };
    line_ok(true) || line_ok(false)
}

/// Half or quarter of the board around the King, relative to the Citadel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KingRegion {
    Half(Direction),
    Quarter(Direction, Direction),
}

impl KingRegion {
    fn around(pos: Position) -> Option<Self> {
        let vertical = match pos.row.cmp(&CENTER) {
            std::cmp::Ordering::Less => Some(Direction::Up),
            std::cmp::Ordering::Greater => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        };
        let horizontal = match pos.col.cmp(&CENTER) {
            std::cmp::Ordering::Less => Some(Direction::Left),
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Equal => None,
        };
        match (vertical, horizontal) {
            (Some(v), Some(h)) => Some(KingRegion::Quarter(v, h)),
            (Some(d), None) | (None, Some(d)) => Some(KingRegion::Half(d)),
            (None, None) => None,
        }
    }

    fn contains(self, pos: Position) -> bool {
        let in_half = |dir: Direction| match dir {
            Direction::Up => pos.row <= CENTER,
            Direction::Down => pos.row >= CENTER,
            Direction::Left => pos.col <= CENTER,
            Direction::Right => pos.col >= CENTER,
        };
        match self {
            KingRegion::Half(d) => in_half(d),
            KingRegion::Quarter(v, h) => in_half(v) && in_half(h),
        }
    }
}

/// Scratch copy of the grid for one-ply peeks.
struct Lookahead {
    grid: Grid,
    king: Option<Position>,
}

impl Lookahead {
    fn new(state: &GameState) -> Self {
        Self {
            grid: *state.grid(),
            king: state.king(),
        }
    }

    /// After `action`, could the enemy take the piece that moved?
    fn piece_exposed(&mut self, action: &Action) -> bool {
        let peek = self.grid.temporary(action, self.king);
        is_capturable(peek.grid(), action.to)
    }

    /// After `action`, could Black take the King?
    fn king_exposed(&mut self, action: &Action) -> bool {
        let peek = self.grid.temporary(action, self.king);
        peek.king().is_some_and(|k| is_capturable(peek.grid(), k))
    }

    /// After `action`, does the King see an escape across the line of travel?
    fn opens_escape(&mut self, action: &Action) -> bool {
        let Some(dir) = action.direction() else {
            return false;
        };
        let peek = self.grid.temporary(action, self.king);
        peek.king()
            .is_some_and(|k| dir.perpendicular().into_iter().any(|d| escape_open(peek.grid(), k, d)))
    }
}
