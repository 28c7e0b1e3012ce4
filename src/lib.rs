//! # tablut-mcts
//!
//! A Tablut player: a rules engine with an incrementally maintained move
//! index, a weighted playout heuristic, and a generic MCTS planner.
//!
//! ## Design Principles
//!
//! 1. **Incremental Move Index**: applying a move patches only the move lists
//!    whose line of sight changed instead of regenerating every move.
//!
//! 2. **Game-Agnostic Search**: MCTS only sees the five-operation
//!    [`Game`](rules::Game) contract, so it can be tested on toy games.
//!
//! 3. **Cheap Branching**: states share their index lists and history by
//!    reference count and copy them only on write.
//!
//! ## Modules
//!
//! - `core`: RNG and the crate error type
//! - `rules`: The `Game` contract consumed by the search
//! - `mcts`: Monte Carlo Tree Search
//! - `games`: Tablut rules, heuristic policy and server messages

pub mod core;
pub mod rules;
pub mod mcts;
pub mod games;

// Re-export commonly used types
pub use crate::core::{Error, GameRng, Result};

pub use crate::rules::Game;

pub use crate::mcts::{
    MCTSConfig, MCTSSearch, MCTSTree, MCTSNode, NodeId,
    SearchStats, TreeStats, UCB1,
};

pub use crate::games::tablut::{
    Action, GameState, Outcome, Position, ServerAction, ServerState, Side, Status,
    TablutGame, TablutPolicy, Weights,
};
