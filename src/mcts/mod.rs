//! Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! A UCB1 tree search generic over the [`Game`](crate::rules::Game) contract:
//!
//! - **Arena tree**: nodes own their state and link by `NodeId`
//! - **Time-boxed**: runs to a wall-clock deadline, optional iteration cap
//! - **Robust child**: the most visited root child is the answer
//!
//! ## Usage
//!
//! ```rust
//! use tablut_mcts::games::tablut::{GameState, TablutGame};
//! use tablut_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let config = MCTSConfig::default().with_max_iterations(20);
//! let mut search = MCTSSearch::new(TablutGame::default(), config);
//!
//! if let Some(action) = search.search(&GameState::new()) {
//!     println!("Best action: {}", action);
//! }
//! for (action, prob) in search.action_probabilities() {
//!     println!("{}: {:.2}%", action, prob * 100.0);
//! }
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{MCTSNode, NodeId};
pub use policy::UCB1;
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
