//! Game contract for the search engine.
//!
//! Games implement `Game` to define:
//! - Legal actions for each state
//! - Successor states
//! - Playouts and their utility
//!
//! The search calls into `Game` but never interprets game-specific
//! concepts directly.

pub mod engine;

pub use engine::Game;
