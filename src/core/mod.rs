//! Game-agnostic building blocks: seeded randomness and the crate error type.

pub mod error;
pub mod rng;

pub use error::{Error, Result};
pub use rng::GameRng;
