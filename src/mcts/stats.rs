//! Per-search counters, reset at the start of every `search` call.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What one search did with its budget.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Select-expand-simulate passes, counting the root expansion.
    pub iterations: u32,

    /// Leaves that grew children.
    pub nodes_expanded: u32,

    /// Rollouts played to an outcome.
    pub simulations: u32,

    /// Deepest expanded node.
    pub max_depth: u16,

    /// Nodes in the tree when the search stopped.
    pub tree_size: usize,

    /// Wall-clock time in microseconds.
    pub time_us: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.time_us)
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        self.rate(self.iterations)
    }

    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        self.rate(self.simulations)
    }

    /// Rollouts per iteration. Above 1 because each expansion simulates
    /// every new child.
    #[must_use]
    pub fn simulations_per_iteration(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            f64::from(self.simulations) / f64::from(self.iterations)
        }
    }

    fn rate(&self, count: u32) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            f64::from(count) / secs
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} rollouts, {} nodes, depth {} in {:.1} ms",
            self.iterations,
            self.simulations,
            self.tree_size,
            self.max_depth,
            self.time_us as f64 / 1_000.0
        )
    }
}
