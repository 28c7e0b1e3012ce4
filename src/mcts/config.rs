//! Search budget and selection parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters of one `MCTSSearch`. Missing fields deserialize to their
/// defaults, so a config file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// UCB1 exploration constant, √2 by default.
    pub exploration_constant: f64,

    /// Wall-clock budget per search, in milliseconds.
    pub time_budget_ms: u64,

    /// Budget withheld from searches longer than this, in milliseconds.
    /// Covers move transmission when playing against a server.
    pub safety_margin_ms: u64,

    /// Stop after this many iterations even if time remains.
    pub max_iterations: Option<u32>,

    /// Expansion stops once the tree would grow past this many nodes.
    pub max_nodes: usize,

    /// Rollout seed. The same seed and iteration cap replay a search exactly.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            time_budget_ms: 1_000,
            safety_margin_ms: 2_000,
            max_iterations: None,
            max_nodes: 200_000,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whole milliseconds; sub-millisecond parts are dropped.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = budget.as_millis() as u64;
        self
    }

    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Time the search may actually spend.
    ///
    /// Budgets above the safety margin lose the margin; shorter ones are
    /// used as given.
    #[must_use]
    pub fn effective_budget(&self) -> Duration {
        let budget = if self.time_budget_ms > self.safety_margin_ms {
            self.time_budget_ms - self.safety_margin_ms
        } else {
            self.time_budget_ms
        };
        Duration::from_millis(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.time_budget_ms, 1_000);
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_time_budget(Duration::from_secs(5))
            .with_max_iterations(50)
            .with_max_nodes(1_000);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.time_budget_ms, 5_000);
        assert_eq!(config.max_iterations, Some(50));
        assert_eq!(config.max_nodes, 1_000);
    }

    #[test]
    fn test_effective_budget() {
        let short = MCTSConfig::default().with_time_budget(Duration::from_millis(1_500));
        assert_eq!(short.effective_budget(), Duration::from_millis(1_500));

        let long = MCTSConfig::default().with_time_budget(Duration::from_secs(60));
        assert_eq!(long.effective_budget(), Duration::from_secs(58));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MCTSConfig = serde_json::from_str(r#"{"time_budget_ms": 60000, "seed": 9}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.effective_budget(), Duration::from_secs(58));
        assert_eq!(config.max_nodes, MCTSConfig::default().max_nodes);
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default().with_max_iterations(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
