//! Seedable random number generation for playouts.
//!
//! Every rollout draws from a [`GameRng`] owned by the search, so a search
//! started from the same seed and the same iteration cap replays exactly.
//!
//! ```
//! use tablut_mcts::core::GameRng;
//!
//! let mut rng = GameRng::new(7);
//! let picked = rng.choose_weighted(&[1.0, 0.0, 3.0]);
//! assert!(matches!(picked, Some(0) | Some(2)));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic ChaCha8-backed RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[0, 1)`.
    fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// Weights are normalized by their sum. Returns `None` when the slice is
    /// empty or no weight is positive.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.gen_f64() * total;
        let mut last_positive = None;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            threshold -= weight;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Rounding can leave a sliver of threshold after the last weight.
        last_positive
    }
}
