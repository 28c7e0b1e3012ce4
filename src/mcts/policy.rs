//! Selection policy.

// =============================================================================
// Selection Policy
// =============================================================================

/// UCB1 (Upper Confidence Bound) selection.
///
/// Balances exploitation (high mean utility) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a))
#[derive(Clone, Copy, Debug, Default)]
pub struct UCB1;

impl UCB1 {
    /// UCB1 score for a child with `visits` visits and `utility` total.
    ///
    /// Unvisited children score infinity so every child is tried once.
    #[inline]
    #[must_use]
    pub fn value(utility: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
        if visits == 0 {
            return f64::INFINITY;
        }
        let n = visits as f64;
        let ln_parent = (parent_visits.max(1) as f64).ln();
        utility / n + exploration * (ln_parent / n).sqrt()
    }

    /// Index of the highest-scoring entry; earlier entries win ties.
    /// NaN scores are never chosen.
    #[must_use]
    pub fn argmax(scores: impl IntoIterator<Item = f64>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, score) in scores.into_iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ucb1_unvisited_is_infinite() {
        assert_eq!(UCB1::value(0.0, 0, 100, 1.4), f64::INFINITY);
    }

    #[test]
    fn test_ucb1_formula() {
        let c = std::f64::consts::SQRT_2;
        let value = UCB1::value(3.0, 4, 20, c);
        let expected = 0.75 + c * ((20f64).ln() / 4.0).sqrt();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ucb1_prefers_less_visited_at_equal_mean() {
        let c = std::f64::consts::SQRT_2;
        let rare = UCB1::value(1.0, 2, 100, c);
        let common = UCB1::value(25.0, 50, 100, c);
        assert!(rare > common);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(UCB1::argmax(Vec::<f64>::new()), None);
        assert_eq!(UCB1::argmax(vec![0.1, 0.7, 0.3]), Some(1));
        assert_eq!(UCB1::argmax(vec![0.5, 0.5]), Some(0));
        assert_eq!(UCB1::argmax(vec![1.0, f64::INFINITY, f64::INFINITY]), Some(1));
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(UCB1::argmax(vec![f64::NAN, 0.2]), Some(1));
        assert_eq!(UCB1::argmax(vec![0.3, f64::NAN, 0.1]), Some(0));
        assert_eq!(UCB1::argmax(vec![0.3, f64::NAN, 0.9]), Some(2));
        assert_eq!(UCB1::argmax(vec![f64::NAN]), None);
    }
}
