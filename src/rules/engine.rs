//! The game contract consumed by the search.
//!
//! A game implements `Game` to expose:
//! - What actions are legal
//! - How an action produces a successor state
//! - How a state is played out and scored

use std::fmt;

use crate::core::GameRng;
use crate::mcts::{MCTSConfig, MCTSNode, UCB1};

/// Game contract.
///
/// The search calls these methods and never interprets game-specific
/// concepts directly.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Return empty when the state is terminal
/// - `apply_action`: Must leave the input state untouched
/// - `rollout`: Must terminate; cap long playouts instead of looping
/// - `utility`: Scored for the player who moved into `state`
pub trait Game {
    /// Position type stored in search nodes.
    type State: Clone;

    /// Move type labelling tree edges.
    type Action: Clone + PartialEq + fmt::Debug;

    /// Result of a playout.
    type Outcome;

    /// Candidate actions from `state`, in the order they should be expanded.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor of `state` after `action`.
    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Play `state` out to a result.
    fn rollout(&self, state: &Self::State, rng: &mut GameRng) -> Self::Outcome;

    /// Value of `outcome` in `[0, 1]` for the player who moved into `state`.
    fn utility(&self, state: &Self::State, outcome: &Self::Outcome) -> f64;

    /// Score used to pick among siblings during selection.
    ///
    /// Defaults to UCB1 over the node's accumulated utility.
    fn selection_value(
        &self,
        node: &MCTSNode<Self::State, Self::Action>,
        parent_visits: u32,
        config: &MCTSConfig,
    ) -> f64 {
        UCB1::value(
            node.utility,
            node.visits,
            parent_visits,
            config.exploration_constant,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts down to zero; the player who says zero wins.
    struct Countdown;

    impl Game for Countdown {
        type State = u8;
        type Action = u8;
        type Outcome = bool;

        fn legal_actions(&self, state: &u8) -> Vec<u8> {
            (1..=(*state).min(2)).collect()
        }

        fn apply_action(&self, state: &u8, action: &u8) -> u8 {
            state - action
        }

        fn rollout(&self, state: &u8, _rng: &mut GameRng) -> bool {
            *state == 0
        }

        fn utility(&self, _state: &u8, outcome: &bool) -> f64 {
            if *outcome {
                1.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn test_default_selection_value_is_ucb1() {
        let game = Countdown;
        let config = MCTSConfig::default();

        let mut node = MCTSNode::root(3u8);
        assert_eq!(game.selection_value(&node, 10, &config), f64::INFINITY);

        node.visits = 4;
        node.utility = 2.0;
        let expected = 0.5 + config.exploration_constant * ((10f64).ln() / 4.0).sqrt();
        assert!((game.selection_value(&node, 10, &config) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_contract_leaves_state() {
        let game = Countdown;
        let state = 3u8;
        let next = game.apply_action(&state, &2);
        assert_eq!(state, 3);
        assert_eq!(next, 1);
        assert_eq!(game.legal_actions(&0), Vec::<u8>::new());
    }
}
