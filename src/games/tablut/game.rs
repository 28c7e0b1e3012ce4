//! Tablut behind the search's `Game` contract.
//!
//! Expansion uses the policy's best-first ordering (forced moves alone when
//! there are any) and rollouts sample the weighted playout distribution.

use serde::{Deserialize, Serialize};

use super::piece::{Action, Side};
use super::policy::TablutPolicy;
use super::state::{GameState, Status};
use super::weights::Weights;
use crate::core::GameRng;
use crate::rules::Game;

/// Plies after which a rollout gives up.
pub const DEFAULT_MAX_ROLLOUT_PLIES: u32 = 100;

/// How a rollout ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    WhiteWin,
    BlackWin,
    Draw,
    /// Hit the ply cap before the game ended.
    Aborted,
}

impl Outcome {
    /// Outcome of a finished game, `None` while it is still going.
    #[must_use]
    pub const fn from_status(status: Status) -> Option<Self> {
        match status {
            Status::Ongoing => None,
            Status::WhiteWin => Some(Outcome::WhiteWin),
            Status::BlackWin => Some(Outcome::BlackWin),
            Status::Draw => Some(Outcome::Draw),
        }
    }

    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Outcome::WhiteWin => Some(Side::White),
            Outcome::BlackWin => Some(Side::Black),
            Outcome::Draw | Outcome::Aborted => None,
        }
    }
}

/// Tablut with heuristic expansion and capped, weighted rollouts.
#[derive(Clone, Debug)]
pub struct TablutGame {
    policy: TablutPolicy,
    max_rollout_plies: u32,
}

impl Default for TablutGame {
    fn default() -> Self {
        Self::new(Weights::default())
    }
}

impl TablutGame {
    pub fn new(weights: Weights) -> Self {
        Self {
            policy: TablutPolicy::new(weights),
            max_rollout_plies: DEFAULT_MAX_ROLLOUT_PLIES,
        }
    }

    /// Replace the playout weights.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.policy = TablutPolicy::new(weights);
        self
    }

    /// Cap rollouts at `plies` moves.
    pub fn with_max_rollout_plies(mut self, plies: u32) -> Self {
        self.max_rollout_plies = plies;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &TablutPolicy {
        &self.policy
    }

    #[must_use]
    pub fn max_rollout_plies(&self) -> u32 {
        self.max_rollout_plies
    }
}

impl Game for TablutGame {
    type State = GameState;
    type Action = Action;
    type Outcome = Outcome;

    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.is_terminal() {
            return Vec::new();
        }
        self.policy.best_actions_first(state)
    }

    fn apply_action(&self, state: &GameState, action: &Action) -> GameState {
        let mut next = state.clone();
        next.apply_action(action);
        next
    }

    fn rollout(&self, state: &GameState, rng: &mut GameRng) -> Outcome {
        let mut state = state.clone();
        for _ in 0..self.max_rollout_plies {
            if let Some(outcome) = Outcome::from_status(state.status()) {
                return outcome;
            }
            match self.policy.sample(&state, rng) {
                Some(action) => state.apply_action(&action),
                None => return Outcome::Aborted,
            }
        }
        Outcome::from_status(state.status()).unwrap_or(Outcome::Aborted)
    }

    /// 1 when the player who moved into `state` won, 0 when they lost and
    /// 0.5 otherwise.
    fn utility(&self, state: &GameState, outcome: &Outcome) -> f64 {
        match outcome.winner() {
            Some(winner) if winner == state.turn().opponent() => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tablut::geometry::Position;
    use crate::games::tablut::grid::Grid;

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(Outcome::from_status(Status::Ongoing), None);
        assert_eq!(Outcome::from_status(Status::WhiteWin), Some(Outcome::WhiteWin));
        assert_eq!(Outcome::from_status(Status::Draw), Some(Outcome::Draw));
        assert_eq!(Outcome::Aborted.winner(), None);
    }

    #[test]
    fn test_utility_credits_player_who_moved() {
        let game = TablutGame::default();
        // White to move, so Black made the move into this state.
        let state = GameState::new();

        assert_eq!(game.utility(&state, &Outcome::BlackWin), 1.0);
        assert_eq!(game.utility(&state, &Outcome::WhiteWin), 0.0);
        assert_eq!(game.utility(&state, &Outcome::Draw), 0.5);
        assert_eq!(game.utility(&state, &Outcome::Aborted), 0.5);
    }

    #[test]
    fn test_rollout_respects_ply_cap() {
        let game = TablutGame::default().with_max_rollout_plies(0);
        let mut rng = GameRng::new(1);
        assert_eq!(game.rollout(&GameState::new(), &mut rng), Outcome::Aborted);
    }

    #[test]
    fn test_rollout_of_finished_game() {
        let grid = Grid::from_symbols(&[
            "---------",
            "---------",
            "---------",
            "---------",
            "---------",
            "---------",
            "B--------",
            "---------",
            "--K------",
        ]);
        let state = GameState::from_grid(grid, Side::Black).unwrap();
        assert!(state.is_white_win());

        let game = TablutGame::default();
        let mut rng = GameRng::new(1);
        assert_eq!(game.rollout(&state, &mut rng), Outcome::WhiteWin);
        assert!(game.legal_actions(&state).is_empty());
    }

    #[test]
    fn test_rollouts_terminate() {
        let game = TablutGame::default();
        let mut rng = GameRng::new(99);
        for _ in 0..5 {
            let outcome = game.rollout(&GameState::new(), &mut rng);
            assert!(matches!(
                outcome,
                Outcome::WhiteWin | Outcome::BlackWin | Outcome::Draw | Outcome::Aborted
            ));
        }
    }

    #[test]
    fn test_apply_action_leaves_parent() {
        let game = TablutGame::default();
        let state = GameState::new();
        let action = game.legal_actions(&state)[0].clone();

        let next = game.apply_action(&state, &action);

        assert_eq!(state.grid().get(action.from()), action.kind());
        assert_eq!(next.grid().get(action.to), action.kind());
        assert_eq!(next.turn(), Side::Black);
        assert_eq!(state.turn(), Side::White);
    }

    #[test]
    fn test_opening_is_single_candidate() {
        let game = TablutGame::default();
        let actions = game.legal_actions(&GameState::new());
        assert_eq!(actions.len(), 1);
        assert_eq!((actions[0].from(), actions[0].to), (p(2, 4), p(2, 1)));
    }
}
