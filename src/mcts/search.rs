//! Core MCTS search algorithm.
//!
//! Runs select, expand, simulate and backpropagate against any `Game`
//! until the wall-clock budget, the iteration cap or the node cap is hit,
//! then returns the most visited root child.

use std::time::Instant;

use tracing::{debug, trace};

use crate::core::GameRng;
use crate::rules::Game;

use super::config::MCTSConfig;
use super::node::{MCTSNode, NodeId};
use super::policy::UCB1;
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Generic over the game. Owns the configuration, the RNG used for
/// rollouts and the tree of the most recent search.
pub struct MCTSSearch<G: Game> {
    /// The game being searched.
    game: G,

    /// Search configuration.
    config: MCTSConfig,

    /// Tree from the last call to `search`.
    tree: Option<MCTSTree<G::State, G::Action>>,

    /// RNG for rollouts.
    rng: GameRng,

    /// Search statistics.
    stats: SearchStats,
}

impl<G: Game> MCTSSearch<G> {
    /// Create a new MCTS search context.
    pub fn new(game: G, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            game,
            config,
            tree: None,
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Search from `state` and return the most visited root action.
    ///
    /// Returns `None` when `state` has no legal action. A single candidate
    /// is returned immediately without spending the budget.
    pub fn search(&mut self, state: &G::State) -> Option<G::Action> {
        let start = Instant::now();
        let deadline = start + self.config.effective_budget();
        self.stats.reset();

        let mut tree = MCTSTree::with_capacity(state.clone(), self.config.max_nodes.min(1 << 16));
        let root = tree.root();
        self.expand(&mut tree, root);

        let forced = match tree.root_node().children.as_slice() {
            [] => Some(None),
            [only] => Some(tree.get(*only).action.clone()),
            _ => None,
        };
        if let Some(action) = forced {
            trace!(action = ?action, "no choice at root, skipping search");
            self.finish(tree, start);
            return action;
        }

        // The root expansion opens the first iteration.
        self.simulate_children(&mut tree, root);
        self.stats.iterations = 1;

        loop {
            if let Some(cap) = self.config.max_iterations {
                if self.stats.iterations >= cap {
                    break;
                }
            }
            if tree.len() >= self.config.max_nodes || Instant::now() >= deadline {
                break;
            }
            self.iteration(&mut tree);
            self.stats.iterations += 1;
        }

        let best = Self::most_visited(&tree);
        self.finish(tree, start);
        best
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, tree: &mut MCTSTree<G::State, G::Action>) {
        let leaf = self.select(tree);

        if tree.get(leaf).is_leaf() {
            self.expand(tree, leaf);
        }

        if tree.get(leaf).children.is_empty() {
            // Terminal, or expansion was refused at the node cap.
            self.simulate(tree, leaf);
        } else {
            self.simulate_children(tree, leaf);
        }
    }

    /// Descend from the root along the best selection value to a leaf.
    fn select(&self, tree: &MCTSTree<G::State, G::Action>) -> NodeId {
        let mut current = tree.root();
        loop {
            let node = tree.get(current);
            if node.is_leaf() || node.children.is_empty() {
                return current;
            }
            let parent_visits = node.visits;
            let scores = node.children.iter().map(|&child| {
                self.game
                    .selection_value(tree.get(child), parent_visits, &self.config)
            });
            match UCB1::argmax(scores) {
                Some(i) => current = node.children[i],
                None => return current,
            }
        }
    }

    /// Create one child per candidate action of `node_id`.
    fn expand(&mut self, tree: &mut MCTSTree<G::State, G::Action>, node_id: NodeId) {
        let node = tree.get(node_id);
        let actions = self.game.legal_actions(&node.state);
        if !actions.is_empty() && tree.len() + actions.len() > self.config.max_nodes {
            return;
        }

        let depth = node.depth + 1;
        let children: Vec<_> = actions
            .into_iter()
            .map(|action| {
                let state = self.game.apply_action(&node.state, &action);
                MCTSNode::new(state, Some(action), node_id, depth)
            })
            .collect();

        if !children.is_empty() && depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }
        for child in children {
            tree.add_child(node_id, child);
        }
        tree.get_mut(node_id).leaf = false;
        self.stats.nodes_expanded += 1;
    }

    /// Roll out every child of `node_id` once.
    fn simulate_children(&mut self, tree: &mut MCTSTree<G::State, G::Action>, node_id: NodeId) {
        let children = tree.get(node_id).children.clone();
        for child in children {
            self.simulate(tree, child);
        }
    }

    /// Roll out from `node_id` and backpropagate the result to the root.
    fn simulate(&mut self, tree: &mut MCTSTree<G::State, G::Action>, node_id: NodeId) {
        let outcome = self.game.rollout(&tree.get(node_id).state, &mut self.rng);
        let game = &self.game;
        tree.backpropagate(node_id, |state| game.utility(state, &outcome));
        self.stats.simulations += 1;
    }

    /// Most visited root child; earlier children win ties.
    fn most_visited(tree: &MCTSTree<G::State, G::Action>) -> Option<G::Action> {
        let children = &tree.root_node().children;
        let visits = children.iter().map(|&c| f64::from(tree.get(c).visits));
        UCB1::argmax(visits).and_then(|i| tree.get(children[i]).action.clone())
    }

    fn finish(&mut self, tree: MCTSTree<G::State, G::Action>, start: Instant) {
        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.stats.tree_size = tree.len();

        let shape = tree.stats();
        debug!(
            iterations = self.stats.iterations,
            nodes = self.stats.tree_size,
            simulations = self.stats.simulations,
            max_depth = self.stats.max_depth,
            branching = shape.branching_factor(),
            unexpanded = shape.leaf_count,
            elapsed_ms = self.stats.time_us / 1_000,
            "search finished"
        );
        for child in tree.root_children() {
            trace!(
                action = ?child.action,
                visits = child.visits,
                mean = child.mean_utility(),
                "root child"
            );
        }

        self.tree = Some(tree);
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the tree of the last search.
    #[must_use]
    pub fn tree(&self) -> Option<&MCTSTree<G::State, G::Action>> {
        self.tree.as_ref()
    }

    /// Root children of the last search.
    ///
    /// Returns (action, visits, mean utility) in expansion order.
    pub fn root_children(&self) -> Vec<(G::Action, u32, f64)> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        tree.root_children()
            .filter_map(|n| {
                n.action
                    .clone()
                    .map(|action| (action, n.visits, n.mean_utility()))
            })
            .collect()
    }

    /// Get action probabilities from root.
    ///
    /// Returns (action, probability) pairs where probabilities sum to ~1.0.
    pub fn action_probabilities(&self) -> Vec<(G::Action, f64)> {
        let children = self.root_children();
        let total: u32 = children.iter().map(|(_, visits, _)| visits).sum();

        if total == 0 {
            let uniform = 1.0 / children.len().max(1) as f64;
            return children
                .into_iter()
                .map(|(action, _, _)| (action, uniform))
                .collect();
        }

        children
            .into_iter()
            .map(|(action, visits, _)| (action, visits as f64 / total as f64))
            .collect()
    }

    /// Get the game reference.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}
