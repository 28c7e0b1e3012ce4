//! Arena-based MCTS tree.
//!
//! Every node owns a full game state. Nodes live in one `Vec` and link to
//! each other by `NodeId`, so growing the tree never moves a state behind a
//! pointer and dropping the tree is a single deallocation.

use super::node::{MCTSNode, NodeId};

/// Search tree rooted at the position being searched. The root is always
/// `NodeId(0)`.
#[derive(Clone, Debug)]
pub struct MCTSTree<S, A> {
    nodes: Vec<MCTSNode<S, A>>,
    root: NodeId,
}

impl<S, A> MCTSTree<S, A> {
    pub fn new(root_state: S) -> Self {
        Self::with_capacity(root_state, 1024)
    }

    /// Tree holding only `root_state`, with room for `capacity` nodes.
    pub fn with_capacity(root_state: S, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(root_state));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id. Panics on an id from another tree.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<S, A> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<S, A> {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, node: MCTSNode<S, A>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate `node` as the next child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: MCTSNode<S, A>) -> NodeId {
        let id = self.alloc(node);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `from` up to the root, crediting each node with
    /// `utility(node.state)` and one visit. The closure sees every state on
    /// the path so each node can be scored from its own mover's side.
    pub fn backpropagate(&mut self, from: NodeId, utility: impl Fn(&S) -> f64) {
        let mut current = from;
        while !current.is_none() {
            let node = self.get_mut(current);
            let value = utility(&node.state);
            node.record(value);
            current = node.parent;
        }
    }

    /// Shape of the tree, for search diagnostics.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
        let total_edges: usize = self.nodes.iter().map(|n| n.children.len()).sum();
        let expanded_count = self.nodes.len() - leaf_count;

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            leaf_count,
            total_edges,
            expanded_count,
        }
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<S, A> {
        self.get(self.root)
    }

    /// Children of the root, in expansion order.
    pub fn root_children(&self) -> impl Iterator<Item = &MCTSNode<S, A>> + '_ {
        self.root_node().children.iter().map(move |&id| self.get(id))
    }
}

/// Node counts of a finished search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    /// Nodes never expanded, terminal positions included.
    pub leaf_count: usize,
    pub total_edges: usize,
    pub expanded_count: usize,
}

impl TreeStats {
    /// Mean children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded_count == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.expanded_count as f64
        }
    }
}
