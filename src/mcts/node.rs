//! Search tree nodes and the ids that link them.

/// Position of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Parent link of the root.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One position in the search tree together with its playout record.
///
/// `utility` and `visits` are from the point of view of the side that made
/// `action`, which is what the parent compares when selecting.
#[derive(Clone, Debug)]
pub struct MCTSNode<S, A> {
    pub state: S,
    /// Move from the parent. `None` only at the root.
    pub action: Option<A>,
    pub parent: NodeId,
    /// Children in the order the game listed their actions.
    pub children: Vec<NodeId>,
    /// Sum of playout utilities.
    pub utility: f64,
    pub visits: u32,
    /// Set until the node is expanded. A terminal node stays a leaf.
    pub leaf: bool,
    pub depth: u16,
}

impl<S, A> MCTSNode<S, A> {
    pub fn new(state: S, action: Option<A>, parent: NodeId, depth: u16) -> Self {
        Self {
            state,
            action,
            parent,
            children: Vec::new(),
            utility: 0.0,
            visits: 0,
            leaf: true,
            depth,
        }
    }

    pub fn root(state: S) -> Self {
        Self::new(state, None, NodeId::NONE, 0)
    }

    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Mean playout utility, 0 before the first visit.
    #[must_use]
    pub fn mean_utility(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.utility / f64::from(self.visits)
        }
    }

    #[inline]
    pub fn record(&mut self, utility: f64) {
        self.visits += 1;
        self.utility += utility;
    }
}
