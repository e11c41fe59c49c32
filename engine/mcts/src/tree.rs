//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Parents own their children through
//! the arena; the child's `parent` field is a plain back-reference.

use games_nineboard::{GameState, MoveSet, Outcome};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at `state`.
    pub fn new(state: &GameState) -> Self {
        Self::with_capacity(state, 1)
    }

    /// Create a tree with room for `capacity` nodes before reallocating.
    pub fn with_capacity(state: &GameState, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MctsNode::new_root(state.last_mover(), state.legal_moves()));
        Self {
            nodes,
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the child of `node_id` with the highest UCB1-tuned score.
    ///
    /// `variance` is the simplified variance bound (0.25 for UCB1-tuned).
    /// Ties go to the child created first. Returns (action, NodeId), or `None`
    /// for a node without children; panics if the node or a child has never
    /// been visited.
    pub fn select_child(&self, node_id: NodeId, variance: f64) -> Option<(u8, NodeId)> {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return None;
        }
        assert!(
            node.visit_count > 0,
            "select_child called on unvisited node {:?}",
            node_id
        );
        // Pre-compute the log term once instead of per child
        let scaled_log = variance * (node.visit_count as f64).ln();

        let mut best: Option<(u8, NodeId, f64)> = None;
        for &(action, child_id) in &node.children {
            let score = self.get(child_id).ucb_score(scaled_log);
            match best {
                Some((_, _, best_score)) if score <= best_score => {}
                _ => best = Some((action, child_id, score)),
            }
        }
        best.map(|(action, id, _)| (action, id))
    }

    /// Expand `parent_id` with `action`, where `state` is the position after
    /// the move. Removes the move from the parent's untried set and returns
    /// the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, action: u8, state: &GameState) -> NodeId {
        let bit = 1u16 << action;
        let parent = self.get_mut(parent_id);
        assert!(
            parent.untried & bit != 0,
            "move {} is not an untried move of node {}",
            action,
            parent_id.0
        );
        parent.untried &= !bit;

        // Terminal positions have nothing left to try.
        let untried = if state.is_terminal() {
            MoveSet::from_mask(0)
        } else {
            state.legal_moves()
        };
        let child = MctsNode::new_child(parent_id, action, state.last_mover(), untried);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push((action, child_id));

        child_id
    }

    /// Backpropagate a finished playout from a leaf to the root.
    ///
    /// Every node on the path gains one visit and the outcome's reward as
    /// seen by that node's mover.
    pub fn backpropagate(&mut self, leaf_id: NodeId, outcome: &Outcome) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.win_score += outcome.reward_for(node.mover);
            current_id = node.parent;
        }
    }

    /// Most visited child of the root as (action, NodeId).
    /// The first child wins ties. Returns None if root has no children.
    pub fn best_child(&self) -> Option<(u8, NodeId)> {
        let root = self.get(self.root);
        let mut best: Option<(u8, NodeId, u32)> = None;
        for &(action, id) in &root.children {
            let visits = self.get(id).visit_count;
            match best {
                Some((_, _, best_visits)) if visits <= best_visits => {}
                _ => best = Some((action, id, visits)),
            }
        }
        best.map(|(action, id, _)| (action, id))
    }

    /// (action, visits, win rate) for every root child, in creation order.
    pub fn root_children(&self) -> Vec<(u8, u32, f64)> {
        self.get(self.root)
            .children
            .iter()
            .map(|&(action, id)| {
                let child = self.get(id);
                (action, child.visit_count, child.win_rate())
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Children are always allocated after their parent, so one forward
        // pass over the arena sees every parent depth before its children.
        let mut depths = vec![0u32; self.nodes.len()];
        let mut max_depth = 0;
        for (index, node) in self.nodes.iter().enumerate().skip(1) {
            let depth = depths[node.parent.0 as usize] + 1;
            depths[index] = depth;
            max_depth = max_depth.max(depth);
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}
