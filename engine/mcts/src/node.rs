//! MCTS tree node representation.
//!
//! Each node stands for the position reached by playing `action` from its
//! parent. Nodes do not store game states; the search replays moves from
//! the root instead. Statistics are kept from the point of view of the side
//! that made the incoming move.

use games_nineboard::{MoveSet, Side};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root). Back-reference only.
    pub parent: NodeId,

    /// Move (cell index) that led to this node; `None` for the root.
    pub action: Option<u8>,

    /// Side that made `action` (for the root, the side that moved last).
    pub mover: Side,

    /// Expanded children as (action, NodeId) pairs, in creation order.
    pub children: Vec<(u8, NodeId)>,

    /// Legal moves not yet expanded into a child, as a 9-bit mask.
    pub untried: u16,

    /// Number of completed iterations that passed through this node
    pub visit_count: u32,

    /// Accumulated reward for `mover`; draws contribute 0.5.
    pub win_score: f64,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(mover: Side, untried: MoveSet) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            mover,
            children: Vec::new(),
            untried: untried.mask(),
            visit_count: 0,
            win_score: 0.0,
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: u8, mover: Side, untried: MoveSet) -> Self {
        Self {
            parent,
            action: Some(action),
            mover,
            children: Vec::with_capacity(untried.len()),
            untried: untried.mask(),
            visit_count: 0,
            win_score: 0.0,
        }
    }

    /// Win rate for `mover`: win_score / visit_count.
    /// Returns 0.5 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visit_count == 0 {
            0.5
        } else {
            self.win_score / self.visit_count as f64
        }
    }

    /// UCB1-tuned score seen from the parent:
    /// `win_rate + sqrt(variance * ln(N_parent) / n)`.
    ///
    /// Takes pre-computed `variance * ln(N_parent)`. Panics on an unvisited
    /// node since the formula is undefined there.
    #[inline]
    pub fn ucb_score(&self, scaled_log_parent_visits: f64) -> f64 {
        assert!(
            self.visit_count > 0,
            "UCB score requested for an unvisited node (action {:?})",
            self.action
        );
        let visits = self.visit_count as f64;
        self.win_score / visits + (scaled_log_parent_visits / visits).sqrt()
    }

    #[inline]
    pub fn untried_moves(&self) -> MoveSet {
        MoveSet::from_mask(self.untried)
    }

    #[inline]
    pub fn has_untried(&self) -> bool {
        self.untried != 0
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Fully expanded nodes are the ones selection descends through.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        !self.has_untried() && self.is_expanded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(Side::Cross, MoveSet::from_mask(0b111));

        assert!(node.parent.is_none());
        assert_eq!(node.action, None);
        assert_eq!(node.mover, Side::Cross);
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.untried_moves().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(node.children.is_empty());
        assert!(!node.is_fully_expanded());
    }

    #[test]
    fn test_win_rate() {
        let mut node = MctsNode::new_child(NodeId(0), 3, Side::Circle, MoveSet::from_mask(0));

        // Unvisited
        assert!((node.win_rate() - 0.5).abs() < 1e-12);

        node.visit_count = 4;
        node.win_score = 3.0;
        assert!((node.win_rate() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = MctsNode::new_child(NodeId(0), 1, Side::Circle, MoveSet::from_mask(0));
        node.visit_count = 10;
        node.win_score = 5.0;

        // 0.5 + sqrt(0.25 * ln(100) / 10) = 0.5 + 0.3393...
        let scaled = 0.25 * (100f64).ln();
        let ucb = node.ucb_score(scaled);
        assert!((ucb - 0.8393).abs() < 1e-3);
    }

    #[test]
    #[should_panic(expected = "unvisited node")]
    fn test_ucb_score_rejects_unvisited() {
        let node = MctsNode::new_child(NodeId(0), 1, Side::Circle, MoveSet::from_mask(0));
        node.ucb_score(1.0);
    }
}
