//! MCTS tree node representation.
//!
//! A node stands for the position reached by playing `square` from its
//! parent. Children are discovered lazily and live in one contiguous arena
//! block starting at `first_child`.

use std::ops::Range;

use games_uttt::Square;

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

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// First node of the children block (NONE until discovered)
    pub first_child: NodeId,

    /// -1 until discovered, 0 for a node without children
    pub child_count: i8,

    /// Estimated win probability of the player who played `square`
    pub eval: f32,

    /// Number of backpropagations through this node
    pub sims: f32,

    /// Move that led here; `None` only for the initial root
    pub square: Option<Square>,
}

impl Default for MctsNode {
    fn default() -> Self {
        Self::new_root(None)
    }
}

impl MctsNode {
    pub const UNDISCOVERED: i8 = -1;

    /// Create a new root node.
    pub fn new_root(square: Option<Square>) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            child_count: Self::UNDISCOVERED,
            eval: 0.0,
            sims: 0.0,
            square,
        }
    }

    /// Create a new child node with the evaluation it was discovered with.
    pub fn new_child(parent: NodeId, square: Square, eval: f32) -> Self {
        Self {
            parent,
            square: Some(square),
            eval,
            ..Self::new_root(None)
        }
    }

    /// A node is a leaf until something was backpropagated through it,
    /// whether or not its children are known.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.sims == 0.0
    }

    #[inline]
    pub fn is_discovered(&self) -> bool {
        self.child_count != Self::UNDISCOVERED
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.child_count > 0
    }

    /// Arena indices of the children block.
    #[inline]
    pub fn child_range(&self) -> Range<u32> {
        if self.child_count > 0 {
            self.first_child.0..self.first_child.0 + self.child_count as u32
        } else {
            0..0
        }
    }

    /// UCT score seen by the parent.
    ///
    /// `log_term` is `C² · log2(parent sims)`, computed once per selection.
    #[inline]
    pub fn uct_score(&self, log_term: f32, first_play_urgency: f32) -> f32 {
        let exploration = if self.sims == 0.0 {
            first_play_urgency
        } else {
            (log_term / self.sims).sqrt()
        };
        self.eval + exploration
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
        let node = MctsNode::new_root(None);

        assert!(node.parent.is_none());
        assert!(node.first_child.is_none());
        assert!(node.is_leaf());
        assert!(!node.is_discovered());
        assert!(!node.has_children());
        assert_eq!(node.child_range(), 0..0);
    }

    #[test]
    fn test_new_child() {
        let node = MctsNode::new_child(NodeId(3), Square::new(2, 7), 0.25);
        assert_eq!(node.parent, NodeId(3));
        assert_eq!(node.square, Some(Square::new(2, 7)));
        assert!((node.eval - 0.25).abs() < 1e-6);
        assert!(node.is_leaf());
    }

    #[test]
    fn test_uct_score() {
        let mut node = MctsNode::new_child(NodeId(0), Square::CENTER, 0.3);

        // Unvisited: eval + first play urgency
        assert!((node.uct_score(5.0, 0.4) - 0.7).abs() < 1e-6);

        // Visited: eval + sqrt(log_term / sims)
        node.sims = 4.0;
        assert!((node.uct_score(1.0, 0.4) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_child_range() {
        let mut node = MctsNode::new_root(None);
        node.first_child = NodeId(10);
        node.child_count = 3;
        assert_eq!(node.child_range(), 10..13);

        node.child_count = 0;
        assert!(node.is_discovered());
        assert_eq!(node.child_range(), 0..0);
    }
}
