//! MCTS tree structure with arena allocation.
//!
//! The tree owns the [`NodeArena`] and the current root. It knows nothing
//! about the board: the search applies moves while it walks the tree.

use games_uttt::Square;

use crate::arena::{ArenaError, NodeArena};
use crate::fastmath::fast_log2;
use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    arena: NodeArena,

    /// Root node index; moves down the arena as real moves are committed
    root: NodeId,
}

impl MctsTree {
    /// Create a tree holding a single fresh root.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        let mut arena = NodeArena::new(capacity);
        let root = arena.allocate(1)?;
        Ok(Self { arena, root })
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        self.arena.get(id)
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        self.arena.get_mut(id)
    }

    /// Get the total number of nodes in the arena, abandoned ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[inline]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// IDs of a node's children in arena order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        self.get(id).child_range().map(NodeId)
    }

    /// Allocate the children block of `parent` in one piece.
    pub fn add_children(
        &mut self,
        parent: NodeId,
        children: &[(Square, f32)],
    ) -> Result<NodeId, ArenaError> {
        let first = self.arena.allocate(children.len())?;
        for (offset, &(square, eval)) in children.iter().enumerate() {
            *self.get_mut(NodeId(first.0 + offset as u32)) =
                MctsNode::new_child(parent, square, eval);
        }
        let node = self.get_mut(parent);
        node.first_child = first;
        node.child_count = children.len() as i8;
        Ok(first)
    }

    /// Select the child maximising UCT. Ties keep the earliest child.
    /// Returns None if the node has no children.
    pub fn select_child(
        &self,
        id: NodeId,
        exploration: f32,
        first_play_urgency: f32,
    ) -> Option<NodeId> {
        let node = self.get(id);
        // Pre-compute the log term once instead of per child
        let log_term = exploration * exploration * fast_log2(node.sims);

        let mut children = self.children(id);
        let mut best = children.next()?;
        let mut best_score = self.get(best).uct_score(log_term, first_play_urgency);
        for child in children {
            let score = self.get(child).uct_score(log_term, first_play_urgency);
            if score > best_score {
                best = child;
                best_score = score;
            }
        }
        Some(best)
    }

    /// Negamax backup from `from` to the root.
    ///
    /// A node without children is skipped, so fresh leaves never gain sims.
    /// Every ancestor takes `1 - max(0, best child eval)` and one more sim.
    pub fn backpropagate(&mut self, from: NodeId) {
        let mut current = from;
        if !self.get(current).has_children() {
            current = self.get(current).parent;
        }

        while current.is_some() {
            let max_child = self
                .children(current)
                .map(|child| self.get(child).eval)
                .fold(0.0f32, f32::max);
            let node = self.get_mut(current);
            node.eval = 1.0 - max_child;
            node.sims += 1.0;
            current = node.parent;
        }
    }

    /// The most promising root move: argmax of `eval + log2(sims)`.
    /// Returns None if the root has no children.
    pub fn best_move(&self) -> Option<(Square, NodeId)> {
        let score = |id: NodeId| {
            let node = self.get(id);
            node.eval + fast_log2(node.sims)
        };

        let mut children = self.children(self.root);
        let mut best = children.next()?;
        let mut best_score = score(best);
        for child in children {
            let s = score(child);
            if s > best_score {
                best = child;
                best_score = s;
            }
        }
        self.get(best).square.map(|square| (square, best))
    }

    /// Re-root the tree after `square` was played from the root position.
    ///
    /// A root child carrying the square is detached and promoted; its
    /// siblings are abandoned. Otherwise a fresh root is allocated. Returns
    /// whether an existing subtree was kept.
    pub fn update_root(&mut self, square: Square) -> Result<bool, ArenaError> {
        let found = self
            .children(self.root)
            .find(|&child| self.get(child).square == Some(square));

        match found {
            Some(child) => {
                self.get_mut(child).parent = NodeId::NONE;
                self.root = child;
                Ok(true)
            }
            None => {
                let id = self.arena.allocate(1)?;
                *self.get_mut(id) = MctsNode::new_root(Some(square));
                self.root = id;
                Ok(false)
            }
        }
    }

    /// Drop every node and start again from a fresh root.
    pub fn clear(&mut self) -> Result<(), ArenaError> {
        self.arena.clear();
        self.root = self.arena.allocate(1)?;
        Ok(())
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.arena.len(),
            remaining_nodes: self.arena.remaining(),
            root_sims: root.sims,
            root_eval: root.eval,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, id: NodeId, current_depth: u32) -> u32 {
        self.children(id)
            .map(|child| self.compute_max_depth(child, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub remaining_nodes: usize,
    pub root_sims: f32,
    pub root_eval: f32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_children(evals: &[f32]) -> MctsTree {
        let mut tree = MctsTree::new(100).unwrap();
        let children: Vec<(Square, f32)> = evals
            .iter()
            .enumerate()
            .map(|(i, &eval)| (Square::new(0, i as u8), eval))
            .collect();
        tree.add_children(tree.root(), &children).unwrap();
        tree
    }

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(10).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).is_leaf());
        assert!(!tree.get(tree.root()).is_discovered());
        assert!(MctsTree::new(0).is_err());
    }

    #[test]
    fn test_add_children_is_contiguous() {
        let tree = tree_with_children(&[0.1, 0.2, 0.3]);
        let root = tree.get(tree.root());
        assert_eq!(root.child_count, 3);
        assert_eq!(root.first_child, NodeId(1));

        let ids: Vec<NodeId> = tree.children(tree.root()).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
        for (i, &id) in ids.iter().enumerate() {
            assert_eq!(tree.get(id).parent, tree.root());
            assert_eq!(tree.get(id).square, Some(Square::new(0, i as u8)));
        }
    }

    #[test]
    fn test_select_prefers_fresh_children_by_eval() {
        let tree = tree_with_children(&[0.2, 0.6, 0.6, 0.1]);
        // All unvisited: argmax eval, earliest of the tie
        assert_eq!(tree.select_child(tree.root(), 0.41, 0.40), Some(NodeId(2)));
    }

    #[test]
    fn test_select_trades_eval_for_exploration() {
        let mut tree = tree_with_children(&[0.5, 0.45]);
        tree.get_mut(tree.root()).sims = 64.0;
        tree.get_mut(NodeId(1)).sims = 60.0;
        tree.get_mut(NodeId(2)).sims = 3.0;
        // log_term ≈ 1.0: 0.5 + sqrt(1 / 60) loses to 0.45 + sqrt(1 / 3)
        assert_eq!(tree.select_child(tree.root(), 0.41, 0.40), Some(NodeId(2)));
    }

    #[test]
    fn test_select_without_children() {
        let tree = MctsTree::new(1).unwrap();
        assert_eq!(tree.select_child(tree.root(), 0.41, 0.40), None);
    }

    #[test]
    fn test_backpropagate_negamax() {
        let mut tree = tree_with_children(&[0.3, 0.6]);
        // Fresh leaf: starts at its parent
        tree.backpropagate(NodeId(1));
        let root = tree.get(tree.root());
        assert!((root.eval - 0.4).abs() < 1e-6);
        assert_eq!(root.sims, 1.0);
        assert_eq!(tree.get(NodeId(1)).sims, 0.0);

        // Grandchildren under child 2
        tree.add_children(
            NodeId(2),
            &[(Square::new(1, 0), 0.9), (Square::new(1, 1), 0.2)],
        )
        .unwrap();
        tree.backpropagate(NodeId(4));
        // Child 2: 1 - 0.9 = 0.1; root: 1 - max(0.3, 0.1) = 0.7
        assert!((tree.get(NodeId(2)).eval - 0.1).abs() < 1e-6);
        assert_eq!(tree.get(NodeId(2)).sims, 1.0);
        assert!((tree.get(tree.root()).eval - 0.7).abs() < 1e-6);
        assert_eq!(tree.get(tree.root()).sims, 2.0);
    }

    #[test]
    fn test_backpropagate_floors_at_zero() {
        let mut tree = tree_with_children(&[-0.5]);
        tree.backpropagate(NodeId(1));
        assert!((tree.get(tree.root()).eval - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_best_move_uses_sims_and_eval() {
        let mut tree = tree_with_children(&[0.9, 0.5, 0.4]);
        tree.get_mut(NodeId(1)).sims = 2.0;
        tree.get_mut(NodeId(2)).sims = 16.0;
        tree.get_mut(NodeId(3)).sims = 16.0;
        let (square, id) = tree.best_move().unwrap();
        assert_eq!(id, NodeId(2));
        assert_eq!(square, Square::new(0, 1));

        assert!(MctsTree::new(1).unwrap().best_move().is_none());
    }

    #[test]
    fn test_update_root_reuses_child() {
        let mut tree = tree_with_children(&[0.1, 0.2]);
        let before = tree.len();

        assert!(tree.update_root(Square::new(0, 1)).unwrap());
        assert_eq!(tree.root(), NodeId(2));
        assert!(tree.get(tree.root()).parent.is_none());
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_update_root_allocates_for_unknown_move() {
        let mut tree = tree_with_children(&[0.1, 0.2]);

        assert!(!tree.update_root(Square::new(5, 5)).unwrap());
        assert_eq!(tree.root(), NodeId(3));
        let root = tree.get(tree.root());
        assert_eq!(root.square, Some(Square::new(5, 5)));
        assert!(root.is_leaf());
        assert!(!root.is_discovered());
    }

    #[test]
    fn test_update_root_exhausted() {
        let mut tree = MctsTree::new(1).unwrap();
        assert!(matches!(
            tree.update_root(Square::CENTER),
            Err(ArenaError::Exhausted { .. })
        ));
        assert_eq!(tree.root(), NodeId(0));
    }

    #[test]
    fn test_stats() {
        let mut tree = tree_with_children(&[0.1, 0.2]);
        tree.add_children(NodeId(1), &[(Square::new(0, 5), 0.5)]).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.remaining_nodes, 96);
        assert_eq!(stats.max_depth, 2);

        tree.clear().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.stats().max_depth, 0);
    }
}
