//! Fixed-capacity bump allocator for tree nodes.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Space is never reclaimed during a match: subtrees abandoned by a root
//! update stay resident until [`NodeArena::clear`].

use thiserror::Error;

use crate::node::{MctsNode, NodeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("node arena exhausted: requested {requested} nodes with {used} of {capacity} in use")]
    Exhausted {
        requested: usize,
        used: usize,
        capacity: usize,
    },
}

#[derive(Debug)]
pub struct NodeArena {
    nodes: Vec<MctsNode>,
    capacity: usize,
}

impl NodeArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Reserve `count` consecutive nodes and return the first one.
    pub fn allocate(&mut self, count: usize) -> Result<NodeId, ArenaError> {
        let used = self.nodes.len();
        if count > self.capacity - used {
            return Err(ArenaError::Exhausted {
                requested: count,
                used,
                capacity: self.capacity,
            });
        }
        self.nodes.resize(used + count, MctsNode::default());
        Ok(NodeId(used as u32))
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.index()]
    }

    /// Nodes handed out so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.nodes.len()
    }

    /// Drop every node; the reserved memory is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_allocation() {
        let mut arena = NodeArena::new(10);
        assert!(arena.is_empty());

        assert_eq!(arena.allocate(1).unwrap(), NodeId(0));
        assert_eq!(arena.allocate(4).unwrap(), NodeId(1));
        assert_eq!(arena.allocate(2).unwrap(), NodeId(5));
        assert_eq!(arena.len(), 7);
        assert_eq!(arena.remaining(), 3);
        assert_eq!(*arena.get(NodeId(6)), MctsNode::default());
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut arena = NodeArena::new(5);
        arena.allocate(3).unwrap();

        let err = arena.allocate(3).unwrap_err();
        assert_eq!(
            err,
            ArenaError::Exhausted {
                requested: 3,
                used: 3,
                capacity: 5
            }
        );
        // Failed allocation leaves the cursor alone
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.allocate(2).unwrap(), NodeId(3));
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_clear() {
        let mut arena = NodeArena::new(4);
        arena.allocate(4).unwrap();
        arena.get_mut(NodeId(2)).eval = 0.9;

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.allocate(4).unwrap(), NodeId(0));
        assert_eq!(arena.get(NodeId(2)).eval, 0.0);
    }
}
