//! Time-bounded Monte Carlo Tree Search for ultimate tic-tac-toe.
//!
//! The search keeps one arena-backed tree per match and re-roots it as real
//! moves are committed, so work done on earlier turns carries over.
//!
//! # Overview
//!
//! Each iteration is one playthrough from the committed position:
//!
//! 1. **Selection**: descend by UCT while nodes have been simulated
//! 2. **Expansion**: discover the leaf's children, with forcing rules and
//!    pruning applied, and step into one of them
//! 3. **Evaluation**: decided games score exactly, everything else keeps
//!    the estimate the [`Evaluator`] produced at discovery
//! 4. **Backpropagation**: negamax update of evals and visit counts
//!
//! Node evals are always the win probability for the player who made the
//! move into the node.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use mcts::{MctsConfig, MctsSearch, ValueNetwork};
//!
//! let mut search = MctsSearch::new(ValueNetwork::new(64, 42), MctsConfig::default())?;
//! search.commit_move(opponent_move)?;
//! let result = search.run(Duration::from_millis(100))?;
//! search.commit_move(result.best_move)?;
//! ```
//!
//! # Evaluators
//!
//! - [`ValueNetwork`]: seeded single-hidden-layer network, evaluates
//!   siblings incrementally
//! - [`RolloutEvaluator`]: uniformly random playouts
//! - [`UniformEvaluator`]: constant 0.5 (for testing)

pub mod arena;
pub mod config;
pub mod evaluator;
pub mod fastmath;
pub mod network;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use arena::{ArenaError, NodeArena};
pub use config::{nodes_for_mib, MctsConfig, DEFAULT_NODE_POOL_MIB};
pub use evaluator::{Evaluator, EvaluatorError, UniformEvaluator};
pub use network::{ValueNetwork, INPUT_SIZE, MAX_HIDDEN_SIZE};
pub use node::{MctsNode, NodeId};
pub use rollout::RolloutEvaluator;
pub use search::{MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::{MctsTree, TreeStats};
