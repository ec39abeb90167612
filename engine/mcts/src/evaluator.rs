//! Evaluator trait for position evaluation.
//!
//! An evaluator estimates, for a position, the win probability of the player
//! who made the last move into it. That is the perspective node evals are
//! stored in, so a child's discovery value can be written straight into the
//! tree.

use games_uttt::{Square, State};
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Trait for position evaluators.
///
/// Implementations:
/// - [`UniformEvaluator`]: constant 0.5 (for testing)
/// - [`crate::ValueNetwork`]: seeded value network with incremental sibling
///   evaluation
/// - [`crate::RolloutEvaluator`]: random rollouts to a terminal state
pub trait Evaluator {
    /// Win probability in `[0, 1]` for the player who just moved into `state`.
    fn evaluate(&mut self, state: &State) -> Result<f32, EvaluatorError>;

    /// Evaluate every child of `parent` reached by `moves`, writing one value
    /// per move into `out` in the same order.
    ///
    /// Default implementation applies each move to a copy and calls
    /// evaluate() in a loop.
    fn evaluate_children(
        &mut self,
        parent: &State,
        moves: &[Square],
        out: &mut Vec<f32>,
    ) -> Result<(), EvaluatorError> {
        out.clear();
        for &square in moves {
            let mut child = *parent;
            child
                .apply_move(square)
                .map_err(|e| EvaluatorError::InvalidState(e.to_string()))?;
            out.push(self.evaluate(&child)?);
        }
        Ok(())
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, state: &State) -> Result<f32, EvaluatorError> {
        (**self).evaluate(state)
    }

    fn evaluate_children(
        &mut self,
        parent: &State,
        moves: &[Square],
        out: &mut Vec<f32>,
    ) -> Result<(), EvaluatorError> {
        (**self).evaluate_children(parent, moves, out)
    }
}

/// Evaluator that calls every position even. Useful for testing MCTS
/// without a model.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&mut self, _state: &State) -> Result<f32, EvaluatorError> {
        Ok(0.5)
    }
}
