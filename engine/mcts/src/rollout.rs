//! Random-rollout leaf evaluation.
//!
//! Plays uniformly random moves from the position until the game ends and
//! scores the result for the player who made the last move into it. A side
//! with a one-move win on the rollout caches is credited with the win on the
//! spot.
//!
//! The search evaluates a node once, when it is discovered, so each node
//! holds a single playout. Later visits refine its value only through the
//! playouts of its descendants.

use games_uttt::{State, Winner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::evaluator::{Evaluator, EvaluatorError};

#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    rng: ChaCha20Rng,
}

impl RolloutEvaluator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Play out `state` and return the final outcome.
    pub fn play_out(&mut self, state: &State) -> Result<Winner, EvaluatorError> {
        let mut game = *state;
        while !game.is_over() {
            if game.has_winning_move() {
                return Ok(Winner::of(game.current_player()));
            }
            let count = game.legal_move_count();
            if count == 0 {
                return Err(EvaluatorError::InvalidState(format!(
                    "no legal moves in an ongoing game:\n{}",
                    game
                )));
            }
            let square = game
                .nth_legal_move(self.rng.gen_range(0..count))
                .ok_or_else(|| EvaluatorError::InvalidState("move index out of range".into()))?;
            game.apply_move(square)
                .map_err(|e| EvaluatorError::InvalidState(e.to_string()))?;
        }
        Ok(game.winner())
    }
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(&mut self, state: &State) -> Result<f32, EvaluatorError> {
        let last_mover = state.current_player().other();
        let winner = self.play_out(state)?;
        winner
            .score_for(last_mover)
            .ok_or_else(|| EvaluatorError::EvaluationFailed("rollout ended undecided".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_uttt::Square;

    #[test]
    fn test_rollout_reaches_an_outcome() {
        let mut rollout = RolloutEvaluator::new(42);
        for _ in 0..50 {
            let value = rollout.evaluate(&State::new()).unwrap();
            assert!(value == 0.0 || value == 0.5 || value == 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_rollouts() {
        let state = State::from_moves(&[Square::CENTER, Square::new(4, 0)]).unwrap();
        let mut a = RolloutEvaluator::new(9);
        let mut b = RolloutEvaluator::new(9);
        for _ in 0..20 {
            assert_eq!(a.play_out(&state).unwrap(), b.play_out(&state).unwrap());
        }
    }

    #[test]
    fn test_average_from_start_is_balanced() {
        let mut rollout = RolloutEvaluator::new(2024);
        let total: f32 = (0..400)
            .map(|_| rollout.evaluate(&State::new()).unwrap())
            .sum();
        let mean = total / 400.0;
        assert!((0.2..=0.8).contains(&mean), "mean {}", mean);
    }

    #[test]
    fn test_instant_win_short_circuit() {
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let mut rollout = RolloutEvaluator::new(0);
        let mut checked = 0;
        for _ in 0..50 {
            let mut state = State::new();
            while !state.is_over() {
                if state.has_winning_move() {
                    // The mover wins, so the last mover scores zero every time
                    for _ in 0..5 {
                        assert_eq!(rollout.evaluate(&state).unwrap(), 0.0);
                    }
                    checked += 1;
                    break;
                }
                let n = rng.gen_range(0..state.legal_move_count());
                state.apply_move(state.nth_legal_move(n).unwrap()).unwrap();
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_finished_game_scores_directly() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut state = State::new();
        while !state.is_over() {
            let n = rng.gen_range(0..state.legal_move_count());
            state.apply_move(state.nth_legal_move(n).unwrap()).unwrap();
        }
        let last_mover = state.current_player().other();
        let expected = state.winner().score_for(last_mover).unwrap();

        let mut rollout = RolloutEvaluator::new(1);
        assert_eq!(rollout.evaluate(&state).unwrap(), expected);
    }
}
