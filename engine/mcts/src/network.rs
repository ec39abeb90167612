//! Value network over sparse board features.
//!
//! One hidden layer of `i32` accumulators fed by `i16` weight rows, a clipped
//! ReLU, and a linear output clamped to `[0, 1]`. Features are seen from the
//! side to move; the output is the win probability of the player who just
//! moved, which is the perspective node evals use.
//!
//! Sibling evaluation is incremental: the parent's features are accumulated
//! once and each move only adds the rows it switches on. Accumulation is
//! integer arithmetic, so both paths produce identical values.
//!
//! Feature layout (198 inputs):
//!
//! | Range     | Feature                       |
//! |-----------|-------------------------------|
//! | 0..9      | sub-boards held by own side   |
//! | 9..90     | own marks (flat square index) |
//! | 90..99    | sub-boards held by opponent   |
//! | 99..180   | opponent marks                |
//! | 180..190  | move constraint, 189 = any    |

use games_uttt::{PlayerBitBoard, Square, State, SubBoardOutcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::evaluator::{Evaluator, EvaluatorError};

pub const INPUT_SIZE: usize = 198;

/// Widest hidden layer a network may be built with.
pub const MAX_HIDDEN_SIZE: usize = 4096;

const OWN_BIG: usize = 0;
const OWN_MARKS: usize = 9;
const OPP_BIG: usize = 90;
const OPP_MARKS: usize = 99;
const CONSTRAINT: usize = 180;
const ANY_BOARD: usize = 9;

/// Clipped ReLU ceiling.
const ACTIVATION_MAX: i32 = 127;

/// Divisor taking the integer output to probability units.
const OUTPUT_SCALE: f32 = (ACTIVATION_MAX * 64 * 8) as f32;

/// Collect the active feature indices of `state`.
pub fn active_features(state: &State, out: &mut Vec<usize>) {
    out.clear();
    let own = state.current_player();
    push_player(state.player_board(own), OWN_BIG, OWN_MARKS, out);
    push_player(state.player_board(own.other()), OPP_BIG, OPP_MARKS, out);
    out.push(constraint_feature(state.current_board()));
}

fn push_player(
    board: &PlayerBitBoard,
    big_offset: usize,
    marks_offset: usize,
    out: &mut Vec<usize>,
) {
    for_each_feature(board, big_offset, marks_offset, |feature| out.push(feature));
}

/// Visit the big-board and mark features of one player.
fn for_each_feature(
    board: &PlayerBitBoard,
    big_offset: usize,
    marks_offset: usize,
    mut visit: impl FnMut(usize),
) {
    let mut big = board.big_board;
    while big != 0 {
        visit(big_offset + big.trailing_zeros() as usize);
        big &= big - 1;
    }
    let mut marks = board.marks;
    while marks != 0 {
        visit(marks_offset + marks.trailing_zeros() as usize);
        marks &= marks - 1;
    }
}

#[inline]
fn constraint_feature(board: Option<u8>) -> usize {
    CONSTRAINT + board.map_or(ANY_BOARD, usize::from)
}

#[derive(Debug, Clone)]
struct Weights {
    hidden_size: usize,
    /// `INPUT_SIZE` rows of `hidden_size`
    hidden: Vec<i16>,
    hidden_bias: Vec<i16>,
    output: Vec<i16>,
    output_bias: i32,
}

impl Weights {
    fn random(hidden_size: usize, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let hidden = (0..INPUT_SIZE * hidden_size)
            .map(|_| rng.gen_range(-32..=32))
            .collect();
        let hidden_bias = (0..hidden_size).map(|_| rng.gen_range(-16..=16)).collect();
        let output = (0..hidden_size).map(|_| rng.gen_range(-64..=64)).collect();
        let output_bias = rng.gen_range(-512..=512);
        Self {
            hidden_size,
            hidden,
            hidden_bias,
            output,
            output_bias,
        }
    }

    fn load_bias(&self, acc: &mut [i32]) {
        for (a, &b) in acc.iter_mut().zip(&self.hidden_bias) {
            *a = b as i32;
        }
    }

    #[inline]
    fn add_feature(&self, feature: usize, acc: &mut [i32]) {
        let row = &self.hidden[feature * self.hidden_size..(feature + 1) * self.hidden_size];
        for (a, &w) in acc.iter_mut().zip(row) {
            *a += w as i32;
        }
    }

    fn add_player(
        &self,
        board: &PlayerBitBoard,
        big_offset: usize,
        marks_offset: usize,
        acc: &mut [i32],
    ) {
        for_each_feature(board, big_offset, marks_offset, |feature| {
            self.add_feature(feature, acc)
        });
    }

    fn forward(&self, acc: &[i32]) -> f32 {
        let sum: i64 = acc
            .iter()
            .zip(&self.output)
            .map(|(&a, &w)| i64::from(a.clamp(0, ACTIVATION_MAX)) * i64::from(w))
            .sum::<i64>()
            + i64::from(self.output_bias * ACTIVATION_MAX);
        (sum as f32 / OUTPUT_SCALE + 0.5).clamp(0.0, 1.0)
    }
}

/// Seeded value network with reusable accumulator buffers.
#[derive(Debug, Clone)]
pub struct ValueNetwork {
    weights: Weights,
    /// Shared parent accumulator for sibling evaluation
    base: Vec<i32>,
    scratch: Vec<i32>,
}

impl ValueNetwork {
    /// Build a network whose weights are derived from `seed`.
    pub fn new(hidden_size: usize, seed: u64) -> Self {
        Self {
            weights: Weights::random(hidden_size, seed),
            base: vec![0; hidden_size],
            scratch: vec![0; hidden_size],
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.weights.hidden_size
    }
}

impl Evaluator for ValueNetwork {
    fn evaluate(&mut self, state: &State) -> Result<f32, EvaluatorError> {
        let own = state.current_player();
        let acc = &mut self.scratch;
        self.weights.load_bias(acc);
        self.weights
            .add_player(state.player_board(own), OWN_BIG, OWN_MARKS, acc);
        self.weights
            .add_player(state.player_board(own.other()), OPP_BIG, OPP_MARKS, acc);
        self.weights
            .add_feature(constraint_feature(state.current_board()), acc);
        Ok(self.weights.forward(acc))
    }

    fn evaluate_children(
        &mut self,
        parent: &State,
        moves: &[Square],
        out: &mut Vec<f32>,
    ) -> Result<(), EvaluatorError> {
        out.clear();
        if moves.is_empty() {
            return Ok(());
        }

        // Children are seen from the mover's opponent, the side to move there
        let mover = parent.current_player();
        let base = &mut self.base;
        self.weights.load_bias(base);
        self.weights
            .add_player(parent.player_board(mover.other()), OWN_BIG, OWN_MARKS, base);
        self.weights
            .add_player(parent.player_board(mover), OPP_BIG, OPP_MARKS, base);

        for &square in moves {
            let preview = parent
                .preview_move(square)
                .map_err(|e| EvaluatorError::InvalidState(e.to_string()))?;

            let acc = &mut self.scratch;
            acc.copy_from_slice(&self.base);
            self.weights.add_feature(OPP_MARKS + square.index() as usize, acc);
            let board = square.board as usize;
            match preview.outcome {
                SubBoardOutcome::Open => {}
                SubBoardOutcome::Won => self.weights.add_feature(OPP_BIG + board, acc),
                SubBoardOutcome::Drawn => {
                    self.weights.add_feature(OWN_BIG + board, acc);
                    self.weights.add_feature(OPP_BIG + board, acc);
                }
            }
            self.weights
                .add_feature(constraint_feature(preview.next_board), acc);
            out.push(self.weights.forward(acc));
        }
        Ok(())
    }
}
