//! Live position plus a single checkpoint.
//!
//! Search applies temporary moves to the live state and restores the
//! checkpoint (the last committed position) after every playthrough. Only one
//! checkpoint level exists: restore before checkpointing again.

use crate::player::Winner;
use crate::square::{MoveList, Square};
use crate::state::{MoveError, State};

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    state: State,
    checkpoint: State,
}

impl BoardState {
    pub fn new() -> Self {
        Self::from_state(State::new())
    }

    /// Start from an arbitrary position; the checkpoint is set to it.
    pub fn from_state(state: State) -> Self {
        Self {
            state,
            checkpoint: state,
        }
    }

    /// The live (possibly temporary) position.
    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// The last committed position.
    #[inline]
    pub fn checkpoint_state(&self) -> &State {
        &self.checkpoint
    }

    #[inline]
    pub fn winner(&self) -> Winner {
        self.state.winner()
    }

    #[inline]
    pub fn ply(&self) -> u8 {
        self.state.ply()
    }

    /// Apply a move to the live state only.
    #[inline]
    pub fn apply_move(&mut self, square: Square) -> Result<(), MoveError> {
        self.state.apply_move(square)
    }

    /// Apply a move and make the result the new checkpoint.
    pub fn apply_permanent(&mut self, square: Square) -> Result<(), MoveError> {
        self.state.apply_move(square)?;
        self.update_checkpoint();
        Ok(())
    }

    #[inline]
    pub fn update_checkpoint(&mut self) {
        self.checkpoint = self.state;
    }

    /// Restore the live state to the checkpoint.
    #[inline]
    pub fn revert(&mut self) {
        self.state = self.checkpoint;
    }

    /// Look one move ahead without touching the live state or the checkpoint.
    #[inline]
    pub fn winner_after_move(&self, square: Square) -> Result<Winner, MoveError> {
        self.state.winner_after_move(square)
    }

    #[inline]
    pub fn fill_legal_moves(&self, out: &mut MoveList) -> usize {
        self.state.fill_legal_moves(out)
    }

    #[inline]
    pub fn legal_moves(&self) -> MoveList {
        self.state.legal_moves()
    }

    /// Back to the empty starting position.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
