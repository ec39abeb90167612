//! Per-player occupancy bitboards.
//!
//! Each player owns an 81-bit `marks` set (bit `9 * board + position`) and a
//! 9-bit `big_board` of the sub-boards they hold. A drawn sub-board is held by
//! both players; lines on the big board are only counted over the cells one
//! player holds exclusively.

use crate::square::Square;

/// Mask of the nine cells of one sub-board.
pub const SMALL_BOARD_MASK: u16 = 0x1FF;

/// The eight winning lines of a 3×3 board as 9-bit masks.
pub const LINES: [u16; 8] = [
    0x007, 0x038, 0x1C0, // rows
    0x049, 0x092, 0x124, // columns
    0x111, 0x054, // diagonals
];

/// Whether a 9-bit pattern contains a complete line.
#[inline]
pub fn is_win(pattern: u16) -> bool {
    LINES.iter().any(|&line| pattern & line == line)
}

/// Whether a sub-board is full without either side holding a line.
#[inline]
pub fn is_draw(own: u16, other: u16) -> bool {
    (own | other) & SMALL_BOARD_MASK == SMALL_BOARD_MASK && !is_win(own) && !is_win(other)
}

/// Outcome of a single sub-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubBoardOutcome {
    Open,
    Won,
    Drawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerBitBoard {
    pub marks: u128,
    pub big_board: u16,
}

impl PlayerBitBoard {
    pub const fn new() -> Self {
        Self {
            marks: 0,
            big_board: 0,
        }
    }

    /// The 9-bit slice of marks for one sub-board.
    #[inline]
    pub fn small_board(&self, board: u8) -> u16 {
        ((self.marks >> (9 * board as u32)) as u16) & SMALL_BOARD_MASK
    }

    #[inline]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.marks & (1u128 << square.index()) != 0
    }

    #[inline]
    pub fn holds_board(&self, board: u8) -> bool {
        self.big_board & (1 << board) != 0
    }

    /// Mark `square` and settle its sub-board. Returns the outcome of the
    /// sub-board after the mark; on `Won` this player takes the sub-board, on
    /// `Drawn` both players do.
    pub fn set_square_occupied(
        &mut self,
        other: &mut PlayerBitBoard,
        square: Square,
    ) -> SubBoardOutcome {
        self.marks |= 1u128 << square.index();
        let own = self.small_board(square.board);
        if is_win(own) {
            self.big_board |= 1 << square.board;
            SubBoardOutcome::Won
        } else if is_draw(own, other.small_board(square.board)) {
            self.big_board |= 1 << square.board;
            other.big_board |= 1 << square.board;
            SubBoardOutcome::Drawn
        } else {
            SubBoardOutcome::Open
        }
    }
}
