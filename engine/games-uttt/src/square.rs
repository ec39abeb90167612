//! Cell addressing on the 9×9 grid.
//!
//! A [`Square`] names a cell by the sub-board it lives in and its position
//! inside that sub-board, both numbered row-major `0..9`:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```
//!
//! The flat index `9 * board + position` is the bit offset used by the
//! occupancy masks.

use std::fmt;

/// Number of sub-boards, and of cells per sub-board.
pub const BOARD_SIZE: u8 = 9;

/// Total number of cells on the grid.
pub const TOTAL_SQUARES: usize = 81;

/// A cell on the grid: `(sub-board, position inside the sub-board)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Square {
    pub board: u8,
    pub position: u8,
}

impl Square {
    /// The center cell of the center sub-board.
    pub const CENTER: Square = Square::new(4, 4);

    pub const fn new(board: u8, position: u8) -> Self {
        Self { board, position }
    }

    /// Build a square from its flat index (`0..81`).
    pub const fn from_index(index: u8) -> Self {
        Self {
            board: index / BOARD_SIZE,
            position: index % BOARD_SIZE,
        }
    }

    /// Flat index `9 * board + position`.
    #[inline]
    pub const fn index(self) -> u8 {
        self.board * BOARD_SIZE + self.position
    }

    /// Whether both coordinates are inside `0..9`.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.board < BOARD_SIZE && self.position < BOARD_SIZE
    }

    /// Convert from game notation (row and column on the 9×9 grid).
    pub const fn from_row_col(row: u8, col: u8) -> Self {
        Self {
            board: 3 * (row / 3) + col / 3,
            position: 3 * (row % 3) + col % 3,
        }
    }

    /// Convert to game notation `(row, col)` on the 9×9 grid.
    pub const fn to_row_col(self) -> (u8, u8) {
        let row = 3 * (self.board / 3) + self.position / 3;
        let col = 3 * (self.board % 3) + self.position % 3;
        (row, col)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.board, self.position)
    }
}

/// Fixed-capacity buffer of moves, large enough for every cell on the grid.
#[derive(Clone, Copy)]
pub struct MoveList {
    moves: [Square; TOTAL_SQUARES],
    len: u8,
}

impl MoveList {
    pub const fn new() -> Self {
        Self {
            moves: [Square::new(0, 0); TOTAL_SQUARES],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append a move. Silently ignored once all 81 slots are used, which
    /// cannot happen for moves produced by the rules.
    #[inline]
    pub fn push(&mut self, square: Square) {
        if (self.len as usize) < TOTAL_SQUARES {
            self.moves[self.len as usize] = square;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.moves[..self.len as usize]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Square> {
        self.as_slice().iter()
    }

    pub fn contains(&self, square: Square) -> bool {
        self.as_slice().contains(&square)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl PartialEq for MoveList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for MoveList {}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Square;
    type IntoIter = std::slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
