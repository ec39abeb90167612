//! Precomputed "one move from a line" lookup.
//!
//! For every 9-bit occupancy pattern the table stores the cells that would
//! complete a line if marked next. The same table serves sub-boards (cells)
//! and the big board (sub-boards), since both are 3×3 grids.

use once_cell::sync::Lazy;

use crate::bitboard::LINES;

/// Pairs of cells that, when held, leave exactly one cell open on a line,
/// grouped by line (three pairs per line, in `LINES` order).
const TWO_CELL_MASKS: [u16; 24] = [
    0x003, 0x005, 0x006, //
    0x018, 0x028, 0x030, //
    0x0C0, 0x140, 0x180, //
    0x009, 0x041, 0x048, //
    0x012, 0x082, 0x090, //
    0x024, 0x104, 0x120, //
    0x011, 0x101, 0x110, //
    0x014, 0x044, 0x050,
];

/// The cell that completes the line for the matching entry of `TWO_CELL_MASKS`.
const COMPLETING_CELL: [u8; 24] = [
    2, 1, 0, //
    5, 4, 3, //
    8, 7, 6, //
    6, 3, 0, //
    7, 4, 1, //
    8, 5, 2, //
    8, 4, 0, //
    6, 4, 2,
];

static TABLE: Lazy<InstantWinTable> = Lazy::new(InstantWinTable::build);

/// Immutable, process-wide lookup table of instant-win cells.
#[derive(Debug, Clone)]
pub struct InstantWinTable {
    entries: [u16; 512],
}

impl InstantWinTable {
    /// The shared table, built on first use.
    pub fn global() -> &'static InstantWinTable {
        &TABLE
    }

    fn build() -> Self {
        let mut entries = [0u16; 512];
        for (pattern, entry) in entries.iter_mut().enumerate() {
            *entry = Self::completing_cells(pattern as u16);
        }
        Self { entries }
    }

    fn completing_cells(pattern: u16) -> u16 {
        let mut result = 0;
        for i in 0..TWO_CELL_MASKS.len() {
            let pair = TWO_CELL_MASKS[i];
            let line = LINES[i / 3];
            if pattern & pair == pair && pattern & line != line {
                result |= 1 << COMPLETING_CELL[i];
            }
        }
        result
    }

    /// Raw table entry for a 9-bit pattern.
    #[inline]
    pub fn lookup(&self, pattern: u16) -> u16 {
        self.entries[(pattern & 0x1FF) as usize]
    }

    /// Cells completing a line for `own`, excluding cells the opponent holds.
    #[inline]
    pub fn instant_win_positions(&self, own: u16, opponent: u16) -> u16 {
        self.lookup(own) & !opponent & 0x1FF
    }

    #[inline]
    pub fn has_instant_win(&self, own: u16, opponent: u16) -> bool {
        self.instant_win_positions(own, opponent) != 0
    }
}
