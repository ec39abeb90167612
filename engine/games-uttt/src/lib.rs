//! Ultimate tic-tac-toe rules for the search engine.
//!
//! The grid is nine 3×3 sub-boards arranged in a 3×3 grid. The cell a player
//! marks inside a sub-board sends the opponent to the sub-board with the same
//! index; if that sub-board is already decided the opponent may play in any
//! undecided one. Winning three sub-boards in a line wins the game; when all
//! nine are decided without a line, the player holding more sub-boards wins.
//!
//! # Usage
//!
//! ```rust
//! use games_uttt::{BoardState, Square, Winner};
//!
//! let mut board = BoardState::new();
//! assert_eq!(board.legal_moves().len(), 81);
//!
//! board.apply_permanent(Square::new(4, 4)).unwrap();
//! assert_eq!(board.legal_moves().len(), 8);
//! assert_eq!(board.winner(), Winner::Ongoing);
//! ```
//!
//! # Layout
//!
//! - [`State`]: `Copy` value holding both [`PlayerBitBoard`]s, the move
//!   constraint, the outcome and the rollout caches
//! - [`BoardState`]: the live state plus one checkpoint
//! - [`InstantWinTable`]: 512-entry lookup of cells completing a line

pub mod bitboard;
pub mod board;
pub mod instant_win;
pub mod player;
pub mod square;
pub mod state;

pub use bitboard::{is_draw, is_win, PlayerBitBoard, SubBoardOutcome, LINES, SMALL_BOARD_MASK};
pub use board::BoardState;
pub use instant_win::InstantWinTable;
pub use player::{Player, Winner};
pub use square::{MoveList, Square, BOARD_SIZE, TOTAL_SQUARES};
pub use state::{calculate_winner, MoveError, MovePreview, State};
