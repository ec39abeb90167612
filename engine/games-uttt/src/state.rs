//! Game state: both players' bitboards, the move constraint, the outcome and
//! the caches the rollout heuristics read.

use std::fmt;

use thiserror::Error;

use crate::bitboard::{is_draw, is_win, PlayerBitBoard, SubBoardOutcome, SMALL_BOARD_MASK};
use crate::instant_win::InstantWinTable;
use crate::player::{Player, Winner};
use crate::square::{MoveList, Square, BOARD_SIZE};

/// Reasons a move cannot be applied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("game is already over ({0})")]
    GameOver(Winner),

    #[error("square {0} is outside the grid")]
    OutOfRange(Square),

    #[error("square {0} is already occupied")]
    Occupied(Square),

    #[error("square {square} is outside the required sub-board {required}")]
    WrongBoard { square: Square, required: u8 },

    #[error("square {0} lies in a decided sub-board")]
    DecidedBoard(Square),
}

/// All nine sub-boards decided.
const ALL_BOARDS: u16 = 0x1FF;

/// Bit flips a move would cause, computed without applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePreview {
    pub square: Square,
    pub mover: Player,
    /// Outcome of the touched sub-board after the move
    pub outcome: SubBoardOutcome,
    /// Constraint for the opponent after the move (`None` = any sub-board)
    pub next_board: Option<u8>,
}

/// Compute the game outcome after `mover` settled a sub-board.
///
/// Only the mover can have completed a line. Lines are counted over the
/// sub-boards a player holds exclusively, so drawn sub-boards never help.
pub fn calculate_winner(p1_big: u16, p2_big: u16, mover: Player) -> Winner {
    let exclusive = p1_big ^ p2_big;
    let mover_big = match mover {
        Player::One => p1_big,
        Player::Two => p2_big,
    };
    if is_win(mover_big & exclusive) {
        return Winner::of(mover);
    }
    if (p1_big | p2_big) & ALL_BOARDS == ALL_BOARDS {
        let p1_count = p1_big.count_ones();
        let p2_count = p2_big.count_ones();
        return match p1_count.cmp(&p2_count) {
            std::cmp::Ordering::Greater => Winner::PlayerOne,
            std::cmp::Ordering::Less => Winner::PlayerTwo,
            std::cmp::Ordering::Equal => Winner::Draw,
        };
    }
    Winner::Ongoing
}

/// A complete game position. Plain value type: copying it is the checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    players: [PlayerBitBoard; 2],
    current_player: Player,
    current_board: Option<u8>,
    winner: Winner,
    ply: u8,
    /// Big-board cells whose capture completes a line, per player
    instant_win_boards: [u16; 2],
    /// Undecided sub-boards holding a one-move sub-board win, per player
    instant_win_small_boards: [u16; 2],
    /// Empty cells per undecided sub-board (0 once decided)
    open_squares: [u8; 9],
    total_open_squares: u8,
}

impl State {
    /// The empty starting position, Player One to move anywhere.
    pub fn new() -> Self {
        Self {
            players: [PlayerBitBoard::new(); 2],
            current_player: Player::One,
            current_board: None,
            winner: Winner::Ongoing,
            ply: 0,
            instant_win_boards: [0; 2],
            instant_win_small_boards: [0; 2],
            open_squares: [BOARD_SIZE; 9],
            total_open_squares: 81,
        }
    }

    /// Play a sequence of moves from the starting position.
    pub fn from_moves(moves: &[Square]) -> Result<Self, MoveError> {
        let mut state = Self::new();
        for &square in moves {
            state.apply_move(square)?;
        }
        Ok(state)
    }

    #[inline]
    pub fn player_board(&self, player: Player) -> &PlayerBitBoard {
        &self.players[player.index()]
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Sub-board the next move is constrained to, `None` for any.
    #[inline]
    pub fn current_board(&self) -> Option<u8> {
        self.current_board
    }

    #[inline]
    pub fn winner(&self) -> Winner {
        self.winner
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner.is_decided()
    }

    /// Number of moves played so far.
    #[inline]
    pub fn ply(&self) -> u8 {
        self.ply
    }

    #[inline]
    pub fn small_board(&self, player: Player, board: u8) -> u16 {
        self.players[player.index()].small_board(board)
    }

    /// Both players' marks in one sub-board.
    #[inline]
    pub fn combined_small_board(&self, board: u8) -> u16 {
        self.players[0].small_board(board) | self.players[1].small_board(board)
    }

    /// Sub-boards that are won or drawn.
    #[inline]
    pub fn decided_boards(&self) -> u16 {
        self.players[0].big_board | self.players[1].big_board
    }

    #[inline]
    pub fn is_board_decided(&self, board: u8) -> bool {
        self.decided_boards() & (1 << board) != 0
    }

    /// Occupied cells of both players.
    #[inline]
    pub fn occupied(&self) -> u128 {
        self.players[0].marks | self.players[1].marks
    }

    /// Whether the next move is forced into a sub-board nobody has played in.
    pub fn next_board_is_empty(&self) -> bool {
        match self.current_board {
            Some(board) => self.combined_small_board(board) == 0,
            None => false,
        }
    }

    /// Bit mask (flat index) of the legal moves.
    pub fn legal_moves_mask(&self) -> u128 {
        if self.is_over() {
            return 0;
        }
        let allowed = match self.current_board {
            Some(board) => (SMALL_BOARD_MASK as u128) << (9 * board as u32),
            None => {
                let mut mask = 0u128;
                let mut undecided = !self.decided_boards() & ALL_BOARDS;
                while undecided != 0 {
                    let board = undecided.trailing_zeros();
                    mask |= (SMALL_BOARD_MASK as u128) << (9 * board);
                    undecided &= undecided - 1;
                }
                mask
            }
        };
        allowed & !self.occupied()
    }

    /// Fill `out` with the legal moves in ascending flat-index order and
    /// return how many there are.
    pub fn fill_legal_moves(&self, out: &mut MoveList) -> usize {
        out.clear();
        let mut mask = self.legal_moves_mask();
        while mask != 0 {
            let index = mask.trailing_zeros() as u8;
            out.push(Square::from_index(index));
            mask &= mask - 1;
        }
        out.len()
    }

    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.fill_legal_moves(&mut moves);
        moves
    }

    /// Check a move against the rules without applying it.
    pub fn check_move(&self, square: Square) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver(self.winner));
        }
        if !square.is_valid() {
            return Err(MoveError::OutOfRange(square));
        }
        if self.occupied() & (1u128 << square.index()) != 0 {
            return Err(MoveError::Occupied(square));
        }
        match self.current_board {
            Some(required) if required != square.board => {
                Err(MoveError::WrongBoard { square, required })
            }
            None if self.is_board_decided(square.board) => Err(MoveError::DecidedBoard(square)),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn is_legal(&self, square: Square) -> bool {
        self.check_move(square).is_ok()
    }

    /// Apply a legal move for the current player.
    pub fn apply_move(&mut self, square: Square) -> Result<(), MoveError> {
        self.check_move(square)?;

        let mover = self.current_player;
        let [p1, p2] = &mut self.players;
        let (own, other) = match mover {
            Player::One => (p1, p2),
            Player::Two => (p2, p1),
        };
        let outcome = own.set_square_occupied(other, square);
        if outcome != SubBoardOutcome::Open {
            self.winner =
                calculate_winner(self.players[0].big_board, self.players[1].big_board, mover);
        }
        self.refresh_caches(square.board, outcome);

        self.current_player = mover.other();
        self.current_board = if self.is_board_decided(square.position) {
            None
        } else {
            Some(square.position)
        };
        self.ply += 1;
        Ok(())
    }

    /// Outcome of the game if `square` were played now. Works on a copy.
    pub fn winner_after_move(&self, square: Square) -> Result<Winner, MoveError> {
        let mut next = *self;
        next.apply_move(square)?;
        Ok(next.winner)
    }

    /// Describe what playing `square` would change.
    pub fn preview_move(&self, square: Square) -> Result<MovePreview, MoveError> {
        self.check_move(square)?;

        let mover = self.current_player;
        let own = self.small_board(mover, square.board) | (1 << square.position);
        let other = self.small_board(mover.other(), square.board);
        let outcome = if is_win(own) {
            SubBoardOutcome::Won
        } else if is_draw(own, other) {
            SubBoardOutcome::Drawn
        } else {
            SubBoardOutcome::Open
        };

        let mut decided = self.decided_boards();
        if outcome != SubBoardOutcome::Open {
            decided |= 1 << square.board;
        }
        let next_board = if decided & (1 << square.position) != 0 {
            None
        } else {
            Some(square.position)
        };

        Ok(MovePreview {
            square,
            mover,
            outcome,
            next_board,
        })
    }

    fn refresh_caches(&mut self, board: u8, outcome: SubBoardOutcome) {
        let table = InstantWinTable::global();
        let bit = 1u16 << board;

        if outcome == SubBoardOutcome::Open {
            self.open_squares[board as usize] -= 1;
            for player in [Player::One, Player::Two] {
                let own = self.small_board(player, board);
                let other = self.small_board(player.other(), board);
                let flags = &mut self.instant_win_small_boards[player.index()];
                if table.has_instant_win(own, other) {
                    *flags |= bit;
                } else {
                    *flags &= !bit;
                }
            }
        } else {
            self.open_squares[board as usize] = 0;
            let decided = self.decided_boards();
            for player in [Player::One, Player::Two] {
                let own = self.player_board(player).big_board;
                let other = self.player_board(player.other()).big_board;
                self.instant_win_small_boards[player.index()] &= !bit;
                self.instant_win_boards[player.index()] =
                    table.instant_win_positions(own & !other, decided);
            }
        }

        self.total_open_squares = self.open_squares.iter().sum();
    }

    /// Empty cells in an undecided sub-board, 0 for decided ones.
    #[inline]
    pub fn open_square_count(&self, board: u8) -> u8 {
        self.open_squares[board as usize]
    }

    #[inline]
    pub fn total_open_squares(&self) -> u8 {
        self.total_open_squares
    }

    /// Number of legal moves, read from the open-square counts.
    pub fn legal_move_count(&self) -> usize {
        if self.is_over() {
            return 0;
        }
        match self.current_board {
            Some(board) => self.open_squares[board as usize] as usize,
            None => self.total_open_squares as usize,
        }
    }

    /// The `n`-th legal move in flat-index order, located through the
    /// open-square counts.
    pub fn nth_legal_move(&self, n: usize) -> Option<Square> {
        if self.is_over() {
            return None;
        }
        let mut remaining = n;
        let boards = match self.current_board {
            Some(board) => board..board + 1,
            None => 0..BOARD_SIZE,
        };
        for board in boards {
            let open = self.open_squares[board as usize] as usize;
            if remaining >= open {
                remaining -= open;
                continue;
            }
            let mut empty = !self.combined_small_board(board) & SMALL_BOARD_MASK;
            for _ in 0..remaining {
                empty &= empty - 1;
            }
            return Some(Square::new(board, empty.trailing_zeros() as u8));
        }
        None
    }

    /// Whether the player to move can win the game with a single move.
    pub fn has_winning_move(&self) -> bool {
        if self.is_over() {
            return false;
        }
        let player = self.current_player.index();
        let boards = self.instant_win_boards[player] & self.instant_win_small_boards[player];
        match self.current_board {
            Some(board) => boards & (1 << board) != 0,
            None => boards != 0,
        }
    }

    /// A move that wins the game on the spot, if the caches report one.
    pub fn winning_move(&self) -> Option<Square> {
        if !self.has_winning_move() {
            return None;
        }
        let table = InstantWinTable::global();
        let mover = self.current_player;
        let player = mover.index();
        let mut boards = self.instant_win_boards[player] & self.instant_win_small_boards[player];
        if let Some(board) = self.current_board {
            boards &= 1 << board;
        }
        let board = boards.trailing_zeros() as u8;
        let cells = table.instant_win_positions(
            self.small_board(mover, board),
            self.small_board(mover.other(), board),
        );
        Some(Square::new(board, cells.trailing_zeros() as u8))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9u8 {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..9u8 {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                let square = Square::from_row_col(row, col);
                let cell = if self.players[0].is_occupied(square) {
                    'X'
                } else if self.players[1].is_occupied(square) {
                    'O'
                } else {
                    '.'
                };
                write!(f, "{}", cell)?;
                if col < 8 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(
            f,
            "ply {} | {} to move | board {} | {}",
            self.ply,
            self.current_player,
            self.current_board
                .map_or_else(|| "any".to_string(), |b| b.to_string()),
            self.winner
        )
    }
}
