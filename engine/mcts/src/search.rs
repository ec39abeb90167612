//! MCTS search implementation.
//!
//! Each iteration is one playthrough:
//! 1. Selection: walk down by UCT while nodes have been simulated
//! 2. Expansion: discover the leaf's children and step into one of them
//! 3. Evaluation: a decided game scores 1 / 0 / 0.5, otherwise the child
//!    keeps the evaluator's estimate from discovery
//! 4. Backpropagation: negamax update along the path
//! 5. Revert the board to the committed position
//!
//! The tree and the board survive between turns: committed moves re-root
//! the tree instead of rebuilding it.

use std::time::{Duration, Instant};

use games_uttt::{BoardState, MoveError, MoveList, Player, Square, State, Winner};
use thiserror::Error;
use tracing::{debug, trace};

use crate::arena::ArenaError;
use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Move error: {0}")]
    Move(#[from] MoveError),

    #[error("Arena error: {0}")]
    Arena(#[from] ArenaError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Node {0:?} has no children to select from")]
    NoChildren(NodeId),

    #[error("Game is already over ({0})")]
    GameOver(Winner),

    #[error("Illegal move {square}: {reason}")]
    IllegalMove { square: Square, reason: MoveError },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Counters collected over one search call.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub iterations: u64,
    /// Arena nodes handed out during the search
    pub nodes_allocated: usize,
    /// Playthroughs that ended in a decided game
    pub terminal_hits: u64,
    /// Expansions that produced a single forced child
    pub forced_expansions: u64,
    pub pruned_candidates: u64,
    /// Positions handed to the evaluator
    pub evaluator_calls: u64,
    pub elapsed: Duration,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Most promising move from the committed position
    pub best_move: Square,

    /// Win probability of the side to move after playing `best_move`
    pub eval: f32,

    /// Number of playthroughs performed
    pub iterations: u64,

    pub stats: SearchStats,
}

/// Long-lived search state for one side of a match.
pub struct MctsSearch<E: Evaluator> {
    board: BoardState,
    tree: MctsTree,
    evaluator: E,
    config: MctsConfig,

    // Expansion scratch buffers
    moves: MoveList,
    children: Vec<(Square, f32)>,
    to_evaluate: Vec<Square>,
    pending: Vec<usize>,
    evals: Vec<f32>,
}

impl<E: Evaluator> MctsSearch<E> {
    /// Create a search from the empty starting position.
    pub fn new(evaluator: E, config: MctsConfig) -> Result<Self, SearchError> {
        Self::from_state(evaluator, config, State::new())
    }

    /// Create a search from an arbitrary committed position.
    pub fn from_state(
        evaluator: E,
        config: MctsConfig,
        state: State,
    ) -> Result<Self, SearchError> {
        let tree = MctsTree::new(config.node_capacity)?;
        Ok(Self {
            board: BoardState::from_state(state),
            tree,
            evaluator,
            config,
            moves: MoveList::new(),
            children: Vec::with_capacity(81),
            to_evaluate: Vec::with_capacity(81),
            pending: Vec::with_capacity(81),
            evals: Vec::with_capacity(81),
        })
    }

    /// Search until `budget` has elapsed.
    ///
    /// The clock is read every `check_interval` iterations, so the call never
    /// returns before the budget and may overshoot by up to one interval.
    pub fn run(&mut self, budget: Duration) -> Result<SearchResult, SearchError> {
        self.ensure_ongoing()?;
        let start = Instant::now();
        let nodes_before = self.tree.len();
        let interval = u64::from(self.config.check_interval.max(1));
        let mut stats = SearchStats::default();

        let mut count = 0u64;
        loop {
            count += 1;
            if count % interval == 0 && start.elapsed() >= budget {
                break;
            }
            self.iterate(&mut stats)?;
        }

        self.finish(stats, start, nodes_before)
    }

    /// Run an exact number of iterations.
    pub fn run_iterations(&mut self, iterations: u64) -> Result<SearchResult, SearchError> {
        self.ensure_ongoing()?;
        let start = Instant::now();
        let nodes_before = self.tree.len();
        let mut stats = SearchStats::default();

        for _ in 0..iterations {
            self.iterate(&mut stats)?;
        }

        self.finish(stats, start, nodes_before)
    }

    /// Most promising move from the root by `eval + log2(sims)`.
    pub fn best_move(&self) -> Result<Square, SearchError> {
        self.tree
            .best_move()
            .map(|(square, _)| square)
            .ok_or(SearchError::NoChildren(self.tree.root()))
    }

    /// Commit a real move (ours or the opponent's) and re-root the tree.
    ///
    /// An illegal move is a protocol violation and leaves everything as it
    /// was.
    pub fn commit_move(&mut self, square: Square) -> Result<(), SearchError> {
        self.board.revert();
        self.board
            .state()
            .check_move(square)
            .map_err(|reason| SearchError::IllegalMove { square, reason })?;

        let reused = self.tree.update_root(square)?;
        self.board.apply_permanent(square)?;

        debug!(
            square = %square,
            reused,
            ply = self.board.ply(),
            root = self.tree.root().0,
            "Root updated"
        );
        Ok(())
    }

    /// Start a new match playing `me`: empty board, empty arena.
    pub fn reset(&mut self, me: Player) -> Result<(), SearchError> {
        self.tree.clear()?;
        self.board.clear();
        self.config.me = me;
        Ok(())
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    fn ensure_ongoing(&self) -> Result<(), SearchError> {
        match self.board.checkpoint_state().winner() {
            Winner::Ongoing => Ok(()),
            winner => Err(SearchError::GameOver(winner)),
        }
    }

    /// One playthrough; the board is back at the checkpoint afterwards,
    /// whether it succeeded or not.
    fn iterate(&mut self, stats: &mut SearchStats) -> Result<(), SearchError> {
        let outcome = self.playout(stats);
        self.board.revert();
        outcome?;
        stats.iterations += 1;
        Ok(())
    }

    fn finish(
        &self,
        mut stats: SearchStats,
        start: Instant,
        nodes_before: usize,
    ) -> Result<SearchResult, SearchError> {
        stats.elapsed = start.elapsed();
        stats.nodes_allocated = self.tree.len() - nodes_before;

        let (best_move, best) = self
            .tree
            .best_move()
            .ok_or(SearchError::NoChildren(self.tree.root()))?;
        let eval = self.tree.get(best).eval;

        debug!(
            iterations = stats.iterations,
            nodes = stats.nodes_allocated,
            terminal_hits = stats.terminal_hits,
            pruned = stats.pruned_candidates,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            best_move = %best_move,
            eval,
            "Search finished"
        );

        Ok(SearchResult {
            best_move,
            eval,
            iterations: stats.iterations,
            stats,
        })
    }

    fn playout(&mut self, stats: &mut SearchStats) -> Result<(), SearchError> {
        // Selection
        let mut node = self.tree.root();
        while !self.tree.get(node).is_leaf() && !self.board.winner().is_decided() {
            node = self.select_child(node)?;
            self.visit(node)?;
        }

        // Expansion
        if !self.board.winner().is_decided() {
            if !self.tree.get(node).is_discovered() {
                self.discover_children(node, stats)?;
            }
            node = self.select_child(node)?;
            self.visit(node)?;
        }

        // Evaluation: a fresh child already holds its estimate
        let winner = self.board.winner();
        if winner.is_decided() {
            let last_mover = self.board.state().current_player().other();
            self.tree.get_mut(node).eval = terminal_eval(winner, last_mover)?;
            stats.terminal_hits += 1;
        }

        self.tree.backpropagate(node);

        trace!(
            node = node.0,
            ply = self.board.ply(),
            winner = %winner,
            "MCTS playout complete"
        );
        Ok(())
    }

    fn select_child(&self, node: NodeId) -> Result<NodeId, SearchError> {
        self.tree
            .select_child(
                node,
                self.config.exploration,
                self.config.first_play_urgency,
            )
            .ok_or(SearchError::NoChildren(node))
    }

    /// Apply the node's move to the live board.
    fn visit(&mut self, node: NodeId) -> Result<(), SearchError> {
        let square = self
            .tree
            .get(node)
            .square
            .ok_or_else(|| SearchError::InvalidState(format!("node {} carries no move", node.0)))?;
        self.board.apply_move(square)?;
        Ok(())
    }

    fn discover_children(
        &mut self,
        node: NodeId,
        stats: &mut SearchStats,
    ) -> Result<(), SearchError> {
        let state = *self.board.state();
        state.fill_legal_moves(&mut self.moves);
        self.children.clear();

        if let Some(square) = self.forced_move(&state)? {
            let mut child = state;
            child.apply_move(square)?;
            let eval = self.evaluator.evaluate(&child)?;
            stats.evaluator_calls += 1;
            stats.forced_expansions += 1;
            self.children.push((square, eval));
        } else {
            self.collect_candidates(&state, stats)?;
        }

        self.tree.add_children(node, &self.children)?;
        Ok(())
    }

    /// Situations with a known answer get a single child.
    fn forced_move(&self, state: &State) -> Result<Option<Square>, SearchError> {
        let ply = state.ply();

        // Answer a move into an empty sub-board by sending the opponent back
        if ply <= self.config.send_to_self_max_ply && state.next_board_is_empty() {
            if let Some(board) = state.current_board() {
                return Ok(Some(Square::new(board, board)));
            }
        }

        if ply == 0 && state.current_player() == self.config.me {
            return Ok(Some(Square::CENTER));
        }

        if ply > self.config.late_game_ply {
            let win = Winner::of(state.current_player());
            for &square in self.moves.iter() {
                if state.winner_after_move(square)? == win {
                    return Ok(Some(square));
                }
            }
        }

        Ok(None)
    }

    /// Filter the legal moves into `children` and evaluate the survivors.
    ///
    /// A candidate is only pruned while more than one candidate is left,
    /// counting those not examined yet, so at least one child always remains.
    fn collect_candidates(
        &mut self,
        state: &State,
        stats: &mut SearchStats,
    ) -> Result<(), SearchError> {
        let opponent_win = Winner::of(state.current_player().other());
        let late_game = state.ply() > self.config.late_game_ply;
        let decided = state.decided_boards();
        let mut remaining = self.moves.len();

        self.to_evaluate.clear();
        self.pending.clear();
        for &square in self.moves.iter() {
            let fixed_eval = if late_game {
                match state.winner_after_move(square)? {
                    Winner::Draw => Some(0.5),
                    winner if winner == opponent_win && remaining > 1 => {
                        remaining -= 1;
                        stats.pruned_candidates += 1;
                        continue;
                    }
                    _ => None,
                }
            } else {
                // Sending the opponent to a decided sub-board frees their move
                if decided & (1 << square.position) != 0 && remaining > 1 {
                    remaining -= 1;
                    stats.pruned_candidates += 1;
                    continue;
                }
                None
            };

            match fixed_eval {
                Some(eval) => self.children.push((square, eval)),
                None => {
                    self.pending.push(self.children.len());
                    self.to_evaluate.push(square);
                    self.children.push((square, 0.0));
                }
            }
        }

        if self.to_evaluate.is_empty() {
            return Ok(());
        }
        self.evaluator
            .evaluate_children(state, &self.to_evaluate, &mut self.evals)?;
        if self.evals.len() != self.to_evaluate.len() {
            return Err(SearchError::InvalidState(format!(
                "evaluator returned {} values for {} moves",
                self.evals.len(),
                self.to_evaluate.len()
            )));
        }
        stats.evaluator_calls += self.evals.len() as u64;

        for (&index, &eval) in self.pending.iter().zip(&self.evals) {
            self.children[index].1 = eval;
        }
        Ok(())
    }
}

/// Score of a finished game for the player who made the last move.
fn terminal_eval(winner: Winner, last_mover: Player) -> Result<f32, SearchError> {
    winner.score_for(last_mover).ok_or_else(|| {
        SearchError::InvalidState(format!("cannot score an undecided game ({})", winner))
    })
}
