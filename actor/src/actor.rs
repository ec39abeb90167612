//! Match runner: two long-lived engines playing each other.
//!
//! Each engine keeps its own board and tree for the whole match. Every move,
//! whoever found it, is committed to both engines so their trees follow the
//! game.

use anyhow::{Context, Result};
use engine_config::EvaluatorKind;
use games_uttt::{Player, Square};
use mcts::{Evaluator, MctsSearch, RolloutEvaluator, ValueNetwork};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::stats::{MatchRecord, MatchStats, SearchTotals};

type Engine = MctsSearch<Box<dyn Evaluator>>;

pub struct Actor {
    config: Config,
    opening: Vec<Square>,
    /// Engine A and engine B, reset between matches
    engines: [Engine; 2],
    stats: MatchStats,
}

impl Actor {
    pub fn new(config: Config) -> Result<Self> {
        let opening = config.opening_moves()?;
        let engines = [
            build_engine(&config, 0, Player::One)?,
            build_engine(&config, 1, Player::Two)?,
        ];
        info!(
            games = config.games,
            evaluator = %config.evaluator,
            time_budget_ms = config.time_budget_ms,
            first_turn_budget_ms = config.first_turn_budget_ms,
            node_pool_mib = config.node_pool_mib,
            opening_moves = opening.len(),
            "Match runner initialized"
        );
        Ok(Self {
            config,
            opening,
            engines,
            stats: MatchStats::new(),
        })
    }

    /// Play every configured match and return the totals.
    pub fn run(&mut self) -> Result<&MatchStats> {
        for index in 0..self.config.games {
            let record = self.play_match(index)?;
            self.stats.record(&record);
        }
        self.stats.log_summary();
        Ok(&self.stats)
    }

    /// Play one match. Engine A takes X in even matches and O in odd ones.
    pub fn play_match(&mut self, index: u32) -> Result<MatchRecord> {
        let a_side = if index % 2 == 0 {
            Player::One
        } else {
            Player::Two
        };
        let engines = &mut self.engines;
        for (engine, side) in engines.iter_mut().zip([a_side, a_side.other()]) {
            engine
                .reset(side)
                .with_context(|| format!("game {}: failed to reset engine", index))?;
        }
        let start = Instant::now();
        info!(game = index, a_side = %a_side, "Match started");

        for &square in &self.opening {
            for engine in engines.iter_mut() {
                engine
                    .commit_move(square)
                    .with_context(|| format!("game {}: opening move {}", index, square))?;
            }
        }

        let mut first_turn = [true, true];
        let mut totals = SearchTotals::default();
        loop {
            let board = engines[0].board();
            if board.winner().is_decided() {
                break;
            }
            let ply = board.ply();
            let mover = board.state().current_player();
            let slot = usize::from(mover != a_side);

            let budget = self.config.turn_budget(first_turn[slot]);
            first_turn[slot] = false;
            let result = engines[slot]
                .run(budget)
                .with_context(|| format!("game {}: search at ply {}", index, ply))?;
            totals.add(&result.stats);

            for engine in engines.iter_mut() {
                engine
                    .commit_move(result.best_move)
                    .with_context(|| format!("game {}: move {}", index, result.best_move))?;
            }

            if self.config.log_moves {
                info!(
                    game = index,
                    ply,
                    player = %mover,
                    square = %result.best_move,
                    eval = format!("{:.3}", result.eval),
                    iterations = result.iterations,
                    "Move"
                );
            } else {
                debug!(
                    game = index,
                    ply,
                    player = %mover,
                    square = %result.best_move,
                    eval = result.eval,
                    iterations = result.iterations,
                    "Move"
                );
            }
        }

        let board = engines[0].board();
        let record = MatchRecord {
            index,
            a_side,
            winner: board.winner(),
            plies: board.ply(),
            totals,
        };
        info!(
            game = index,
            result = %record.winner,
            plies = record.plies,
            searches = record.totals.searches,
            duration_secs = format!("{:.2}", start.elapsed().as_secs_f64()),
            "Match finished"
        );
        debug!("Final position:\n{}", board.state());
        Ok(record)
    }
}

fn build_engine(config: &Config, slot: u64, side: Player) -> Result<Engine> {
    let evaluator: Box<dyn Evaluator> = match config.evaluator {
        EvaluatorKind::Network => Box::new(ValueNetwork::new(
            config.hidden_size,
            config.weight_seed,
        )),
        EvaluatorKind::Rollout => Box::new(RolloutEvaluator::new(config.seed.wrapping_add(slot))),
    };
    MctsSearch::new(evaluator, config.mcts_config(side))
        .with_context(|| format!("failed to create engine {}", slot))
}
