//! Configuration for the match driver
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig, EvaluatorKind};
use games_uttt::{Player, Square};
use mcts::{MctsConfig, MAX_HIDDEN_SIZE};
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}
fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}
fn default_games() -> u32 {
    CENTRAL_CONFIG.matches.games
}
fn default_log_moves() -> bool {
    CENTRAL_CONFIG.matches.log_moves
}
fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.search.time_budget_ms
}
fn default_first_turn_budget_ms() -> u64 {
    CENTRAL_CONFIG.search.first_turn_budget_ms
}
fn default_exploration() -> f32 {
    CENTRAL_CONFIG.search.exploration
}
fn default_first_play_urgency() -> f32 {
    CENTRAL_CONFIG.search.first_play_urgency
}
fn default_check_interval() -> u32 {
    CENTRAL_CONFIG.search.check_interval
}
fn default_node_pool_mib() -> usize {
    CENTRAL_CONFIG.search.node_pool_mib
}
fn default_send_to_self_max_ply() -> u8 {
    CENTRAL_CONFIG.search.send_to_self_max_ply
}
fn default_late_game_ply() -> u8 {
    CENTRAL_CONFIG.search.late_game_ply
}
fn default_evaluator() -> EvaluatorKind {
    CENTRAL_CONFIG.evaluator.kind
}
fn default_hidden_size() -> usize {
    CENTRAL_CONFIG.evaluator.hidden_size
}
fn default_weight_seed() -> u64 {
    CENTRAL_CONFIG.evaluator.weight_seed
}

#[derive(Parser, Debug, Clone)]
#[command(name = "actor")]
#[command(about = "Self-play match driver for the ultimate tic-tac-toe MCTS engine")]
#[command(
    long_about = "Plays matches between two engine instances with a per-move time budget
and logs every move and result.

Configuration is loaded from config.toml with UTTT_* environment variable
overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Base seed for rollout evaluators
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Number of matches to play; engines swap sides every match
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Log every move at info level
    #[arg(long, default_value_t = default_log_moves(), action = clap::ArgAction::Set)]
    pub log_moves: bool,

    /// Search time per move in milliseconds
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// Search time for each side's first move in milliseconds
    #[arg(long, default_value_t = default_first_turn_budget_ms())]
    pub first_turn_budget_ms: u64,

    /// UCT exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f32,

    /// Score given to children that were never simulated
    #[arg(long, default_value_t = default_first_play_urgency())]
    pub first_play_urgency: f32,

    /// Iterations between deadline checks
    #[arg(long, default_value_t = default_check_interval())]
    pub check_interval: u32,

    /// Node pool size per engine in MiB
    #[arg(long, default_value_t = default_node_pool_mib())]
    pub node_pool_mib: usize,

    /// Last ply at which a move into an empty sub-board is answered in kind
    #[arg(long, default_value_t = default_send_to_self_max_ply())]
    pub send_to_self_max_ply: u8,

    /// Ply after which expansion checks each move's immediate result
    #[arg(long, default_value_t = default_late_game_ply())]
    pub late_game_ply: u8,

    /// Leaf evaluator (network or rollout)
    #[arg(long, default_value_t = default_evaluator())]
    pub evaluator: EvaluatorKind,

    /// Hidden layer width of the value network
    #[arg(long, default_value_t = default_hidden_size())]
    pub hidden_size: usize,

    /// Seed for the value network weights
    #[arg(long, default_value_t = default_weight_seed())]
    pub weight_seed: u64,

    /// Scripted opening moves as board:position, played before search starts
    #[arg(long, value_delimiter = ',')]
    pub opening: Vec<String>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        if self.time_budget_ms == 0 {
            return Err(anyhow!("time_budget_ms must be greater than 0"));
        }

        if self.first_turn_budget_ms == 0 {
            return Err(anyhow!("first_turn_budget_ms must be greater than 0"));
        }

        if self.check_interval == 0 {
            return Err(anyhow!("check_interval must be greater than 0"));
        }

        if self.node_pool_mib == 0 {
            return Err(anyhow!("node_pool_mib must be greater than 0"));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }

        if !self.first_play_urgency.is_finite() {
            return Err(anyhow!("first_play_urgency must be finite"));
        }

        if self.evaluator == EvaluatorKind::Network && self.hidden_size == 0 {
            return Err(anyhow!("hidden_size must be greater than 0"));
        }

        if self.hidden_size > MAX_HIDDEN_SIZE {
            return Err(anyhow!(
                "hidden_size must be at most {}, got {}",
                MAX_HIDDEN_SIZE,
                self.hidden_size
            ));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.opening_moves()?;
        Ok(())
    }

    /// Search limits for the engine playing `me`.
    pub fn mcts_config(&self, me: Player) -> MctsConfig {
        MctsConfig::default()
            .with_me(me)
            .with_exploration(self.exploration)
            .with_first_play_urgency(self.first_play_urgency)
            .with_check_interval(self.check_interval)
            .with_node_pool_mib(self.node_pool_mib)
            .with_ply_thresholds(self.send_to_self_max_ply, self.late_game_ply)
    }

    /// Time budget for a move; each side's first move gets the longer one.
    pub fn turn_budget(&self, first_turn: bool) -> Duration {
        if first_turn {
            Duration::from_millis(self.first_turn_budget_ms)
        } else {
            Duration::from_millis(self.time_budget_ms)
        }
    }

    /// Parse the scripted opening.
    ///
    /// Only the syntax is checked here; legality is up to the engine.
    pub fn opening_moves(&self) -> Result<Vec<Square>> {
        self.opening
            .iter()
            .map(|text| parse_square(text))
            .collect()
    }
}

fn parse_square(text: &str) -> Result<Square> {
    let (board, position) = text
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid move '{}', expected board:position", text))?;
    let board = board
        .parse::<u8>()
        .with_context(|| format!("invalid board in move '{}'", text))?;
    let position = position
        .parse::<u8>()
        .with_context(|| format!("invalid position in move '{}'", text))?;
    Ok(Square::new(board, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            log_level: "info".into(),
            seed: 42,
            games: 2,
            log_moves: true,
            time_budget_ms: 100,
            first_turn_budget_ms: 1000,
            exploration: 0.41,
            first_play_urgency: 0.40,
            check_interval: 128,
            node_pool_mib: 64,
            send_to_self_max_ply: 20,
            late_game_ply: 30,
            evaluator: EvaluatorKind::Network,
            hidden_size: 64,
            weight_seed: 1,
            opening: Vec::new(),
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn validate_rejects_zero_time_budget() {
        let mut cfg = base_config();
        cfg.time_budget_ms = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("time_budget_ms"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn validate_rejects_negative_exploration() {
        let mut cfg = base_config();
        cfg.exploration = -0.1;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("exploration"));
    }

    #[test]
    fn validate_rejects_empty_network() {
        let mut cfg = base_config();
        cfg.hidden_size = 0;
        assert!(cfg.validate().is_err());

        // Rollouts don't need a network
        cfg.evaluator = EvaluatorKind::Rollout;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_oversized_network() {
        let mut cfg = base_config();
        cfg.hidden_size = MAX_HIDDEN_SIZE;
        assert!(cfg.validate().is_ok());

        cfg.hidden_size = MAX_HIDDEN_SIZE + 1;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn validate_rejects_malformed_opening() {
        let mut cfg = base_config();
        cfg.opening = vec!["4:4".into(), "40".into()];
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("board:position"));
    }

    #[test]
    fn opening_moves_parse() {
        let mut cfg = base_config();
        cfg.opening = vec!["4:4".into(), " 4:0".into()];
        assert_eq!(
            cfg.opening_moves().unwrap(),
            vec![Square::new(4, 4), Square::new(4, 0)]
        );
    }

    #[test]
    fn turn_budget_uses_first_turn_value() {
        let cfg = base_config();
        assert_eq!(cfg.turn_budget(true), Duration::from_millis(1000));
        assert_eq!(cfg.turn_budget(false), Duration::from_millis(100));
    }

    #[test]
    fn mcts_config_carries_settings() {
        let mut cfg = base_config();
        cfg.exploration = 0.8;
        cfg.late_game_ply = 45;
        let mcts = cfg.mcts_config(Player::One);
        assert_eq!(mcts.me, Player::One);
        assert!((mcts.exploration - 0.8).abs() < f32::EPSILON);
        assert_eq!(mcts.late_game_ply, 45);
        assert_eq!(mcts.node_capacity, mcts::nodes_for_mib(64));
    }

    #[test]
    fn cli_overrides_defaults() {
        let cfg = Config::try_parse_from([
            "actor",
            "--games",
            "3",
            "--evaluator",
            "rollout",
            "--log-moves",
            "false",
            "--opening",
            "4:4,4:0",
        ])
        .unwrap();
        assert_eq!(cfg.games, 3);
        assert_eq!(cfg.evaluator, EvaluatorKind::Rollout);
        assert!(!cfg.log_moves);
        assert_eq!(cfg.opening, vec!["4:4".to_string(), "4:0".to_string()]);
    }
}
