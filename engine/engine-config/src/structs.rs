//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use std::fmt;
use std::str::FromStr;

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_exploration() -> f32 {
    defaults::exploration()
}
fn d_fpu() -> f32 {
    defaults::first_play_urgency()
}
fn d_check_interval() -> u32 {
    defaults::check_interval()
}
fn d_node_pool_mib() -> usize {
    defaults::node_pool_mib()
}
fn d_send_to_self_max_ply() -> u8 {
    defaults::send_to_self_max_ply()
}
fn d_late_game_ply() -> u8 {
    defaults::late_game_ply()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_first_turn_budget_ms() -> u64 {
    defaults::first_turn_budget_ms()
}
fn d_kind() -> EvaluatorKind {
    defaults::evaluator_kind()
}
fn d_hidden_size() -> usize {
    defaults::hidden_size()
}
fn d_weight_seed() -> u64 {
    defaults::weight_seed()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_log_moves() -> bool {
    defaults::log_moves()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub matches: MatchConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Base seed for rollouts and match setup
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// MCTS tuning and time control
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(default = "d_exploration")]
    pub exploration: f32,
    #[serde(default = "d_fpu")]
    pub first_play_urgency: f32,
    #[serde(default = "d_check_interval")]
    pub check_interval: u32,
    #[serde(default = "d_node_pool_mib")]
    pub node_pool_mib: usize,
    #[serde(default = "d_send_to_self_max_ply")]
    pub send_to_self_max_ply: u8,
    #[serde(default = "d_late_game_ply")]
    pub late_game_ply: u8,
    /// Wall-clock budget per move
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Budget for each side's first move of a match
    #[serde(default = "d_first_turn_budget_ms")]
    pub first_turn_budget_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: defaults::exploration(),
            first_play_urgency: defaults::first_play_urgency(),
            check_interval: defaults::check_interval(),
            node_pool_mib: defaults::node_pool_mib(),
            send_to_self_max_ply: defaults::send_to_self_max_ply(),
            late_game_ply: defaults::late_game_ply(),
            time_budget_ms: defaults::time_budget_ms(),
            first_turn_budget_ms: defaults::first_turn_budget_ms(),
        }
    }
}

/// Which leaf evaluator the search uses.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    Network,
    Rollout,
}

impl FromStr for EvaluatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "network" => Ok(Self::Network),
            "rollout" => Ok(Self::Rollout),
            other => Err(format!(
                "unknown evaluator '{}', expected 'network' or 'rollout'",
                other
            )),
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Rollout => write!(f, "rollout"),
        }
    }
}

/// Leaf evaluator selection
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluatorConfig {
    #[serde(default = "d_kind")]
    pub kind: EvaluatorKind,
    /// Hidden layer width of the value network
    #[serde(default = "d_hidden_size")]
    pub hidden_size: usize,
    #[serde(default = "d_weight_seed")]
    pub weight_seed: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            kind: defaults::evaluator_kind(),
            hidden_size: defaults::hidden_size(),
            weight_seed: defaults::weight_seed(),
        }
    }
}

/// Self-play match settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MatchConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    #[serde(default = "d_log_moves")]
    pub log_moves: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            log_moves: defaults::log_moves(),
        }
    }
}
