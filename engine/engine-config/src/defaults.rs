//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time and parsed on first use, so
//! the binary and the documented defaults cannot drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::EvaluatorKind;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    evaluator: EvaluatorDefaults,
    matches: MatchDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    exploration: f32,
    first_play_urgency: f32,
    check_interval: u32,
    node_pool_mib: usize,
    send_to_self_max_ply: u8,
    late_game_ply: u8,
    time_budget_ms: u64,
    first_turn_budget_ms: u64,
}

#[derive(Debug, Deserialize)]
struct EvaluatorDefaults {
    kind: EvaluatorKind,
    hidden_size: usize,
    weight_seed: u64,
}

#[derive(Debug, Deserialize)]
struct MatchDefaults {
    games: u32,
    log_moves: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Search
pub fn exploration() -> f32 {
    DEFAULTS.search.exploration
}
pub fn first_play_urgency() -> f32 {
    DEFAULTS.search.first_play_urgency
}
pub fn check_interval() -> u32 {
    DEFAULTS.search.check_interval
}
pub fn node_pool_mib() -> usize {
    DEFAULTS.search.node_pool_mib
}
pub fn send_to_self_max_ply() -> u8 {
    DEFAULTS.search.send_to_self_max_ply
}
pub fn late_game_ply() -> u8 {
    DEFAULTS.search.late_game_ply
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.search.time_budget_ms
}
pub fn first_turn_budget_ms() -> u64 {
    DEFAULTS.search.first_turn_budget_ms
}

// Evaluator
pub fn evaluator_kind() -> EvaluatorKind {
    DEFAULTS.evaluator.kind
}
pub fn hidden_size() -> usize {
    DEFAULTS.evaluator.hidden_size
}
pub fn weight_seed() -> u64 {
    DEFAULTS.evaluator.weight_seed
}

// Matches
pub fn games() -> u32 {
    DEFAULTS.matches.games
}
pub fn log_moves() -> bool {
    DEFAULTS.matches.log_moves
}
