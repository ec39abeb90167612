//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "UTTT_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",      // Current directory
    "../config.toml",   // Parent directory (when running from subdirectory)
    "/app/config.toml", // Docker container
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by UTTT_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
/// 4. Docker container path (/app/config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file falls back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u64, f32, bool, ...)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: UTTT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "UTTT_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "UTTT_COMMON_SEED", parse);

    // Search
    env_override!(
        config,
        search.exploration,
        "UTTT_SEARCH_EXPLORATION",
        parse
    );
    env_override!(
        config,
        search.first_play_urgency,
        "UTTT_SEARCH_FIRST_PLAY_URGENCY",
        parse
    );
    env_override!(
        config,
        search.check_interval,
        "UTTT_SEARCH_CHECK_INTERVAL",
        parse
    );
    env_override!(
        config,
        search.node_pool_mib,
        "UTTT_SEARCH_NODE_POOL_MIB",
        parse
    );
    env_override!(
        config,
        search.send_to_self_max_ply,
        "UTTT_SEARCH_SEND_TO_SELF_MAX_PLY",
        parse
    );
    env_override!(
        config,
        search.late_game_ply,
        "UTTT_SEARCH_LATE_GAME_PLY",
        parse
    );
    env_override!(
        config,
        search.time_budget_ms,
        "UTTT_SEARCH_TIME_BUDGET_MS",
        parse
    );
    env_override!(
        config,
        search.first_turn_budget_ms,
        "UTTT_SEARCH_FIRST_TURN_BUDGET_MS",
        parse
    );

    // Evaluator
    env_override!(config, evaluator.kind, "UTTT_EVALUATOR_KIND", parse);
    env_override!(
        config,
        evaluator.hidden_size,
        "UTTT_EVALUATOR_HIDDEN_SIZE",
        parse
    );
    env_override!(
        config,
        evaluator.weight_seed,
        "UTTT_EVALUATOR_WEIGHT_SEED",
        parse
    );

    // Matches
    env_override!(config, matches.games, "UTTT_MATCHES_GAMES", parse);
    env_override!(config, matches.log_moves, "UTTT_MATCHES_LOG_MOVES", parse);

    config
}
