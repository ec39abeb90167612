//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, 42);
    assert_eq!(config.search.check_interval, 128);
    assert_eq!(config.evaluator.kind, EvaluatorKind::Network);
    assert_eq!(config.matches.games, 1);
    assert!(config.matches.log_moves);
}

#[test]
fn test_search_defaults() {
    let config = CentralConfig::default();
    assert!((config.search.exploration - 0.41).abs() < f32::EPSILON);
    assert!((config.search.first_play_urgency - 0.40).abs() < f32::EPSILON);
    assert_eq!(config.search.node_pool_mib, 512);
    assert_eq!(config.search.send_to_self_max_ply, 20);
    assert_eq!(config.search.late_game_ply, 30);
    assert_eq!(config.search.time_budget_ms, 100);
    assert_eq!(config.search.first_turn_budget_ms, 1000);
}

#[test]
fn test_env_overrides() {
    std::env::set_var("UTTT_SEARCH_EXPLORATION", "0.75");
    std::env::set_var("UTTT_EVALUATOR_KIND", "rollout");
    std::env::set_var("UTTT_MATCHES_GAMES", "12");

    let config = apply_env_overrides(CentralConfig::default());
    assert!((config.search.exploration - 0.75).abs() < f32::EPSILON);
    assert_eq!(config.evaluator.kind, EvaluatorKind::Rollout);
    assert_eq!(config.matches.games, 12);

    std::env::remove_var("UTTT_SEARCH_EXPLORATION");
    std::env::remove_var("UTTT_EVALUATOR_KIND");
    std::env::remove_var("UTTT_MATCHES_GAMES");
}

#[test]
fn test_invalid_env_value_is_ignored() {
    std::env::set_var("UTTT_SEARCH_CHECK_INTERVAL", "often");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.search.check_interval, 128);

    std::env::remove_var("UTTT_SEARCH_CHECK_INTERVAL");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"

[search]
exploration = 0.6
time_budget_ms = 50

[evaluator]
kind = "rollout"

[matches]
games = 20
log_moves = false
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert!((config.search.exploration - 0.6).abs() < f32::EPSILON);
    assert_eq!(config.search.time_budget_ms, 50);
    assert_eq!(config.evaluator.kind, EvaluatorKind::Rollout);
    assert_eq!(config.matches.games, 20);
    assert!(!config.matches.log_moves);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[search]
late_game_ply = 40
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.search.late_game_ply, 40);
    assert_eq!(config.search.send_to_self_max_ply, 20); // Default
    assert_eq!(config.common.seed, 42); // Default
    assert_eq!(config.evaluator.hidden_size, 64); // Default
}

#[test]
fn test_unknown_evaluator_kind_rejected() {
    let toml_content = r#"
[evaluator]
kind = "oracle"
"#;
    assert!(toml::from_str::<CentralConfig>(toml_content).is_err());
    assert!("oracle".parse::<EvaluatorKind>().is_err());
    assert_eq!("Network".parse::<EvaluatorKind>(), Ok(EvaluatorKind::Network));
    assert_eq!(EvaluatorKind::Rollout.to_string(), "rollout");
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[common]\nseed = 7\n\n[search]\nfirst_turn_budget_ms = 2500"
    )
    .unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.common.seed, 7);
    assert_eq!(config.search.first_turn_budget_ms, 2500);
    assert_eq!(config.search.node_pool_mib, 512);
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search\nlate_game_ply = ").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.search.late_game_ply, 30);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_from_path(&dir.path().join("absent.toml"));
    assert_eq!(config.evaluator.weight_seed, 1);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.log_level, cloned.common.log_level);
    assert_eq!(config.search.time_budget_ms, cloned.search.time_budget_ms);
}
