//! Actor - self-play match driver for the ultimate tic-tac-toe engine
//!
//! A short-lived process that:
//! 1. Loads configuration (config.toml, UTTT_* env vars, CLI flags)
//! 2. Plays matches between two time-bounded MCTS engines
//! 3. Logs every move, each result, and a final summary
//!
//! An illegal move reaching an engine is a protocol violation and ends the
//! process with exit code 123.

use anyhow::Result;
use clap::Parser;
use mcts::SearchError;
use tracing::{error, info};

mod actor;
mod config;
mod stats;

use crate::actor::Actor;
use crate::config::Config;

/// Exit code for a move the engine refused as illegal.
const ILLEGAL_MOVE_EXIT_CODE: i32 = 123;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn is_protocol_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<SearchError>(),
        Some(SearchError::IllegalMove { .. })
    )
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let mut actor = Actor::new(config)?;
    match actor.run() {
        Ok(stats) => {
            let (a_wins, b_wins, draws) = stats.score();
            info!(a_wins, b_wins, draws, "Actor completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {:#}", e);
            if is_protocol_violation(&e) {
                std::process::exit(ILLEGAL_MOVE_EXIT_CODE);
            }
            Err(e)
        }
    }
}
