//! Play - tic-tac-toe against a Monte Carlo Tree Search agent
//!
//! Seats an agent at each color, plays the configured number of games and
//! reports the results:
//! 1. Loads config.toml (with env and CLI overrides)
//! 2. Builds the X and O agents (mcts, human or random)
//! 3. Plays games with X moving first, printing each final board
//! 4. Logs the match summary and optionally writes it as JSON

use anyhow::Result;
use clap::Parser;
use games_tictactoe::Player;
use std::path::Path;
use tracing::{error, info};

mod agents;
mod config;
mod game;
mod stats;

use crate::agents::AgentKind;
use crate::config::Config;
use crate::game::Game;
use crate::stats::MatchStats;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so the board and prompts own stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn run(config: &Config) -> Result<()> {
    let mcts_config = config.mcts_config()?;
    let seed = config.seed();

    let mut x = AgentKind::build(config.x_agent()?, Player::X, &mcts_config, seed);
    let mut o = AgentKind::build(
        config.o_agent()?,
        Player::O,
        &mcts_config,
        seed.map(|s| s.wrapping_add(1)),
    );

    info!(
        x_agent = %x.choice(),
        o_agent = %o.choice(),
        games = config.games,
        num_simulations = mcts_config.num_simulations,
        exploration = mcts_config.exploration,
        rollout_policy = %mcts_config.rollout_policy,
        seed = ?seed,
        "Starting match"
    );

    let mut stats = MatchStats::new();
    for game_number in 1..=config.games {
        let outcome = Game::new().play(&mut x, &mut o)?;

        println!("{}", outcome.final_state);
        println!("{}", outcome.describe());

        info!(
            game = game_number,
            winner = ?outcome.winner,
            moves = outcome.moves,
            "Game finished"
        );
        stats.record_game(&outcome);
    }

    let summary = stats.summary();
    info!(
        games = summary.games,
        x_wins = summary.x_wins,
        o_wins = summary.o_wins,
        draws = summary.draws,
        avg_game_length = summary.avg_game_length,
        runtime_seconds = summary.runtime_seconds,
        "Match complete"
    );

    if let Some(path) = &config.stats_path {
        stats.write_summary(Path::new(path))?;
        info!("Match summary written to {}", path);
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    match run(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Play failed: {:#}", e);
            Err(e)
        }
    }
}
