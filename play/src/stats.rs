//! Match statistics tracking and persistence.
//!
//! Tallies the outcome of every game in a match (X wins, O wins, draws)
//! along with game lengths. A summary can be written to a JSON file.

use anyhow::{Context, Result};
use games_tictactoe::Player;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::game::GameOutcome;

/// Running tallies for a match.
#[derive(Debug)]
pub struct MatchStats {
    games: u32,
    x_wins: u32,
    o_wins: u32,
    draws: u32,
    /// Sum of game lengths for average calculation
    total_moves: u64,
    start_time: Instant,
}

/// Serializable match summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub games: u32,
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
    pub avg_game_length: f64,
    pub runtime_seconds: f64,
}

impl Default for MatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStats {
    pub fn new() -> Self {
        Self {
            games: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            total_moves: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a finished game.
    pub fn record_game(&mut self, outcome: &GameOutcome) {
        self.games += 1;
        self.total_moves += outcome.moves as u64;

        match outcome.winner {
            Some(Player::X) => self.x_wins += 1,
            Some(Player::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
    }

    /// Get a snapshot of current stats.
    pub fn summary(&self) -> MatchSummary {
        let avg_game_length = if self.games > 0 {
            self.total_moves as f64 / self.games as f64
        } else {
            0.0
        };

        MatchSummary {
            games: self.games,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            avg_game_length,
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }

    /// Write the summary to `path` as JSON (write-then-rename).
    pub fn write_summary(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.summary())
            .context("Failed to serialize match summary")?;

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("Failed to rename to {}", path.display()));
        }

        debug!("Wrote match summary to {}", path.display());
        Ok(())
    }
}
