//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the binary and the checked-in config file agree on every value.

use once_cell::sync::Lazy;
use serde::Deserialize;

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
    mcts: MctsDefaults,
    game: GameDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    exploration: f64,
    rollout_policy: String,
}

#[derive(Debug, Deserialize)]
struct GameDefaults {
    x_agent: String,
    o_agent: String,
    games: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn rollout_policy() -> &'static str {
    &DEFAULTS.mcts.rollout_policy
}

// Game
pub fn x_agent() -> &'static str {
    &DEFAULTS.game.x_agent
}
pub fn o_agent() -> &'static str {
    &DEFAULTS.game.o_agent
}
pub fn games() -> u32 {
    DEFAULTS.game.games
}
