//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_sims() -> u32 {
    defaults::num_simulations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_rollout_policy() -> String {
    defaults::rollout_policy().into()
}
fn d_x_agent() -> String {
    defaults::x_agent().into()
}
fn d_o_agent() -> String {
    defaults::o_agent().into()
}
fn d_games() -> u32 {
    defaults::games()
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
    pub mcts: MctsConfig,
    #[serde(default)]
    pub game: GameConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_sims")]
    pub num_simulations: u32,
    /// UCB1 exploration constant used while descending the tree
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// "single-color" or "alternating"
    #[serde(default = "d_rollout_policy")]
    pub rollout_policy: String,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            exploration: defaults::exploration(),
            rollout_policy: defaults::rollout_policy().into(),
        }
    }
}

/// Game/match configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    /// Agent playing X ("mcts", "human" or "random")
    #[serde(default = "d_x_agent")]
    pub x_agent: String,
    /// Agent playing O
    #[serde(default = "d_o_agent")]
    pub o_agent: String,
    /// Number of games to play in a row
    #[serde(default = "d_games")]
    pub games: u32,
    /// Base RNG seed (None = seed from entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            x_agent: defaults::x_agent().into(),
            o_agent: defaults::o_agent().into(),
            games: defaults::games(),
            seed: None,
        }
    }
}
