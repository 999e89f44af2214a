//! Configuration for the play binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use mcts::{MctsConfig, RolloutPolicy};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

use crate::agents::AgentChoice;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_num_simulations() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration
}

fn default_rollout_policy() -> String {
    CENTRAL_CONFIG.mcts.rollout_policy.clone()
}

fn default_x_agent() -> String {
    CENTRAL_CONFIG.game.x_agent.clone()
}

fn default_o_agent() -> String {
    CENTRAL_CONFIG.game.o_agent.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.game.games
}

#[derive(Parser, Debug, Clone)]
#[command(name = "play")]
#[command(about = "Play tic-tac-toe against a Monte Carlo Tree Search agent")]
#[command(
    long_about = "Seats an agent (mcts, human or random) at each color and plays one or
more games. X always moves first.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Number of MCTS simulations per move
    #[arg(long, default_value_t = default_num_simulations())]
    pub num_simulations: u32,

    /// UCB1 exploration constant used during tree descent
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Rollout policy (single-color, alternating)
    #[arg(long, default_value_t = default_rollout_policy())]
    pub rollout_policy: String,

    /// Agent playing X (mcts, human, random)
    #[arg(long, default_value_t = default_x_agent())]
    pub x_agent: String,

    /// Agent playing O (mcts, human, random)
    #[arg(long, default_value_t = default_o_agent())]
    pub o_agent: String,

    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Base RNG seed for reproducible agents (defaults to [game] seed, else entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON match summary to this path
    #[arg(long)]
    pub stats_path: Option<String>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.x_agent()?;
        self.o_agent()?;
        self.rollout_policy()?;

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }

        if self.num_simulations == 0 {
            return Err(anyhow!("num_simulations must be greater than 0"));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        Ok(())
    }

    pub fn x_agent(&self) -> Result<AgentChoice> {
        self.x_agent.parse()
    }

    pub fn o_agent(&self) -> Result<AgentChoice> {
        self.o_agent.parse()
    }

    pub fn rollout_policy(&self) -> Result<RolloutPolicy> {
        Ok(self.rollout_policy.parse::<RolloutPolicy>()?)
    }

    /// Search parameters for MCTS agents
    pub fn mcts_config(&self) -> Result<MctsConfig> {
        Ok(MctsConfig::default()
            .with_simulations(self.num_simulations)
            .with_exploration(self.exploration)
            .with_rollout_policy(self.rollout_policy()?))
    }

    /// Seed from the command line, falling back to config.toml
    pub fn seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.game.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            log_level: "info".into(),
            num_simulations: 100,
            exploration: 0.1,
            rollout_policy: "single-color".into(),
            x_agent: "human".into(),
            o_agent: "mcts".into(),
            games: 1,
            seed: Some(7),
            stats_path: None,
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[test]
    fn validate_rejects_unknown_agent() {
        let mut cfg = base_config();
        cfg.o_agent = "alphazero".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unknown agent"));
    }

    #[test]
    fn validate_rejects_unknown_rollout_policy() {
        let mut cfg = base_config();
        cfg.rollout_policy = "greedy".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("rollout policy"));
    }

    #[test]
    fn validate_rejects_negative_exploration() {
        let mut cfg = base_config();
        cfg.exploration = -0.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("exploration"));

        cfg.exploration = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_zero_exploration() {
        let mut cfg = base_config();
        cfg.exploration = 0.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_simulations() {
        let mut cfg = base_config();
        cfg.num_simulations = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("num_simulations"));
    }

    #[test]
    fn validate_rejects_zero_games() {
        let mut cfg = base_config();
        cfg.games = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("games"));
    }

    #[test]
    fn mcts_config_carries_settings() {
        let mut cfg = base_config();
        cfg.rollout_policy = "alternating".into();
        cfg.exploration = 1.0;

        let mcts = cfg.mcts_config().unwrap();
        assert_eq!(mcts.num_simulations, 100);
        assert!((mcts.exploration - 1.0).abs() < f64::EPSILON);
        assert_eq!(mcts.rollout_policy, RolloutPolicy::Alternating);
    }

    #[test]
    fn cli_seed_wins() {
        let cfg = base_config();
        assert_eq!(cfg.seed(), Some(7));
    }

    #[test]
    fn cli_flags_parse() {
        let cfg = Config::try_parse_from([
            "play",
            "--x-agent",
            "random",
            "--o-agent",
            "random",
            "--num-simulations",
            "50",
            "--games",
            "3",
            "--seed",
            "11",
        ])
        .unwrap();

        assert_eq!(cfg.x_agent().unwrap(), AgentChoice::Random);
        assert_eq!(cfg.num_simulations, 50);
        assert_eq!(cfg.games, 3);
        assert_eq!(cfg.seed, Some(11));
        assert!(cfg.validate().is_ok());
    }
}
