//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the `play` binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`TICTACTOE_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! TICTACTOE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     TICTACTOE_COMMON_LOG_LEVEL=debug
//!     TICTACTOE_MCTS_NUM_SIMULATIONS=5000
//!     TICTACTOE_MCTS_ROLLOUT_POLICY=alternating
//!     TICTACTOE_GAME_X_AGENT=mcts
//!     TICTACTOE_GAME_SEED=42
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
