//! Monte Carlo Tree Search (MCTS) with UCB1 selection and random rollouts.
//!
//! The search plays tic-tac-toe from any non-terminal position for either
//! player, using no domain knowledge beyond the rules in `games-tictactoe`.
//!
//! # Overview
//!
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Descend through fully expanded nodes using UCB1
//!    (Upper Confidence Bound) to balance exploration and exploitation
//! 2. **Expansion**: At the first node with untried actions, add one child
//! 3. **Rollout**: Play uniformly random moves from the new child until the
//!    game ends
//! 4. **Backpropagation**: Count the outcome on every node from the child back
//!    to the root
//!
//! After the budget is spent the root child with the highest mean outcome is
//! returned.
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{GameState, Player};
//! use mcts::{best_action, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = best_action(
//!     GameState::new(),
//!     Player::X,
//!     MctsConfig::for_testing(),
//!     &mut rng,
//! )
//! .unwrap();
//!
//! println!("Best action: {}", result.action);
//! println!("Value: {}", result.value);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per search (default: 1000)
//! - `exploration`: UCB1 exploration constant during descent (default: 0.1)
//! - `rollout_policy`: Whether rollouts stamp a single color or alternate
//!   (default: single color)

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{MctsConfig, ParseRolloutPolicyError, RolloutPolicy};
pub use node::{MctsNode, NodeId};
pub use search::{best_action, playout, ChildStats, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
