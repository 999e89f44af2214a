//! MCTS configuration parameters.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How marks are stamped during a random rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolloutPolicy {
    /// Every simulated move uses the color of the node the rollout started
    /// from. Outcome statistics are skewed toward that player.
    #[default]
    SingleColor,

    /// Moves alternate between the two players, starting with the color of
    /// the node the rollout started from (conventional self-play).
    Alternating,
}

impl RolloutPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RolloutPolicy::SingleColor => "single-color",
            RolloutPolicy::Alternating => "alternating",
        }
    }
}

impl fmt::Display for RolloutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rollout policy '{0}', expected 'single-color' or 'alternating'")]
pub struct ParseRolloutPolicyError(pub String);

impl FromStr for RolloutPolicy {
    type Err = ParseRolloutPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-color" | "single_color" | "single" => Ok(RolloutPolicy::SingleColor),
            "alternating" | "alternate" => Ok(RolloutPolicy::Alternating),
            _ => Err(ParseRolloutPolicyError(s.to_string())),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of select/rollout/backpropagate cycles per decision.
    pub num_simulations: u32,

    /// UCB1 exploration constant used while descending the tree.
    /// The final move is always chosen with 0 (pure exploitation).
    pub exploration: f64,

    /// Mark stamping used by rollouts.
    pub rollout_policy: RolloutPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            exploration: 0.1,
            rollout_policy: RolloutPolicy::SingleColor,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 200,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the rollout policy.
    pub fn with_rollout_policy(mut self, policy: RolloutPolicy) -> Self {
        self.rollout_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 1000);
        assert!((config.exploration - 0.1).abs() < 1e-12);
        assert_eq!(config.rollout_policy, RolloutPolicy::SingleColor);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_exploration(1.4)
            .with_rollout_policy(RolloutPolicy::Alternating);

        assert_eq!(config.num_simulations, 100);
        assert!((config.exploration - 1.4).abs() < 1e-12);
        assert_eq!(config.rollout_policy, RolloutPolicy::Alternating);
    }

    #[test]
    fn test_testing_config_keeps_exploration() {
        let config = MctsConfig::for_testing();
        assert_eq!(config.num_simulations, 200);
        assert!((config.exploration - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rollout_policy_parse() {
        assert_eq!(
            "single-color".parse::<RolloutPolicy>().unwrap(),
            RolloutPolicy::SingleColor
        );
        assert_eq!(
            " Alternating ".parse::<RolloutPolicy>().unwrap(),
            RolloutPolicy::Alternating
        );
        let err = "greedy".parse::<RolloutPolicy>().unwrap_err();
        assert!(err.to_string().contains("greedy"));
    }

    #[test]
    fn test_rollout_policy_display_roundtrip() {
        for policy in [RolloutPolicy::SingleColor, RolloutPolicy::Alternating] {
            assert_eq!(policy.to_string().parse::<RolloutPolicy>().unwrap(), policy);
        }
    }
}
