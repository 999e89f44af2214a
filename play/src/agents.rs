//! Move selection agents
//!
//! Every agent answers the same question: given a board, which cell should
//! the player it represents mark next? The game driver owns the turn order
//! and applies the returned action with the right mark.

use anyhow::{anyhow, bail, Context, Result};
use games_tictactoe::{Action, GameState, Player};
use mcts::{best_action, MctsConfig};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// Trait for move selection strategies.
pub trait Agent {
    /// Choose the next action for this agent's player in `state`.
    fn get_action(&mut self, state: &GameState) -> Result<Action>;
}

/// Which kind of agent to seat at a color, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentChoice {
    Mcts,
    Human,
    Random,
}

impl FromStr for AgentChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcts" => Ok(AgentChoice::Mcts),
            "human" => Ok(AgentChoice::Human),
            "random" => Ok(AgentChoice::Random),
            other => Err(anyhow!(
                "unknown agent '{}', expected one of mcts, human, random",
                other
            )),
        }
    }
}

impl fmt::Display for AgentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentChoice::Mcts => "mcts",
            AgentChoice::Human => "human",
            AgentChoice::Random => "random",
        };
        f.write_str(name)
    }
}

/// Agent that runs a fresh MCTS search for every decision.
#[derive(Debug)]
pub struct MctsAgent {
    color: Player,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl MctsAgent {
    pub fn new(color: Player, config: MctsConfig) -> Self {
        Self {
            color,
            config,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create with a specific seed for determinism
    pub fn with_seed(color: Player, config: MctsConfig, seed: u64) -> Self {
        Self {
            color,
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for MctsAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Action> {
        let result = best_action(*state, self.color, self.config.clone(), &mut self.rng)
            .with_context(|| format!("MCTS search failed for {}", self.color))?;

        for child in &result.children {
            debug!(
                player = %self.color,
                action = %child.action,
                visits = child.visits,
                wins = child.wins,
                draws = child.draws,
                losses = child.losses,
                value = child.value,
                "Root child"
            );
        }

        Ok(result.action)
    }
}

/// Agent that picks a uniformly random legal action.
#[derive(Debug)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn get_action(&mut self, state: &GameState) -> Result<Action> {
        state
            .legal_actions()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("no legal actions left on the board"))
    }
}

/// Agent driven by a person typing `row col` (0-based) on a line.
///
/// The board is rendered to `output` before every prompt. Only the line
/// format is checked here; out-of-range or occupied cells are rejected when
/// the game applies the action.
pub struct HumanAgent<R, W> {
    color: Player,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(color: Player, input: R, output: W) -> Self {
        Self {
            color,
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn get_action(&mut self, state: &GameState) -> Result<Action> {
        write!(self.output, "{}", state)?;
        write!(self.output, "{} to move (row col): ", self.color)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for {}'s move", self.color);
        }
        parse_action(&line)
    }
}

/// Parse a `row col` line into an action.
pub fn parse_action(line: &str) -> Result<Action> {
    let mut parts = line.split_whitespace();
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected two numbers 'row col', got '{}'", line.trim());
    };

    let row = row
        .parse()
        .with_context(|| format!("invalid row '{}'", row))?;
    let col = col
        .parse()
        .with_context(|| format!("invalid column '{}'", col))?;
    Ok(Action::new(row, col))
}

/// Human agent reading from stdin and prompting on stdout.
pub type ConsoleHuman = HumanAgent<Box<dyn BufRead>, Box<dyn Write>>;

/// The closed set of agents a seat can hold.
pub enum AgentKind {
    Mcts(MctsAgent),
    Human(ConsoleHuman),
    Random(RandomAgent),
}

impl AgentKind {
    /// Build the agent named by `choice` for `color`.
    /// `seed` makes MCTS and random agents reproducible.
    pub fn build(
        choice: AgentChoice,
        color: Player,
        config: &MctsConfig,
        seed: Option<u64>,
    ) -> Self {
        match choice {
            AgentChoice::Mcts => AgentKind::Mcts(match seed {
                Some(seed) => MctsAgent::with_seed(color, config.clone(), seed),
                None => MctsAgent::new(color, config.clone()),
            }),
            AgentChoice::Random => AgentKind::Random(match seed {
                Some(seed) => RandomAgent::with_seed(seed),
                None => RandomAgent::new(),
            }),
            AgentChoice::Human => AgentKind::Human(HumanAgent::new(
                color,
                Box::new(std::io::stdin().lock()),
                Box::new(std::io::stdout()),
            )),
        }
    }

    pub fn choice(&self) -> AgentChoice {
        match self {
            AgentKind::Mcts(_) => AgentChoice::Mcts,
            AgentKind::Human(_) => AgentChoice::Human,
            AgentKind::Random(_) => AgentChoice::Random,
        }
    }
}

impl Agent for AgentKind {
    fn get_action(&mut self, state: &GameState) -> Result<Action> {
        match self {
            AgentKind::Mcts(agent) => agent.get_action(state),
            AgentKind::Human(agent) => agent.get_action(state),
            AgentKind::Random(agent) => agent.get_action(state),
        }
    }
}
