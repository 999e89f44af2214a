//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Descend the tree using UCB1 until a node has untried actions
//! 2. Expansion: Add one child for the next untried action
//! 3. Rollout: Play random moves from the new node to a terminal state
//! 4. Backpropagation: Count the outcome on every node back to the root

use games_tictactoe::{Action, GameError, GameState, Player};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{MctsConfig, RolloutPolicy};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Cannot search from a terminal state")]
    TerminalState,

    #[error("Root has no children to choose from")]
    NoChildren,

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// Outcome tallies of one root child, from the perspective of the player
/// choosing at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats {
    pub action: Action,
    pub visits: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Mean outcome Q/N
    pub value: f64,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best action to take
    pub action: Action,

    /// Mean outcome of the chosen child for the player to move
    pub value: f64,

    /// Number of simulations performed (root visit count)
    pub simulations: u32,

    /// Statistics for every root child in expansion order
    pub children: Vec<ChildStats>,
}

/// MCTS search state.
#[derive(Debug)]
pub struct MctsSearch {
    tree: MctsTree,
    config: MctsConfig,
}

impl MctsSearch {
    /// Create a new MCTS search with `color` to move in `state`.
    pub fn new(state: GameState, color: Player, config: MctsConfig) -> Result<Self, SearchError> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState);
        }

        Ok(Self {
            tree: MctsTree::new(state, color),
            config,
        })
    }

    /// Run the configured number of simulations and pick the root child with
    /// the highest mean outcome (UCB1 with exploration 0).
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        for _ in 0..self.config.num_simulations {
            self.simulate(rng)?;
        }

        let root_id = self.tree.root();
        let (action, best_id) = self
            .tree
            .best_child_entry(root_id, 0.0)
            .ok_or(SearchError::NoChildren)?;
        let best = self.tree.get(best_id);
        let root = self.tree.get(root_id);
        let stats = self.tree.stats();

        let children = root
            .children
            .iter()
            .map(|&(action, id)| {
                let child = self.tree.get(id);
                ChildStats {
                    action,
                    visits: child.visit_count,
                    // Child tallies are relative to the opponent
                    wins: child.losses,
                    draws: child.draws,
                    losses: child.wins,
                    value: child.mean_value(),
                }
            })
            .collect();

        debug!(
            %action,
            value = best.mean_value(),
            visits = best.visit_count,
            simulations = root.visit_count,
            total_nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            "MCTS search complete"
        );

        Ok(SearchResult {
            action,
            value: best.mean_value(),
            simulations: root.visit_count,
            children,
        })
    }

    /// Run a single simulation (select/expand -> rollout -> backpropagate).
    pub fn simulate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let leaf_id = self.select_for_simulation()?;
        let result = self.rollout(leaf_id, rng)?;
        self.tree.backpropagate(leaf_id, result);

        trace!(
            leaf = leaf_id.0,
            depth = self.tree.depth(leaf_id),
            winner = ?result,
            "MCTS simulation complete"
        );

        Ok(())
    }

    /// Tree policy: descend from the root and return the node to roll out.
    ///
    /// Stops at a terminal node, or expands and returns a new child of the
    /// first node that still has untried actions. Fully expanded nodes are
    /// passed through via UCB1 with the configured exploration constant.
    pub fn select_for_simulation(&mut self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_terminal() {
                return Ok(current);
            }

            if !node.is_fully_expanded() {
                if let Some(child_id) = self.tree.expand(current)? {
                    return Ok(child_id);
                }
            }

            match self.tree.best_child(current, self.config.exploration) {
                Some(child_id) => current = child_id,
                None => return Ok(current),
            }
        }
    }

    /// Play random moves from `node_id` until the game ends and return the
    /// winner (`None` for a draw). The tree is not modified.
    pub fn rollout(
        &self,
        node_id: NodeId,
        rng: &mut ChaCha20Rng,
    ) -> Result<Option<Player>, SearchError> {
        let node = self.tree.get(node_id);
        playout(node.state, node.color, self.config.rollout_policy, rng)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Random playout from `state`, starting with `color`'s mark.
///
/// Each move is drawn uniformly from the legal actions. Under
/// [`RolloutPolicy::SingleColor`] every move uses `color`.
pub fn playout(
    state: GameState,
    color: Player,
    policy: RolloutPolicy,
    rng: &mut ChaCha20Rng,
) -> Result<Option<Player>, SearchError> {
    let mut state = state;
    let mut mark = color;

    while !state.is_terminal() {
        let legal = state.legal_actions();
        let action = legal[rng.gen_range(0..legal.len())];
        state = state.apply(action, mark)?;
        if policy == RolloutPolicy::Alternating {
            mark = mark.opponent();
        }
    }

    Ok(state.winner())
}

/// Convenience function to run a single MCTS search and pick a move for
/// `color` in `state`.
pub fn best_action(
    state: GameState,
    color: Player,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(state, color, config)?;
    search.run(rng)
}
