//! MCTS tree node representation.
//!
//! Each node represents a game state reached by taking an action from the
//! parent. Nodes store the untried actions still waiting to be expanded and
//! the outcome tallies used for UCB1 selection.

use games_tictactoe::{Action, GameState, Player};
use std::collections::VecDeque;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<Action>,

    /// Board at this node
    pub state: GameState,

    /// Player to move at this node
    pub color: Player,

    /// Legal actions not yet expanded, in row-major order.
    /// Together with the children's actions this partitions the legal
    /// actions of `state`.
    pub untried: VecDeque<Action>,

    /// Children: Vec of (action, NodeId) pairs in expansion order.
    pub children: Vec<(Action, NodeId)>,

    /// Number of simulations that passed through this node
    pub visit_count: u32,

    /// Outcomes won by `color`
    pub wins: u32,

    /// Drawn outcomes
    pub draws: u32,

    /// Outcomes lost by `color`
    pub losses: u32,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(state: GameState, color: Player) -> Self {
        Self::with_parent(NodeId::NONE, None, state, color)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: Action, state: GameState, color: Player) -> Self {
        Self::with_parent(parent, Some(action), state, color)
    }

    fn with_parent(
        parent: NodeId,
        action: Option<Action>,
        state: GameState,
        color: Player,
    ) -> Self {
        Self {
            parent,
            action,
            untried: state.legal_actions().into(),
            state,
            color,
            children: Vec::new(),
            visit_count: 0,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Every legal action has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Signed outcome tally from the perspective of the player who moved
    /// into this node (the parent's color): +1 per outcome that player won,
    /// -1 per outcome it lost, 0 per draw.
    ///
    /// Tallies are stored relative to `color`, the player to move here, so a
    /// loss for `color` is a win for the mover.
    #[inline]
    pub fn q(&self) -> i64 {
        self.losses as i64 - self.wins as i64
    }

    /// Mean outcome Q/N for the player who moved into this node.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.q() as f64 / self.visit_count as f64
        }
    }

    /// UCB1 score for child selection.
    /// UCB1 = Q/N + c * sqrt(2 * ln(N_parent) / N)
    ///
    /// Takes pre-computed ln(N_parent) to avoid redundant logarithms when
    /// comparing siblings. Must not be called on an unvisited node.
    #[inline]
    pub fn ucb_score(&self, ln_parent_visits: f64, exploration: f64) -> f64 {
        debug_assert!(self.visit_count > 0, "UCB1 scored an unvisited node");
        let n = self.visit_count as f64;
        self.mean_value() + exploration * (2.0 * ln_parent_visits / n).sqrt()
    }

    /// Count one simulation result, classified against this node's color.
    pub fn record(&mut self, result: Option<Player>) {
        self.visit_count += 1;
        match result {
            Some(winner) if winner == self.color => self.wins += 1,
            None => self.draws += 1,
            Some(_) => self.losses += 1,
        }
    }
}
