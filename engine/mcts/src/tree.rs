//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices.

use games_tictactoe::{Action, GameError, GameState, Player};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at `root_state` with `root_color` to move.
    pub fn new(root_state: GameState, root_color: Player) -> Self {
        let root_node = MctsNode::new_root(root_state, root_color);
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[cfg(test)]
    pub(crate) fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCB1 score.
    ///
    /// Ties go to the child expanded first. Returns `None` if the node has
    /// no children. Every child must have been visited at least once, which
    /// holds because each expansion is immediately followed by a rollout.
    pub fn best_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        self.best_child_entry(node_id, exploration).map(|(_, id)| id)
    }

    /// Like [`best_child`](Self::best_child), but also returns the action
    /// leading to the selected child.
    pub fn best_child_entry(
        &self,
        node_id: NodeId,
        exploration: f64,
    ) -> Option<(Action, NodeId)> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let ln_parent_visits = (node.visit_count as f64).ln();

        let mut best: Option<((Action, NodeId), f64)> = None;
        for &(action, child_id) in &node.children {
            let score = self.get(child_id).ucb_score(ln_parent_visits, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some(((action, child_id), score)),
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// Add a child reached by `action` from `parent_id`.
    /// The child's color is the opponent of the parent's.
    pub fn add_child(&mut self, parent_id: NodeId, action: Action, state: GameState) -> NodeId {
        let color = self.get(parent_id).color.opponent();
        let child = MctsNode::new_child(parent_id, action, state, color);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push((action, child_id));

        child_id
    }

    /// Expand the next untried action of `node_id`.
    ///
    /// Untried actions are consumed front first, so children appear in
    /// row-major order. Returns `Ok(None)` if every action already has a
    /// child.
    pub fn expand(&mut self, node_id: NodeId) -> Result<Option<NodeId>, GameError> {
        let node = self.get_mut(node_id);
        let Some(action) = node.untried.pop_front() else {
            return Ok(None);
        };
        let state = node.state.apply(action, node.color)?;
        Ok(Some(self.add_child(node_id, action, state)))
    }

    /// Count `result` on `leaf_id` and every ancestor up to the root.
    /// Each node classifies the result against its own color.
    pub fn backpropagate(&mut self, leaf_id: NodeId, result: Option<Player>) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.record(result);
            current_id = node.parent;
        }
    }

    /// Number of edges between `node_id` and the root.
    pub fn depth(&self, node_id: NodeId) -> u32 {
        let mut depth = 0;
        let mut current = self.get(node_id).parent;
        while current.is_some() {
            depth += 1;
            current = self.get(current).parent;
        }
        depth
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_tree() -> MctsTree {
        MctsTree::new(GameState::new(), Player::X)
    }

    #[test]
    fn test_new_tree() {
        let tree = empty_tree();

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.state, GameState::new());
        assert_eq!(root.color, Player::X);
    }

    #[test]
    fn test_add_child() {
        let mut tree = empty_tree();
        let state = GameState::new().apply(Action::new(0, 1), Player::X).unwrap();

        let child_id = tree.add_child(tree.root(), Action::new(0, 1), state);

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(Action::new(0, 1), NodeId(1))]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.action, Some(Action::new(0, 1)));
        assert_eq!(child.color, Player::O);
    }

    #[test]
    fn test_expand_in_row_major_order() {
        let mut tree = empty_tree();
        let root = tree.root();

        let mut expanded = Vec::new();
        while let Some(child_id) = tree.expand(root).unwrap() {
            let child = tree.get(child_id);
            let action = child.action.unwrap();
            // Child board carries the parent's mark in the expanded cell
            assert_eq!(child.state.cell(action), Some(Player::X.value()));
            expanded.push(action);
        }

        assert_eq!(expanded, GameState::new().legal_actions());
        assert!(tree.get(root).is_fully_expanded());
        assert_eq!(tree.get(root).children.len(), 9);
        assert_eq!(tree.expand(root).unwrap(), None);
    }

    #[test]
    fn test_backpropagate_classifies_per_node() {
        let mut tree = empty_tree();

        // Chain: root (X) -> child (O) -> grandchild (X)
        let child_id = tree.expand(tree.root()).unwrap().unwrap();
        let grandchild_id = tree.expand(child_id).unwrap().unwrap();

        tree.backpropagate(grandchild_id, Some(Player::X));
        tree.backpropagate(grandchild_id, None);

        for id in [tree.root(), child_id, grandchild_id] {
            assert_eq!(tree.get(id).visit_count, 2);
            assert_eq!(tree.get(id).draws, 1);
        }

        // X nodes count a win, the O node counts a loss
        assert_eq!(tree.get(tree.root()).wins, 1);
        assert_eq!(tree.get(child_id).losses, 1);
        assert_eq!(tree.get(grandchild_id).wins, 1);

        // From the root's perspective, moving into `child` has been good for X
        assert_eq!(tree.get(child_id).q(), 1);
    }

    #[test]
    fn test_best_child_prefers_higher_value() {
        let mut tree = empty_tree();
        let root = tree.root();
        let first = tree.expand(root).unwrap().unwrap();
        let second = tree.expand(root).unwrap().unwrap();

        // first: X lost once; second: X won once
        tree.backpropagate(first, Some(Player::O));
        tree.backpropagate(second, Some(Player::X));

        assert_eq!(tree.best_child(root, 0.0), Some(second));
        assert_eq!(tree.best_child(root, 0.1), Some(second));
    }

    #[test]
    fn test_best_child_ties_go_to_first_expanded() {
        let mut tree = empty_tree();
        let root = tree.root();
        let children: Vec<NodeId> = (0..3)
            .map(|_| tree.expand(root).unwrap().unwrap())
            .collect();

        for &child in &children {
            tree.backpropagate(child, None);
        }

        assert_eq!(tree.best_child(root, 0.0), Some(children[0]));
        assert_eq!(tree.best_child(root, 1.0), Some(children[0]));
    }

    #[test]
    fn test_best_child_exploration_favors_less_visited() {
        let mut tree = empty_tree();
        let root = tree.root();
        let first = tree.expand(root).unwrap().unwrap();
        let second = tree.expand(root).unwrap().unwrap();

        // Equal means, but `second` has far fewer visits
        for _ in 0..10 {
            tree.backpropagate(first, None);
        }
        tree.backpropagate(second, None);

        assert_eq!(tree.best_child(root, 0.0), Some(first));
        assert_eq!(tree.best_child(root, 1.0), Some(second));
    }

    #[test]
    fn test_best_child_entry_pairs_action_with_child() {
        let mut tree = empty_tree();
        let root = tree.root();
        let first = tree.expand(root).unwrap().unwrap();
        let second = tree.expand(root).unwrap().unwrap();

        tree.backpropagate(first, Some(Player::O));
        tree.backpropagate(second, Some(Player::X));

        // X won through the second child
        let (action, child) = tree.best_child_entry(root, 0.0).unwrap();
        assert_eq!(child, second);
        assert_eq!(action, Action::new(0, 1));
        assert_eq!(tree.get(child).action, Some(action));
        assert_eq!(tree.best_child(root, 0.0), Some(child));
        assert_eq!(tree.best_child_entry(first, 0.0), None);
    }

    #[test]
    fn test_best_child_without_children() {
        let tree = empty_tree();
        assert_eq!(tree.best_child(tree.root(), 0.1), None);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = empty_tree();
        let child = tree.expand(tree.root()).unwrap().unwrap();
        let grandchild = tree.expand(child).unwrap().unwrap();
        tree.expand(tree.root()).unwrap();
        tree.backpropagate(grandchild, None);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.root_visits, 1);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(tree.depth(grandchild), 2);
        assert_eq!(tree.depth(tree.root()), 0);
    }
}
