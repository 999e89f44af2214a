//! Turn-taking game driver
//!
//! X always moves first; the driver asks the agent seated at the current
//! color for an action and applies it with that color's mark until the board
//! is terminal. The color to move is read off the board.

use anyhow::{Context, Result};
use games_tictactoe::{GameState, Player};
use tracing::debug;

use crate::agents::Agent;

/// Final result of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Option<Player>,
    pub moves: u32,
    pub final_state: GameState,
}

impl GameOutcome {
    pub fn describe(&self) -> String {
        match self.winner {
            Some(player) => format!("{} wins", player),
            None => "Draw".to_string(),
        }
    }
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    moves: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Empty board with X to move.
    pub fn new() -> Self {
        Self {
            state: GameState::new(),
            moves: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Color whose turn it is.
    pub fn to_move(&self) -> Player {
        self.state.next_player()
    }

    /// Ask `agent` for the current player's move and apply it.
    pub fn step(&mut self, agent: &mut dyn Agent) -> Result<()> {
        let player = self.to_move();
        let action = agent.get_action(&self.state)?;
        self.state = self
            .state
            .apply(action, player)
            .with_context(|| format!("{} played an illegal move {}", player, action))?;
        self.moves += 1;

        debug!(%player, %action, moves = self.moves, "Move played");
        Ok(())
    }

    /// Play until the board is terminal with `x` and `o` alternating.
    pub fn play(&mut self, x: &mut dyn Agent, o: &mut dyn Agent) -> Result<GameOutcome> {
        while !self.is_over() {
            match self.to_move() {
                Player::X => self.step(x)?,
                Player::O => self.step(o)?,
            }
        }

        Ok(GameOutcome {
            winner: self.state.winner(),
            moves: self.moves,
            final_state: self.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{MctsAgent, RandomAgent};
    use anyhow::anyhow;
    use games_tictactoe::Action;
    use mcts::MctsConfig;
    use std::collections::VecDeque;

    /// Plays a fixed list of moves and records the boards it was shown.
    struct ScriptedAgent {
        moves: VecDeque<Action>,
        seen: Vec<GameState>,
    }

    impl ScriptedAgent {
        fn new(moves: &[(usize, usize)]) -> Self {
            Self {
                moves: moves.iter().map(|&m| Action::from(m)).collect(),
                seen: Vec::new(),
            }
        }
    }

    impl Agent for ScriptedAgent {
        fn get_action(&mut self, state: &GameState) -> Result<Action> {
            self.seen.push(*state);
            self.moves
                .pop_front()
                .ok_or_else(|| anyhow!("script exhausted"))
        }
    }

    #[test]
    fn test_x_moves_first_and_players_alternate() {
        let mut x = ScriptedAgent::new(&[(0, 0), (0, 1), (0, 2)]);
        let mut o = ScriptedAgent::new(&[(1, 0), (1, 1)]);

        let outcome = Game::new().play(&mut x, &mut o).unwrap();

        assert_eq!(outcome.winner, Some(Player::X));
        assert_eq!(outcome.moves, 5);
        assert_eq!(
            outcome.final_state.rows(),
            [[1, 1, 1], [-1, -1, 0], [0, 0, 0]]
        );
        assert_eq!(outcome.describe(), "X wins");

        // X saw the empty board first, O saw X's opening move
        assert_eq!(x.seen[0], GameState::new());
        assert_eq!(o.seen[0].rows(), [[1, 0, 0], [0, 0, 0], [0, 0, 0]]);
        assert_eq!(x.seen.len(), 3);
        assert_eq!(o.seen.len(), 2);
    }

    #[test]
    fn test_turn_follows_the_board() {
        let mut game = Game::new();
        assert_eq!(game.to_move(), Player::X);

        let mut x = ScriptedAgent::new(&[(2, 2)]);
        game.step(&mut x).unwrap();
        assert_eq!(game.to_move(), Player::O);
        assert_eq!(game.state.rows(), [[0, 0, 0], [0, 0, 0], [0, 0, 1]]);

        let mut o = ScriptedAgent::new(&[(0, 0)]);
        game.step(&mut o).unwrap();
        assert_eq!(game.to_move(), Player::X);
        assert_eq!(game.state.rows(), [[-1, 0, 0], [0, 0, 0], [0, 0, 1]]);
        assert_eq!(game.moves, 2);
    }

    #[test]
    fn test_draw_fills_the_board() {
        let mut x = ScriptedAgent::new(&[(0, 0), (0, 2), (1, 0), (2, 1), (2, 2)]);
        let mut o = ScriptedAgent::new(&[(0, 1), (1, 1), (1, 2), (2, 0)]);

        let outcome = Game::new().play(&mut x, &mut o).unwrap();

        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.moves, 9);
        assert_eq!(outcome.describe(), "Draw");
    }

    #[test]
    fn test_illegal_move_is_an_error() {
        let mut x = ScriptedAgent::new(&[(1, 1)]);
        let mut o = ScriptedAgent::new(&[(1, 1)]);

        let mut game = Game::new();
        let err = game.play(&mut x, &mut o).unwrap_err();
        assert!(err.to_string().contains("illegal move"));

        // The failed move left the board and turn untouched
        assert_eq!(game.state.occupied_count(), 1);
        assert_eq!(game.to_move(), Player::O);
    }

    #[test]
    fn test_out_of_range_move_is_an_error() {
        let mut x = ScriptedAgent::new(&[(3, 0)]);
        let mut o = ScriptedAgent::new(&[]);
        assert!(Game::new().play(&mut x, &mut o).is_err());
    }

    #[test]
    fn test_random_games_finish() {
        for seed in 0..20 {
            let mut x = RandomAgent::with_seed(seed);
            let mut o = RandomAgent::with_seed(seed + 1000);

            let outcome = Game::new().play(&mut x, &mut o).unwrap();

            assert!(outcome.final_state.is_terminal());
            assert!((5..=9).contains(&outcome.moves), "seed={}", seed);
            assert_eq!(outcome.winner, outcome.final_state.winner());
            assert_eq!(outcome.moves as usize, outcome.final_state.occupied_count());
        }
    }

    #[test]
    fn test_mcts_self_play_finishes() {
        let config = MctsConfig::for_testing();
        let mut x = MctsAgent::with_seed(Player::X, config.clone(), 1);
        let mut o = MctsAgent::with_seed(Player::O, config, 2);

        let outcome = Game::new().play(&mut x, &mut o).unwrap();
        assert!(outcome.final_state.is_terminal());
    }
}
