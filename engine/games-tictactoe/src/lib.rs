//! Tic-tac-toe rules for the MCTS engine
//!
//! This crate owns the board representation and every rule query the search
//! needs: legal moves, terminal detection, the winner, and applying a move.
//! States are small `Copy` values, so applying a move always produces a new,
//! independent state and never mutates the original.
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{Action, GameState, Player};
//!
//! let state = GameState::new();
//! let next = state.apply(Action::new(1, 1), Player::X).unwrap();
//!
//! assert_eq!(next.legal_actions().len(), 8);
//! assert!(!next.is_terminal());
//! println!("{next}");
//! ```

use std::fmt;
use thiserror::Error;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: usize = 3;

const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Winning lines as row-major cell indices (rows, columns, diagonals).
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Errors raised by board construction and move application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell ({row}, {col}) is outside the 3x3 board")]
    OutOfBounds { row: usize, col: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("invalid value {value} at ({row}, {col}), expected -1, 0 or 1")]
    InvalidCell { row: usize, col: usize, value: i8 },
}

/// One of the two players. X is stored as +1 on the grid, O as -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Grid value of this player's mark.
    pub fn value(self) -> i8 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }

    /// The other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Map a grid value back to a player. Empty cells (0) map to `None`.
    pub fn from_value(value: i8) -> Option<Player> {
        match value {
            1 => Some(Player::X),
            -1 => Some(Player::O),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A move: the (row, column) of the cell to mark, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether both coordinates fall inside the grid.
    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    fn index(&self) -> Option<usize> {
        self.is_on_board().then_some(self.row * BOARD_SIZE + self.col)
    }

    fn from_index(index: usize) -> Self {
        Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
    }
}

impl From<(usize, usize)> for Action {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Immutable snapshot of the board.
///
/// Cells hold +1 (X), -1 (O) or 0 (empty) in row-major order. Every
/// constructor keeps cell values inside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    cells: [i8; NUM_CELLS],
}

impl GameState {
    /// The empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from rows of grid values.
    pub fn from_rows(rows: [[i8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, GameError> {
        let mut cells = [0i8; NUM_CELLS];
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !(-1..=1).contains(&value) {
                    return Err(GameError::InvalidCell { row, col, value });
                }
                cells[row * BOARD_SIZE + col] = value;
            }
        }
        Ok(Self { cells })
    }

    /// The board as rows of grid values.
    pub fn rows(&self) -> [[i8; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[0i8; BOARD_SIZE]; BOARD_SIZE];
        for (index, &value) in self.cells.iter().enumerate() {
            rows[index / BOARD_SIZE][index % BOARD_SIZE] = value;
        }
        rows
    }

    /// Grid value at `action`'s cell, or `None` if it is off the board.
    pub fn cell(&self, action: Action) -> Option<i8> {
        action.index().map(|index| self.cells[index])
    }

    /// Every empty cell in row-major order.
    pub fn legal_actions(&self) -> Vec<Action> {
        (0..NUM_CELLS)
            .filter(|&index| self.cells[index] == 0)
            .map(Action::from_index)
            .collect()
    }

    /// Number of marked cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != 0).count()
    }

    /// True once a line is complete or the board is full.
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.cells.iter().all(|&cell| cell != 0)
    }

    /// The player owning a completed line, if any.
    pub fn winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a];
            if mark != 0 && mark == self.cells[b] && mark == self.cells[c] {
                Player::from_value(mark)
            } else {
                None
            }
        })
    }

    /// Player to move under normal alternation with X starting.
    pub fn next_player(&self) -> Player {
        let x_count = self.cells.iter().filter(|&&cell| cell == 1).count();
        let o_count = self.cells.iter().filter(|&&cell| cell == -1).count();
        if x_count > o_count {
            Player::O
        } else {
            Player::X
        }
    }

    /// Return a new state with `action`'s cell set to `mark`.
    ///
    /// The receiver is left untouched. Fails if the cell is off the board or
    /// already marked.
    pub fn apply(&self, action: Action, mark: Player) -> Result<GameState, GameError> {
        let index = action.index().ok_or(GameError::OutOfBounds {
            row: action.row,
            col: action.col,
        })?;

        if self.cells[index] != 0 {
            return Err(GameError::Occupied {
                row: action.row,
                col: action.col,
            });
        }

        let mut next = *self;
        next.cells[index] = mark.value();
        Ok(next)
    }
}

fn cell_symbol(value: i8) -> char {
    Player::from_value(value).map_or(' ', Player::symbol)
}

/// Renders the grid as
///
/// ```text
/// X│ │O
/// ─┼─┼─
///  │X│
/// ─┼─┼─
/// O│ │
/// ```
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 {
                writeln!(f, "─┼─┼─")?;
            }
            let start = row * BOARD_SIZE;
            let symbols: Vec<String> = self.cells[start..start + BOARD_SIZE]
                .iter()
                .map(|&value| cell_symbol(value).to_string())
                .collect();
            writeln!(f, "{}", symbols.join("│"))?;
        }
        Ok(())
    }
}
