use super::{Board, Player};
use crate::config::AppConfig;
use crate::error::{ConfigError, MoveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Where the game stands between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove(Player),
    GameOver(GameOutcome),
}

/// What happened when a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub column: usize,
    pub row: usize,
    pub player: Player,
    pub outcome: Option<GameOutcome>,
}

/// A live game: owns the board and serializes drop, terminal check and turn
/// switch so that no move is applied before the previous one is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Start a game on a fresh board
    pub fn new(board: Board) -> Self {
        let outcome = Self::terminal_outcome(&board);
        GameState { board, outcome }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let board = Board::from_config(&config.board, config.play.first_player)?;
        Ok(Self::new(board))
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.board.current_turn()
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn phase(&self) -> Phase {
        match self.outcome {
            Some(outcome) => Phase::GameOver(outcome),
            None => Phase::AwaitingMove(self.board.current_turn()),
        }
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.possible_drops()
    }

    /// Apply a move for the current player.
    ///
    /// A rejected move leaves the board and the turn untouched. After a
    /// successful drop the game either ends or passes to the other side.
    pub fn play(&mut self, column: usize) -> Result<MoveReport, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.board.current_turn();
        let row = self.board.drop_in_column(column)?;

        self.outcome = if self.board.check_for_winner() {
            Some(GameOutcome::Winner(player))
        } else if !self.board.contains_empty_cell() {
            Some(GameOutcome::Draw)
        } else {
            self.board.switch_player();
            None
        };

        Ok(MoveReport {
            column,
            row,
            player,
            outcome: self.outcome,
        })
    }

    fn terminal_outcome(board: &Board) -> Option<GameOutcome> {
        if let Some(player) = board.winner() {
            Some(GameOutcome::Winner(player))
        } else if !board.contains_empty_cell() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }
}
