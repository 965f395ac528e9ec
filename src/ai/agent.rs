use crate::error::MoveError;
use crate::game::Board;

/// Universal interface for move policies.
pub trait Agent {
    /// Select a column for the side to move on `board`.
    ///
    /// Returns [`MoveError::NoLegalMove`] when the board is full.
    fn select_action(&mut self, board: &Board) -> Result<usize, MoveError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
