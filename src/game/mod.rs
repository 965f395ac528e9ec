//! Core game logic: board with gravity and configurable win rules, players,
//! and the per-game state machine.

mod board;
mod player;
mod state;

pub(crate) use board::validate_shape;
pub use board::{Axis, Board, Cell, MAX_DIMENSION, MIN_DIMENSION};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveReport, Phase};
