//! # Connect Four MC
//!
//! Rules engine for generalized Connect Four (3 to 8 rows and columns,
//! configurable win length, optional diagonals) with a computer opponent that
//! scores moves by Monte-Carlo rollouts.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, state machine
//! - [`ai`]: Agent trait, random agent, Monte-Carlo move selector
//! - [`arena`]: Headless games between agents and match statistics
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
