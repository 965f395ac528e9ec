use rand::rngs::StdRng;
use rand::SeedableRng;

use super::agent::Agent;
use crate::error::MoveError;
use crate::game::Board;

/// An agent that selects uniformly at random from legal columns.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, board: &Board) -> Result<usize, MoveError> {
        board.random_move(&mut self.rng)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
