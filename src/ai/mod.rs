mod agent;
pub mod monte_carlo;
mod random;

pub use agent::Agent;
pub use monte_carlo::{
    choose_column, ColumnScore, Evaluation, MonteCarloAgent, MonteCarloConfig, MoveSelector,
};
pub use random::RandomAgent;
