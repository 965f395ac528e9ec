//! Monte-Carlo rollout evaluation.
//!
//! Every legal column is scored by dropping a piece there on a cloned board and
//! averaging the results of uniformly random playouts to the end of the game.
//! Playouts run in batches on rayon; each batch owns its board clone and RNG,
//! so results only depend on the seed, never on scheduling.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::error::{ConfigError, MoveError};
use crate::game::{Board, Player};

/// Rollout selector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Playouts per candidate column
    pub playout_count: usize,
    /// Fixed seed for reproducible decisions; drawn from the OS when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Playouts run sequentially by one rayon task
    pub batch_size: usize,
    /// Dedicated worker threads; 0 uses the global rayon pool
    pub threads: usize,
    /// Stop issuing new batches once this much wall-clock time has passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            playout_count: 1000,
            seed: None,
            batch_size: 100,
            threads: 0,
            time_budget_ms: None,
        }
    }
}

/// Aggregated playout results for one candidate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnScore {
    pub column: usize,
    pub playouts: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl ColumnScore {
    fn new(column: usize) -> Self {
        ColumnScore {
            column,
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: i32) {
        self.playouts += 1;
        match outcome.signum() {
            1 => self.wins += 1,
            -1 => self.losses += 1,
            _ => self.draws += 1,
        }
    }

    fn merge(&mut self, other: &ColumnScore) {
        self.playouts += other.playouts;
        self.wins += other.wins;
        self.losses += other.losses;
        self.draws += other.draws;
    }

    /// Sum of playout outcomes (+1 win, -1 loss, 0 draw)
    pub fn total(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }

    /// Average outcome in [-1, 1]; 0 when no playout ran
    pub fn mean(&self) -> f64 {
        if self.playouts == 0 {
            return 0.0;
        }
        self.total() as f64 / self.playouts as f64
    }
}

/// Result of evaluating every legal column of a position.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Side the scores are relative to
    pub player: Player,
    /// One entry per legal column, ascending by column
    pub scores: Vec<ColumnScore>,
}

impl Evaluation {
    /// Column with the highest mean; ties go to the lowest column.
    pub fn best_column(&self) -> Option<usize> {
        let mut best: Option<&ColumnScore> = None;
        for score in &self.scores {
            if best.map_or(true, |b| score.mean() > b.mean()) {
                best = Some(score);
            }
        }
        best.map(|score| score.column)
    }

    pub fn total_playouts(&self) -> usize {
        self.scores.iter().map(|s| s.playouts).sum()
    }

    pub fn score(&self, column: usize) -> Option<&ColumnScore> {
        self.scores.iter().find(|s| s.column == column)
    }
}

/// Chooses columns by rollout evaluation. Never mutates the caller's board.
pub struct MoveSelector {
    config: MonteCarloConfig,
    pool: Option<rayon::ThreadPool>,
}

impl MoveSelector {
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        let pool = if config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .build()
                .map_err(|e| {
                    ConfigError::InvalidConfiguration(format!(
                        "failed to build rollout thread pool: {e}"
                    ))
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(MoveSelector { config, pool })
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Choose a column for the side to move, using the configured seed.
    pub fn choose_column(&self, board: &Board) -> Result<usize, MoveError> {
        self.choose_column_with_seed(board, self.config.seed)
    }

    /// Choose a column for the side to move.
    ///
    /// The opening move of a game is picked uniformly at random without
    /// simulation.
    pub fn choose_column_with_seed(
        &self,
        board: &Board,
        seed: Option<u64>,
    ) -> Result<usize, MoveError> {
        if !board.contains_empty_cell() {
            return Err(MoveError::NoLegalMove);
        }
        let seed = seed.unwrap_or_else(rand::random);

        if board.piece_count() == 0 {
            let mut rng = StdRng::seed_from_u64(seed);
            return board.random_move(&mut rng);
        }

        self.evaluate_with_seed(board, seed)?
            .best_column()
            .ok_or(MoveError::NoLegalMove)
    }

    /// Score every legal column from the perspective of the side to move.
    pub fn evaluate(&self, board: &Board) -> Result<Evaluation, MoveError> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.evaluate_with_seed(board, seed)
    }

    pub fn evaluate_with_seed(&self, board: &Board, seed: u64) -> Result<Evaluation, MoveError> {
        let candidates = board.possible_drops();
        if candidates.is_empty() {
            return Err(MoveError::NoLegalMove);
        }

        let start = Instant::now();
        let deadline = self
            .config
            .time_budget_ms
            .map(|ms| start + Duration::from_millis(ms));
        let perspective = board.current_turn();
        let batch_size = self.config.batch_size.max(1);
        let playout_count = self.config.playout_count;
        let batches = playout_count.div_ceil(batch_size);

        // Without a deadline every batch goes out in a single parallel pass;
        // with one, batches go out one round per column at a time.
        let per_pass = if deadline.is_some() { 1 } else { batches.max(1) };

        let mut scores: Vec<ColumnScore> = candidates.iter().map(|&c| ColumnScore::new(c)).collect();
        let mut next_batch = 0;

        while next_batch < batches {
            let end = (next_batch + per_pass).min(batches);
            let jobs: Vec<(usize, usize)> = (0..candidates.len())
                .flat_map(|slot| (next_batch..end).map(move |batch| (slot, batch)))
                .collect();

            let partials: Vec<(usize, ColumnScore)> = self.install(|| {
                jobs.par_iter()
                    .map(|&(slot, batch)| {
                        let column = candidates[slot];
                        let count = batch_size.min(playout_count - batch * batch_size);
                        let partial = run_batch(
                            board,
                            column,
                            perspective,
                            count,
                            batch_seed(seed, column, batch),
                        );
                        (slot, partial)
                    })
                    .collect()
            });

            for (slot, partial) in &partials {
                scores[*slot].merge(partial);
            }

            next_batch = end;
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
        }

        Ok(Evaluation {
            player: perspective,
            scores,
        })
    }

    fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

/// One-shot column choice with default batching on the global pool.
pub fn choose_column(
    board: &Board,
    playout_count: usize,
    seed: Option<u64>,
) -> Result<usize, MoveError> {
    let selector = MoveSelector {
        config: MonteCarloConfig {
            playout_count,
            seed,
            ..Default::default()
        },
        pool: None,
    };
    selector.choose_column(board)
}

/// Play uniformly random moves on `board` until the game ends.
///
/// Returns +1 if `perspective` wins, -1 if the other side wins and 0 for a
/// draw. `board` is expected to have the side that did not make the last
/// move on turn.
pub fn playout<R: Rng + ?Sized>(mut board: Board, perspective: Player, rng: &mut R) -> i32 {
    if let Some(winner) = board.winner() {
        return outcome_for(winner, perspective);
    }

    while board.contains_empty_cell() {
        let Ok(column) = board.random_move(rng) else {
            break;
        };
        let mover = board.current_turn();
        if board.drop_in_column(column).is_err() {
            break;
        }
        if board.last_move_wins() {
            return outcome_for(mover, perspective);
        }
        board.switch_player();
    }

    0
}

fn outcome_for(winner: Player, perspective: Player) -> i32 {
    if winner == perspective {
        1
    } else {
        -1
    }
}

fn batch_seed(seed: u64, column: usize, batch: usize) -> u64 {
    seed.wrapping_add((column as u64) << 32)
        .wrapping_add(batch as u64)
}

/// Run `count` playouts after dropping at `column` on a clone of `board`.
fn run_batch(
    board: &Board,
    column: usize,
    perspective: Player,
    count: usize,
    seed: u64,
) -> ColumnScore {
    let mut score = ColumnScore::new(column);

    let mut start = board.clone();
    if start.drop_in_column(column).is_err() {
        return score;
    }

    // The candidate itself ends the game: every playout agrees
    if start.last_move_wins() {
        for _ in 0..count {
            score.record(1);
        }
        return score;
    }
    start.switch_player();

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..count {
        score.record(playout(start.clone(), perspective, &mut rng));
    }
    score
}

/// Agent backed by a [`MoveSelector`].
///
/// With a configured seed, each decision draws its own seed from a generator
/// seeded once, so a whole game replays identically.
pub struct MonteCarloAgent {
    selector: MoveSelector,
    seeds: Option<StdRng>,
}

impl MonteCarloAgent {
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        let seeds = config.seed.map(StdRng::seed_from_u64);
        Ok(MonteCarloAgent {
            selector: MoveSelector::new(config)?,
            seeds,
        })
    }

    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }
}

impl Agent for MonteCarloAgent {
    fn select_action(&mut self, board: &Board) -> Result<usize, MoveError> {
        let seed = self.seeds.as_mut().map(|rng| rng.random());
        self.selector.choose_column_with_seed(board, seed)
    }

    fn name(&self) -> &str {
        "Monte-Carlo"
    }
}
