//! Headless games between two agents and aggregate statistics.

use crate::ai::{Agent, MonteCarloConfig};
use crate::error::MoveError;
use crate::game::{Board, GameOutcome, GameState, Player};

/// Result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub winner: Option<Player>,
    pub game_length: usize,
}

/// Play one game to completion. `agent_a` moves for [`Player::A`], `agent_b`
/// for [`Player::B`]; the board decides who opens.
pub fn play_game(
    board: Board,
    agent_a: &mut dyn Agent,
    agent_b: &mut dyn Agent,
) -> Result<GameRecord, MoveError> {
    let mut state = GameState::new(board);
    let mut game_length = 0;

    while !state.is_terminal() {
        let column = match state.current_player() {
            Player::A => agent_a.select_action(state.board())?,
            Player::B => agent_b.select_action(state.board())?,
        };
        state.play(column)?;
        game_length += 1;
    }

    let winner = match state.outcome() {
        Some(GameOutcome::Winner(player)) => Some(player),
        Some(GameOutcome::Draw) | None => None,
    };

    Ok(GameRecord {
        winner,
        game_length,
    })
}

/// Selector settings for game `game` of a series.
///
/// `seed_override` wins over the configured seed; whichever is set is offset by
/// the game index so every game differs but the whole series replays.
pub fn series_config(
    base: &MonteCarloConfig,
    seed_override: Option<u64>,
    game: usize,
) -> MonteCarloConfig {
    MonteCarloConfig {
        seed: seed_override
            .or(base.seed)
            .map(|seed| seed.wrapping_add(game as u64)),
        ..base.clone()
    }
}

/// Win/draw tallies over a series of games.
#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    records: Vec<GameRecord>,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: GameRecord) {
        self.records.push(record);
    }

    pub fn total_games(&self) -> usize {
        self.records.len()
    }

    pub fn wins(&self, player: Player) -> usize {
        self.records
            .iter()
            .filter(|r| r.winner == Some(player))
            .count()
    }

    pub fn draws(&self) -> usize {
        self.records.iter().filter(|r| r.winner.is_none()).count()
    }

    pub fn win_rate(&self, player: Player) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.wins(player) as f32 / self.records.len() as f32
    }

    pub fn draw_rate(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.draws() as f32 / self.records.len() as f32
    }

    pub fn average_game_length(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: usize = self.records.iter().map(|r| r.game_length).sum();
        total as f32 / self.records.len() as f32
    }
}
