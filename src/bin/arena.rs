use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;

use connect_four_mc::ai::{Agent, MonteCarloAgent, MonteCarloConfig, RandomAgent};
use connect_four_mc::arena::{play_game, series_config, MatchStats};
use connect_four_mc::config::AppConfig;
use connect_four_mc::game::{Board, Player};

/// Play a series of headless games between the Monte-Carlo agent and an opponent.
#[derive(Parser)]
#[command(name = "arena", about = "Pit the Monte-Carlo agent against an opponent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of games to play
    #[arg(long, default_value_t = 20)]
    games: usize,

    /// Override playouts per column for the Monte-Carlo agent
    #[arg(long)]
    playouts: Option<usize>,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Opponent: random or monte-carlo
    #[arg(long, default_value = "random")]
    opponent: String,

    /// Playouts per column for a monte-carlo opponent
    #[arg(long, default_value_t = 100)]
    opponent_playouts: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.opponent.as_str() {
        "random" | "monte-carlo" => {}
        other => bail!("unknown opponent '{}' (expected 'random' or 'monte-carlo')", other),
    }

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(playouts) = cli.playouts {
        app_config.selector.playout_count = playouts;
    }
    app_config.validate().context("validating configuration")?;

    let board_config = &app_config.board;
    println!(
        "Arena: {} games on {}x{} (connect {}, diagonals {}), Monte-Carlo {} playouts vs {}",
        cli.games,
        board_config.rows,
        board_config.columns,
        board_config.win_length,
        if board_config.allow_diagonal { "on" } else { "off" },
        app_config.selector.playout_count,
        cli.opponent,
    );
    println!("-------------------------------------------");

    let mut stats = MatchStats::new();
    let start = Instant::now();

    for game in 0..cli.games {
        let mc_config = series_config(&app_config.selector, cli.seed, game);
        let game_seed = mc_config.seed;

        let mut mc = MonteCarloAgent::new(mc_config).context("building Monte-Carlo agent")?;
        let mut opponent = build_opponent(&cli, &app_config.selector, game_seed)?;

        // Alternate who opens so neither side keeps the first-move advantage
        let first = if game % 2 == 0 { Player::A } else { Player::B };
        let board = Board::from_config(board_config, first).context("building board")?;

        let record = play_game(board, &mut mc, opponent.as_mut())
            .with_context(|| format!("playing game {}", game + 1))?;
        stats.record(record);

        let result = match record.winner {
            Some(Player::A) => mc.name().to_string(),
            Some(Player::B) => opponent.name().to_string(),
            None => "draw".to_string(),
        };
        println!(
            "Game {}/{} | first: {} | moves: {} | result: {}",
            game + 1,
            cli.games,
            if first == Player::A { mc.name() } else { opponent.name() },
            record.game_length,
            result,
        );
    }

    println!("-------------------------------------------");
    println!(
        "Monte-Carlo win rate: {:.1}% | opponent: {:.1}% | draw: {:.1}% | avg_len: {:.1} | {:.1}s",
        stats.win_rate(Player::A) * 100.0,
        stats.win_rate(Player::B) * 100.0,
        stats.draw_rate() * 100.0,
        stats.average_game_length(),
        start.elapsed().as_secs_f32(),
    );
    Ok(())
}

fn build_opponent(
    cli: &Cli,
    selector: &MonteCarloConfig,
    seed: Option<u64>,
) -> Result<Box<dyn Agent>> {
    let opponent_seed = seed.map(|s| s ^ 0x5eed);
    match cli.opponent.as_str() {
        "monte-carlo" => {
            let agent = MonteCarloAgent::new(MonteCarloConfig {
                playout_count: cli.opponent_playouts,
                seed: opponent_seed,
                ..selector.clone()
            })
            .context("building Monte-Carlo opponent")?;
            Ok(Box::new(agent))
        }
        _ => Ok(Box::new(match opponent_seed {
            Some(s) => RandomAgent::with_seed(s),
            None => RandomAgent::new(),
        })),
    }
}
