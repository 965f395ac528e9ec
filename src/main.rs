use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use connect_four_mc::ai::{Agent, MonteCarloAgent};
use connect_four_mc::config::AppConfig;
use connect_four_mc::error::MoveError;
use connect_four_mc::game::{GameOutcome, GameState};

/// Play Connect Four against the Monte-Carlo opponent in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of rows (3-8)
    #[arg(long)]
    rows: Option<usize>,

    /// Override number of columns (3-8)
    #[arg(long)]
    columns: Option<usize>,

    /// Override how many connected pieces win
    #[arg(long)]
    win_length: Option<usize>,

    /// Only count horizontal and vertical lines
    #[arg(long)]
    no_diagonal: bool,

    /// Override playouts per column
    #[arg(long)]
    playouts: Option<usize>,

    /// Seed for reproducible computer moves
    #[arg(long)]
    seed: Option<u64>,

    /// Let the computer open the game
    #[arg(long)]
    computer_first: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    apply_overrides(&cli, &mut config);
    config.validate().context("validating configuration")?;

    let mut computer =
        MonteCarloAgent::new(config.selector.clone()).context("building computer player")?;
    let mut state = GameState::from_config(&config).context("building board")?;
    let human = config.play.human_player;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!(
        "Connect {} on a {}x{} board{}. You play {}.",
        state.board().win_length(),
        state.board().rows(),
        state.board().columns(),
        if state.board().allows_diagonal() { "" } else { " (no diagonals)" },
        human.symbol(),
    );

    while !state.is_terminal() {
        println!("\n{}\n", state.board());

        let column = if state.current_player() == human {
            print!("Your move (1-{}, q to quit): ", state.board().columns());
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line.context("reading move")?;
            let input = line.trim();
            if input.eq_ignore_ascii_case("q") {
                return Ok(());
            }
            match input.parse::<usize>() {
                Ok(n) if n >= 1 => n - 1,
                _ => {
                    println!("Enter a column number between 1 and {}.", state.board().columns());
                    continue;
                }
            }
        } else {
            let column = computer
                .select_action(state.board())
                .context("choosing computer move")?;
            println!("Computer drops in column {}.", column + 1);
            column
        };

        match state.play(column) {
            Ok(_) => {}
            Err(err @ (MoveError::ColumnFull(_) | MoveError::InvalidColumn { .. })) => {
                println!("{err}, try another column.");
            }
            Err(err) => return Err(err).context("applying move"),
        }
    }

    println!("\n{}\n", state.board());
    match state.outcome() {
        Some(GameOutcome::Winner(player)) if player == human => println!("You won!"),
        Some(GameOutcome::Winner(_)) => println!("You lose!"),
        Some(GameOutcome::Draw) | None => println!("Draw!"),
    }
    Ok(())
}

fn apply_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(rows) = cli.rows {
        config.board.rows = rows;
    }
    if let Some(columns) = cli.columns {
        config.board.columns = columns;
    }
    if let Some(win_length) = cli.win_length {
        config.board.win_length = win_length;
    }
    if cli.no_diagonal {
        config.board.allow_diagonal = false;
    }
    if let Some(playouts) = cli.playouts {
        config.selector.playout_count = playouts;
    }
    if cli.seed.is_some() {
        config.selector.seed = cli.seed;
    }
    if cli.computer_first {
        config.play.first_player = config.play.human_player.other();
    }
}
