use std::io;

use clap::Parser;
use gambit::chess::board::Board;
use gambit::chess::core::Color;
use gambit::game::{Game, Player, Settings};
use gambit::interface::text::TextInterface;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Two-player chess in the terminal. Moves are entered as
/// `<from_row> <from_col> <to_row> <to_col>`, rows are counted from the top
/// (Black's side).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Name of the player with the white pieces.
    #[arg(long, default_value = "White")]
    white: String,
    /// Name of the player with the black pieces.
    #[arg(long, default_value = "Black")]
    black: String,
    /// Reject moves that leave the mover's own king in check.
    #[arg(long)]
    king_safety: bool,
    /// Log filter used when `RUST_LOG` is not set, e.g. `gambit=debug`.
    #[arg(long, default_value = "warn")]
    log: String,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config.log);
    gambit::print_engine_info();

    let settings = Settings {
        king_safety: config.king_safety,
    };
    let mut game = Game::new(
        Board::starting(),
        Player::new(config.white, Color::White),
        Player::new(config.black, Color::Black),
        settings,
    )?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut interface = TextInterface::new(stdin.lock(), stdout.lock());
    interface.greet()?;
    let outcome = game.run(&mut interface)?;
    info!(?outcome, moves = game.history().len(), "finished");
    Ok(())
}
