//! Rules engine for two-player chess played on a single board.
//!
//! The [`chess`] module knows how the pieces move and when the game is over,
//! [`game`] alternates the players and keeps the history, and [`interface`]
//! connects a game to humans.
//!
//! ```
//! use gambit::chess::core::{Color, Move, Square};
//! use gambit::game::{Game, Settings, Transition};
//!
//! let mut game = Game::standard("Alice", "Bob", Settings::default()).unwrap();
//! let transition = game
//!     .play(Move::new(Square::new(6, 4), Square::new(4, 4)))
//!     .unwrap();
//! assert!(matches!(transition, Transition::Applied(_)));
//! assert_eq!(game.turn(), Color::Black);
//! ```

pub mod chess;
pub mod game;
pub mod interface;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version banner on startup.
pub fn print_engine_info() {
    println!("Gambit {}", engine_version());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
}
