#![no_main]
use std::io::Cursor;

use gambit::game::{Game, Settings};
use gambit::interface::text::TextInterface;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut game = Game::standard("White", "Black", Settings::default()).unwrap();
    let mut interface = TextInterface::new(Cursor::new(data), Vec::new());
    // Malformed input is answered on the output and never fails the game.
    let _ = game.run(&mut interface).unwrap();
});
