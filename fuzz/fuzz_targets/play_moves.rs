#![no_main]
use gambit::chess::board::Board;
use gambit::chess::core::{Move, Square};
use gambit::game::{Game, Settings, Transition};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Some((&first, data)) = data.split_first() else {
        return;
    };
    let settings = Settings {
        king_safety: first % 2 == 1,
    };
    let mut game = Game::standard("White", "Black", settings).unwrap();
    for chunk in data.chunks_exact(4) {
        let next_move = Move::new(
            Square::new(chunk[0] % 9, chunk[1] % 9),
            Square::new(chunk[2] % 9, chunk[3] % 9),
        );
        let before = game.board().clone();
        match game.play(next_move).unwrap() {
            Transition::Rejected(_) => assert_eq!(game.board(), &before),
            Transition::Applied(record) => {
                assert_eq!(game.board().piece_at(next_move.to), Some(record.piece));
                assert_eq!(game.board().piece_at(next_move.from), None);
            },
        }
    }
    while game.undo().unwrap().is_some() {}
    assert_eq!(game.board(), &Board::starting());
    assert!(game.captured().is_empty());
});
