use gambit::chess::board::Board;
use gambit::chess::core::{Color, Move, PieceKind, Square};
use gambit::chess::piece::Piece;
use gambit::chess::rules::{self, Outcome};
use itertools::iproduct;
use pretty_assertions::assert_eq;

fn setup(pieces: &[(char, u8, u8)]) -> Board {
    let mut board = Board::empty();
    for &(symbol, row, col) in pieces {
        board
            .place_piece(
                Piece::try_from(symbol).expect("valid piece symbol"),
                Square::new(row, col),
            )
            .expect("square is on the board");
    }
    board
}

const DIRECTIONS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[test]
fn queen_check_can_be_blocked() {
    let board = setup(&[('K', 7, 4), ('q', 0, 4), ('k', 0, 0)]);
    assert!(rules::is_in_check(&board, Square::new(7, 4), Color::White));

    let board = setup(&[('K', 7, 4), ('P', 6, 4), ('q', 0, 4), ('k', 0, 0)]);
    assert!(!rules::is_in_check(&board, Square::new(7, 4), Color::White));
}

#[test]
fn starting_position_is_not_terminal() {
    let mut board = Board::starting();
    for color in [Color::White, Color::Black] {
        assert!(!rules::is_checkmate(&mut board, color).unwrap());
        assert!(!rules::is_stalemate(&mut board, color).unwrap());
    }
    assert_eq!(rules::outcome(&mut board).unwrap(), None);
    assert_eq!(board, Board::starting());
}

#[test]
fn starting_position_moves() {
    let mut board = Board::starting();
    for color in [Color::White, Color::Black] {
        let pieces: Vec<_> = board.pieces_of(color).collect();
        let moves: usize = pieces
            .iter()
            .map(|&(square, _)| rules::legal_moves(&mut board, square).unwrap().len())
            .sum();
        assert_eq!(moves, 20);
    }
}

#[test]
fn boxed_in_king_is_checkmated() {
    // The queen is defended by the rook and none of the white pieces can take
    // it.
    let mut board = setup(&[
        ('K', 7, 4),
        ('N', 7, 3),
        ('N', 7, 5),
        ('P', 6, 3),
        ('P', 6, 5),
        ('q', 6, 4),
        ('r', 0, 4),
        ('k', 0, 0),
    ]);
    let before = board.clone();
    assert!(rules::is_in_check(&board, Square::new(7, 4), Color::White));
    assert!(!rules::has_legal_moves(&mut board, Square::new(7, 4)).unwrap());
    assert!(rules::is_checkmate(&mut board, Color::White).unwrap());
    assert_eq!(
        rules::outcome(&mut board).unwrap(),
        Some(Outcome::Checkmate {
            winner: Color::Black
        })
    );
    assert_eq!(board, before);

    // Without the rook the king takes the queen.
    let _ = board.remove_piece(Square::new(0, 4)).unwrap();
    assert_eq!(
        rules::legal_moves(&mut board, Square::new(7, 4)).unwrap(),
        vec![Square::new(6, 4)]
    );
    assert!(!rules::is_checkmate(&mut board, Color::White).unwrap());
}

#[test]
fn cornered_king_is_stalemated() {
    let mut board = setup(&[('k', 0, 0), ('Q', 2, 1), ('K', 7, 0)]);
    assert!(!rules::is_in_check(&board, Square::new(0, 0), Color::Black));
    assert!(rules::is_stalemate(&mut board, Color::Black).unwrap());
    assert!(!rules::is_checkmate(&mut board, Color::Black).unwrap());
    assert_eq!(rules::outcome(&mut board).unwrap(), Some(Outcome::Stalemate));
}

#[test]
fn bare_kings_can_move() {
    let mut board = setup(&[('k', 0, 0), ('K', 7, 0)]);
    assert!(!rules::is_stalemate(&mut board, Color::Black).unwrap());
    assert!(!rules::is_stalemate(&mut board, Color::White).unwrap());
    assert_eq!(rules::outcome(&mut board).unwrap(), None);
}

#[test]
fn sliders_stop_at_blockers() {
    let center = Square::new(3, 3);
    for kind in [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop] {
        let slider = Piece::new(Color::White, kind);
        for (dr, dc) in DIRECTIONS {
            let diagonal = dr != 0 && dc != 0;
            if (kind == PieceKind::Rook && diagonal) || (kind == PieceKind::Bishop && !diagonal) {
                continue;
            }
            let ray: Vec<Square> = (1..8)
                .map_while(|distance| center.offset(dr * distance, dc * distance))
                .filter(|&square| Board::empty().contains(square))
                .collect();
            for (blocked_at, &blocker) in ray.iter().enumerate() {
                let mut board = Board::empty();
                board.place_piece(slider, center).unwrap();
                board
                    .place_piece(Piece::new(Color::Black, PieceKind::Pawn), blocker)
                    .unwrap();
                for (distance, &to) in ray.iter().enumerate() {
                    assert_eq!(
                        slider.can_move(&board, center, to),
                        distance <= blocked_at,
                        "{kind} from {center} to {to} with a blocker on {blocker}"
                    );
                }
            }
        }
    }
}

#[test]
fn knights_jump_over_anything() {
    let knight = Piece::new(Color::White, PieceKind::Knight);
    let from = Square::new(4, 4);
    let mut board = Board::empty();
    // Surround the knight with enemy pawns.
    for (dr, dc) in DIRECTIONS {
        let square = from.offset(dr, dc).unwrap();
        board
            .place_piece(Piece::new(Color::Black, PieceKind::Pawn), square)
            .unwrap();
    }
    board.place_piece(knight, from).unwrap();
    let mut reachable: Vec<(i16, i16)> = board
        .squares()
        .filter(|&to| knight.can_move(&board, from, to))
        .map(|to| from.delta(to))
        .collect();
    let mut expected: Vec<(i16, i16)> = iproduct!([-2i16, -1, 1, 2], [-2i16, -1, 1, 2])
        .filter(|(dr, dc)| dr.abs() != dc.abs())
        .collect();
    reachable.sort_unstable();
    expected.sort_unstable();
    assert_eq!(reachable, expected);
}

#[test]
fn pawn_double_step() {
    let mut board = Board::starting();
    let white = Piece::new(Color::White, PieceKind::Pawn);
    let black = Piece::new(Color::Black, PieceKind::Pawn);
    assert!(white.can_move(&board, Square::new(6, 2), Square::new(4, 2)));
    assert!(black.can_move(&board, Square::new(1, 2), Square::new(3, 2)));

    // Blocked on the skipped square.
    board
        .place_piece(Piece::new(Color::Black, PieceKind::Knight), Square::new(5, 2))
        .unwrap();
    assert!(!white.can_move(&board, Square::new(6, 2), Square::new(4, 2)));

    // Only from the starting rank.
    let _ = board
        .move_piece(Move::new(Square::new(6, 6), Square::new(5, 6)))
        .unwrap();
    assert!(!white.can_move(&board, Square::new(5, 6), Square::new(3, 6)));
    assert!(white.can_move(&board, Square::new(5, 6), Square::new(4, 6)));
}

#[test]
fn check_matches_enemy_reachability() {
    let mut board = Board::starting();
    // 1. e4 f5 2. Qh5+
    for (from, to) in [((6, 4), (4, 4)), ((1, 5), (3, 5)), ((7, 3), (3, 7))] {
        let _ = board
            .move_piece(Move::new(Square::new(from.0, from.1), Square::new(to.0, to.1)))
            .unwrap();
    }
    let king = rules::find_king(&board, Color::Black).unwrap();
    let checkers: Vec<Square> = board
        .pieces_of(Color::White)
        .filter(|&(square, piece)| piece.can_move(&board, square, king))
        .map(|(square, _)| square)
        .collect();
    assert_eq!(checkers, vec![Square::new(3, 7)]);
    assert!(rules::is_in_check(&board, king, Color::Black));
    // The pawn on g7 blocks.
    assert_eq!(
        rules::legal_moves(&mut board, Square::new(1, 6)).unwrap(),
        vec![Square::new(2, 6)]
    );
    assert!(rules::has_any_legal_move(&mut board, Color::Black).unwrap());
    // Only the king's own moves decide checkmate, and it has none.
    assert!(!rules::has_legal_moves(&mut board, king).unwrap());
    assert_eq!(
        rules::outcome(&mut board).unwrap(),
        Some(Outcome::Checkmate {
            winner: Color::White
        })
    );
}
