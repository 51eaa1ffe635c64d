//! Check detection and game termination: checkmate and stalemate.
//!
//! [`Piece::can_move`] does not know anything about the safety of the mover's
//! king. Legality under check is established here by simulating the candidate
//! move on the board and looking for attacks on the king afterwards.

use std::ops::Deref;

use anyhow::Context;

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, PieceKind, Square};
use crate::chess::piece::Piece;

/// Final state of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The opponent of the `winner` is in check and has no legal moves.
    Checkmate {
        #[allow(missing_docs)]
        winner: Color,
    },
    /// One of the players has no legal moves but is not checkmated.
    Stalemate,
    /// The king of the `winner`'s opponent was taken. This can only happen if
    /// the players are allowed to leave their king in check.
    KingCaptured {
        #[allow(missing_docs)]
        winner: Color,
    },
}

/// A move applied to the board for the duration of a scope. Dropping the
/// simulation restores both squares, including on early returns.
struct Simulation<'a> {
    board: &'a mut Board,
    next_move: Move,
    moved: Piece,
    captured: Option<Piece>,
}

impl<'a> Simulation<'a> {
    /// Returns `None` if there is no piece on the starting square.
    fn new(board: &'a mut Board, next_move: Move) -> Option<Self> {
        let moved = board.set(next_move.from, None)?;
        let captured = board.set(next_move.to, Some(moved));
        Some(Self {
            board,
            next_move,
            moved,
            captured,
        })
    }
}

impl Deref for Simulation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        let _ = self.board.set(self.next_move.to, self.captured);
        let _ = self.board.set(self.next_move.from, Some(self.moved));
    }
}

/// Finds the square occupied by the king of given color.
#[must_use]
pub fn find_king(board: &Board, color: Color) -> Option<Square> {
    board
        .pieces_of(color)
        .find(|(_, piece)| piece.kind == PieceKind::King)
        .map(|(square, _)| square)
}

/// Checks whether any piece of `attacker` color can move to `target`.
#[must_use]
pub fn is_attacked(board: &Board, target: Square, attacker: Color) -> bool {
    board
        .pieces_of(attacker)
        .any(|(square, piece)| piece.can_move(board, square, target))
}

/// Checks whether the king of `color` standing on `king` is attacked by any of
/// the opponent's pieces.
#[must_use]
pub fn is_in_check(board: &Board, king: Square, color: Color) -> bool {
    is_attacked(board, king, color.opponent())
}

fn king_in_check(board: &Board, color: Color) -> anyhow::Result<bool> {
    let king = find_king(board, color).with_context(|| format!("no {color} king on the board"))?;
    Ok(is_in_check(board, king, color))
}

/// Simulates the move and checks whether the mover's king is attacked after
/// it.
///
/// # Errors
///
/// If the starting square is empty or the mover has no king.
pub fn leaves_king_in_check(board: &mut Board, next_move: Move) -> anyhow::Result<bool> {
    let simulation = Simulation::new(board, next_move)
        .with_context(|| format!("no piece to move on {}", next_move.from))?;
    king_in_check(&simulation, simulation.moved.owner)
}

/// Moves of the piece on `from` allowed by [`Piece::can_move`], in row-major
/// order of the destination.
fn candidate_moves(board: &Board, from: Square) -> anyhow::Result<Vec<Move>> {
    let piece = board
        .piece_at(from)
        .with_context(|| format!("no piece on {from}"))?;
    Ok(board
        .squares()
        .filter(|&to| piece.can_move(board, from, to))
        .map(|to| Move::new(from, to))
        .collect())
}

/// Lazily simulates the candidate moves of the piece on `from` and yields the
/// destinations that do not leave its king in check.
fn legal_destinations(
    board: &mut Board,
    from: Square,
) -> anyhow::Result<impl Iterator<Item = anyhow::Result<Square>> + '_> {
    let candidates = candidate_moves(board, from)?;
    Ok(candidates
        .into_iter()
        .filter_map(move |next_move| match leaves_king_in_check(board, next_move) {
            Ok(true) => None,
            Ok(false) => Some(Ok(next_move.to)),
            Err(error) => Some(Err(error)),
        }))
}

/// Checks whether the piece on `from` has at least one move which does not
/// leave its king in check. The board is restored after the search.
///
/// # Errors
///
/// If `from` is empty or the owner of the piece has no king.
pub fn has_legal_moves(board: &mut Board, from: Square) -> anyhow::Result<bool> {
    Ok(legal_destinations(board, from)?.next().transpose()?.is_some())
}

/// Lists the destinations of all legal moves of the piece on `from` in
/// row-major order.
///
/// # Errors
///
/// If `from` is empty or the owner of the piece has no king.
pub fn legal_moves(board: &mut Board, from: Square) -> anyhow::Result<Vec<Square>> {
    legal_destinations(board, from)?.collect()
}

/// Checks whether any piece of `color` has a legal move. Unlike
/// [`is_checkmate`], blocking or capturing a checking piece counts.
///
/// # Errors
///
/// If `color` has no king.
pub fn has_any_legal_move(board: &mut Board, color: Color) -> anyhow::Result<bool> {
    let pieces: Vec<Square> = board.pieces_of(color).map(|(square, _)| square).collect();
    for square in pieces {
        if has_legal_moves(board, square)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The king of `color` is in check and the king itself has no legal move.
/// Other pieces are not considered: a check that could only be answered by
/// blocking or capturing the checker is still a checkmate.
///
/// # Errors
///
/// If `color` has no king.
pub fn is_checkmate(board: &mut Board, color: Color) -> anyhow::Result<bool> {
    let king = find_king(board, color).with_context(|| format!("no {color} king on the board"))?;
    Ok(is_in_check(board, king, color) && !has_legal_moves(board, king)?)
}

/// None of the pieces of `color` has a legal move. This does not look at
/// whether the king is in check: use [`outcome`] to tell checkmate and
/// stalemate apart.
///
/// # Errors
///
/// If `color` has no king.
pub fn is_stalemate(board: &mut Board, color: Color) -> anyhow::Result<bool> {
    Ok(!has_any_legal_move(board, color)?)
}

/// Decides whether the game is over. Checkmate of either side takes precedence
/// over stalemate.
///
/// # Errors
///
/// If either side has no king.
pub fn outcome(board: &mut Board) -> anyhow::Result<Option<Outcome>> {
    for color in [Color::White, Color::Black] {
        if is_checkmate(board, color)? {
            return Ok(Some(Outcome::Checkmate {
                winner: color.opponent(),
            }));
        }
    }
    for color in [Color::White, Color::Black] {
        if is_stalemate(board, color)? {
            return Ok(Some(Outcome::Stalemate));
        }
    }
    Ok(None)
}
