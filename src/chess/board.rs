//! Mailbox board representation: a flat array of squares, each holding at most
//! one piece.

use std::fmt;
use std::mem;

use anyhow::{bail, Context};
use itertools::{iproduct, Itertools};
use tracing::warn;

use crate::chess::core::{Color, Move, PieceKind, Square, BOARD_WIDTH};
use crate::chess::piece::Piece;

/// Pieces of the back rank in the starting position, from column 0 to 7.
const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Grid of `rows` × `cols` squares. The board is the only owner of the
/// pieces: a piece's position is the index of the square it occupies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    cols: u8,
    // (Possibly) occupied squares in row-major order.
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// Creates an empty standard 8×8 board.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_size(BOARD_WIDTH, BOARD_WIDTH)
    }

    /// Creates an empty board of arbitrary size.
    #[must_use]
    pub fn with_size(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            squares: vec![None; usize::from(rows) * usize::from(cols)],
        }
    }

    /// Creates the starting position of the standard chess variant: Black
    /// occupies rows 0 and 1, White occupies rows 6 and 7.
    ///
    /// ```
    /// use gambit::chess::board::Board;
    ///
    /// let board = Board::starting();
    /// assert_eq!(board.pieces().count(), 32);
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        let last_row = BOARD_WIDTH - 1;
        for (col, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
            for (row, piece) in [
                (0, Piece::new(Color::Black, kind)),
                (1, Piece::new(Color::Black, PieceKind::Pawn)),
                (last_row - 1, Piece::new(Color::White, PieceKind::Pawn)),
                (last_row, Piece::new(Color::White, kind)),
            ] {
                let _ = board.set(Square::new(row, col), Some(piece));
            }
        }
        board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn cols(&self) -> u8 {
        self.cols
    }

    /// Bounds check: the single source of truth for the board extent.
    #[must_use]
    pub fn is_valid_position(&self, row: i32, col: i32) -> bool {
        (0..i32::from(self.rows)).contains(&row) && (0..i32::from(self.cols)).contains(&col)
    }

    /// Returns the square with given coordinates or `None` if it is outside
    /// the board.
    #[must_use]
    pub fn get_square(&self, row: i32, col: i32) -> Option<Square> {
        if !self.is_valid_position(row, col) {
            return None;
        }
        Some(Square::new(u8::try_from(row).ok()?, u8::try_from(col).ok()?))
    }

    /// Checks whether the square belongs to this board.
    #[must_use]
    pub const fn contains(&self, square: Square) -> bool {
        square.row() < self.rows && square.col() < self.cols
    }

    /// Returns the piece occupying the square, if any. Squares outside of the
    /// board are empty.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.index(square)
            .and_then(|index| self.squares.get(index).copied().flatten())
    }

    /// Puts the piece on the square, replacing the previous occupant.
    ///
    /// # Errors
    ///
    /// If the square is outside of the board. The board is not changed.
    pub fn place_piece(&mut self, piece: Piece, square: Square) -> anyhow::Result<()> {
        if !self.contains(square) {
            warn!(%piece, %square, "placement outside of the board");
            bail!("can not place {piece} on {square}: outside of the board");
        }
        let _ = self.set(square, Some(piece));
        Ok(())
    }

    /// Clears the square and returns its previous occupant.
    ///
    /// # Errors
    ///
    /// If the square is outside of the board. The board is not changed.
    pub fn remove_piece(&mut self, square: Square) -> anyhow::Result<Option<Piece>> {
        if !self.contains(square) {
            warn!(%square, "removal outside of the board");
            bail!("can not remove a piece from {square}: outside of the board");
        }
        Ok(self.set(square, None))
    }

    /// Moves the piece and returns the piece that occupied the destination
    /// before the move (i.e. the captured piece). The move legality is not
    /// checked.
    ///
    /// # Errors
    ///
    /// If either square is outside of the board or the starting square is
    /// empty. The board is not changed.
    pub fn move_piece(&mut self, next_move: Move) -> anyhow::Result<Option<Piece>> {
        if !self.contains(next_move.to) {
            bail!("can not move to {}: outside of the board", next_move.to);
        }
        let piece = self
            .remove_piece(next_move.from)?
            .with_context(|| format!("can not move from {}: square is empty", next_move.from))?;
        Ok(self.set(next_move.to, Some(piece)))
    }

    /// Writes the square contents without any checks and returns the previous
    /// contents. Writes outside of the board are ignored.
    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let slot = self
            .index(square)
            .and_then(|index| self.squares.get_mut(index))?;
        mem::replace(slot, piece)
    }

    /// Iterates over all squares of the board in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        iproduct!(0..self.rows, 0..self.cols).map(|(row, col)| Square::new(row, col))
    }

    /// Iterates over all occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares()
            .filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Iterates over the squares occupied by the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.owner == color)
    }

    /// Row on which the pawns of given color start and from which they can
    /// advance by two squares.
    #[must_use]
    pub const fn pawn_rank(&self, color: Color) -> u8 {
        match color {
            Color::White => self.rows.saturating_sub(2),
            Color::Black => 1,
        }
    }

    /// Checks the structural requirements the rules rely on: each side has
    /// exactly one king.
    ///
    /// # Errors
    ///
    /// Describes the first violated requirement.
    pub fn validate(&self) -> anyhow::Result<()> {
        for color in [Color::White, Color::Black] {
            let kings = self
                .pieces_of(color)
                .filter(|(_, piece)| piece.kind == PieceKind::King)
                .count();
            if kings != 1 {
                bail!("expected 1 {color} king, got {kings}");
            }
        }
        Ok(())
    }

    fn index(&self, square: Square) -> Option<usize> {
        self.contains(square)
            .then(|| usize::from(square.row()) * usize::from(self.cols) + usize::from(square.col()))
    }
}

impl fmt::Display for Board {
    /// Renders the board with column indices on top and row indices on the
    /// left. Empty squares are shown as `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", (0..self.cols).join(" "))?;
        for row in 0..self.rows {
            let contents = (0..self.cols)
                .map(|col| {
                    self.piece_at(Square::new(row, col))
                        .map_or_else(|| "-".to_string(), |piece| piece.to_string())
                })
                .join(" ");
            writeln!(f, "{row} {contents}")?;
        }
        Ok(())
    }
}
