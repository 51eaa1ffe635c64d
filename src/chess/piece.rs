//! Movement rules of the individual pieces.
//!
//! Every piece answers two questions:
//!
//! - [`Piece::is_valid_move`]: does the move match the piece's geometric
//!   pattern? Board occupancy is not consulted at this level.
//! - [`Piece::can_move`]: is the move legal on a given board, taking the
//!   destination occupant, blocked paths and the special pawn rules into
//!   account?
//!
//! Neither check considers the safety of the mover's own king: that is decided
//! by [`crate::chess::rules`] through move simulation.

use std::fmt::{self, Write};

use anyhow::bail;

use crate::chess::board::Board;
use crate::chess::core::{Color, PieceKind, Square};

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Color,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Color, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_white(self) -> bool {
        self.owner.is_white()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn symbol(self) -> char {
        self.kind.symbol()
    }

    /// Checks whether moving from `from` to `to` matches the movement pattern
    /// of the piece.
    ///
    /// ```
    /// use gambit::chess::core::{Color, PieceKind, Square};
    /// use gambit::chess::piece::Piece;
    ///
    /// let knight = Piece::new(Color::White, PieceKind::Knight);
    /// assert!(knight.is_valid_move(Square::new(7, 1), Square::new(5, 2)));
    /// assert!(!knight.is_valid_move(Square::new(7, 1), Square::new(5, 1)));
    /// ```
    #[must_use]
    pub fn is_valid_move(self, from: Square, to: Square) -> bool {
        let (rows, cols) = from.delta(to);
        let (row_distance, col_distance) = (rows.abs(), cols.abs());
        match self.kind {
            PieceKind::King => row_distance <= 1 && col_distance <= 1,
            PieceKind::Queen => {
                row_distance == 0 || col_distance == 0 || row_distance == col_distance
            },
            PieceKind::Rook => (row_distance == 0) != (col_distance == 0),
            PieceKind::Bishop => row_distance == col_distance && row_distance != 0,
            PieceKind::Knight => matches!((row_distance, col_distance), (1, 2) | (2, 1)),
            PieceKind::Pawn => rows == self.owner.forward() && col_distance <= 1,
        }
    }

    /// Checks whether the piece can be moved from `from` to `to` on the given
    /// board. Both squares have to be on the board and distinct, the
    /// destination can not be occupied by a piece of the same color and the
    /// path of the sliding pieces has to be clear.
    ///
    /// This does not check whether the move leaves the mover's king in check.
    #[must_use]
    pub fn can_move(self, board: &Board, from: Square, to: Square) -> bool {
        if from == to || !board.contains(from) || !board.contains(to) {
            return false;
        }
        if board
            .piece_at(to)
            .is_some_and(|occupant| occupant.owner == self.owner)
        {
            return false;
        }
        match self.kind {
            // Kings step and knights jump: nothing can block them.
            PieceKind::King | PieceKind::Knight => self.is_valid_move(from, to),
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
                self.is_valid_move(from, to) && is_path_clear(board, from, to)
            },
            PieceKind::Pawn => self.can_pawn_move(board, from, to),
        }
    }

    fn can_pawn_move(self, board: &Board, from: Square, to: Square) -> bool {
        let (rows, cols) = from.delta(to);
        let forward = self.owner.forward();
        let destination = board.piece_at(to);
        if cols == 0 && rows == 2 * forward {
            return from.row() == board.pawn_rank(self.owner)
                && from
                    .offset(forward, 0)
                    .is_some_and(|skipped| board.piece_at(skipped).is_none())
                && destination.is_none();
        }
        if !self.is_valid_move(from, to) {
            return false;
        }
        if cols == 0 {
            destination.is_none()
        } else {
            // Diagonal steps are captures only.
            destination.is_some_and(|occupant| occupant.owner != self.owner)
        }
    }
}

/// Walks the squares strictly between `from` and `to` one step at a time and
/// checks that none of them is occupied. `from` and `to` have to be on the same
/// row, column or diagonal.
fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (rows, cols) = from.delta(to);
    let (row_step, col_step) = (rows.signum(), cols.signum());
    let distance = rows.abs().max(cols.abs());
    (1..distance).all(|step| {
        from.offset(row_step * step, col_step * step)
            .is_some_and(|square| board.piece_at(square).is_none())
    })
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses the piece from its symbol: uppercase for White, lowercase for
    /// Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Color::White
        } else if symbol.is_ascii_lowercase() {
            Color::Black
        } else {
            bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'");
        };
        Ok(Self::new(owner, PieceKind::try_from(symbol)?))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self.owner {
            // White player: uppercase symbols.
            Color::White => self.symbol(),
            // Black player: lowercase symbols.
            Color::Black => self.symbol().to_ascii_lowercase(),
        })
    }
}
