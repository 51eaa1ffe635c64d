//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::ops::Not;

use anyhow::bail;

/// Number of rows (and columns) of the standard chess board.
pub const BOARD_WIDTH: u8 = 8;

/// A standard game of chess is played between two sides: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_white(self) -> bool {
        matches!(self, Self::White)
    }

    /// Row increment of a pawn push. White starts at the bottom of the board
    /// (highest row index) and advances towards row 0, Black does the
    /// opposite.
    #[must_use]
    pub const fn forward(self) -> i16 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }
}

impl Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Single-letter abbreviation. The letter does not encode the owner.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn => 'P',
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_uppercase() {
            'K' => Ok(Self::King),
            'Q' => Ok(Self::Queen),
            'R' => Ok(Self::Rook),
            'B' => Ok(Self::Bishop),
            'N' => Ok(Self::Knight),
            'P' => Ok(Self::Pawn),
            _ => bail!("piece symbol should be within \"KQRBNP\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Board coordinate. Row 0 is the top of the board (Black's back rank in the
/// starting position), column 0 is the leftmost column.
///
/// A square does not know the extent of the board it belongs to: use
/// [`crate::chess::board::Board::get_square`] to obtain squares that are
/// guaranteed to be on a given board.
///
/// ```
/// use gambit::chess::core::Square;
///
/// let square = Square::new(6, 4);
/// assert_eq!(square.offset(-2, 0), Some(Square::new(4, 4)));
/// assert_eq!(square.offset(0, -5), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Shifts the square by given number of rows and columns. Returns `None`
    /// if the result has a negative (or too large) coordinate; the upper
    /// bound of a particular board is not checked.
    #[must_use]
    pub fn offset(self, rows: i16, cols: i16) -> Option<Self> {
        let row = u8::try_from(i16::from(self.row) + rows).ok()?;
        let col = u8::try_from(i16::from(self.col) + cols).ok()?;
        Some(Self::new(row, col))
    }

    /// Signed `(rows, cols)` distance from `self` to `other`.
    #[must_use]
    pub fn delta(self, other: Self) -> (i16, i16) {
        (
            i16::from(other.row) - i16::from(self.row),
            i16::from(other.col) - i16::from(self.col),
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Relocation of a piece from one square to another. Captures are implicit:
/// the occupant of `to` (if any) leaves the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
