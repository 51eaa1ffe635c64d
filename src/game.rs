//! Turn controller: alternates the players, validates and applies their moves
//! and decides when the game is over.
//!
//! The controller does not perform any I/O itself. It talks to the outside
//! world through three collaborators: [`MoveInput`] supplies moves,
//! [`BoardRenderer`] shows the board and [`ResultReporter`] announces the end
//! of the game. [`crate::interface::text::TextInterface`] implements all of
//! them for line-based terminal play.

use std::fmt;

use anyhow::{bail, Context};
use tracing::{debug, info};

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, PieceKind, Square};
use crate::chess::piece::Piece;
use crate::chess::rules::{self, Outcome};

/// Participant of the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    name: String,
    color: Color,
}

impl Player {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_white(&self) -> bool {
        self.color.is_white()
    }
}

/// Optional rules on top of the piece movement rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Reject moves that leave the mover's own king in check. When disabled,
    /// any move allowed by [`Piece::can_move`] is accepted.
    pub king_safety: bool,
}

/// What a player wants to do on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    #[allow(missing_docs)]
    Move(Move),
    /// Take back the last half-move.
    Undo,
    /// Show where the piece on the square can go.
    LegalMoves(Square),
    /// Show the moves made so far.
    History,
    /// Show the pieces taken off the board.
    Captured,
    /// Abandon the game.
    Cancel,
}

/// Reason for refusing a request. The player keeps the turn.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    OutOfBounds(Square),
    EmptySquare(Square),
    NotYourPiece(Square),
    IllegalMove(Move),
    ExposesKing(Move),
    NothingToUndo,
    GameOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(square) => write!(f, "{square} is outside of the board"),
            Self::EmptySquare(square) => write!(f, "there is no piece on {square}"),
            Self::NotYourPiece(square) => {
                write!(f, "the piece on {square} belongs to the opponent")
            },
            Self::IllegalMove(next_move) => write!(f, "{next_move} is not a legal move"),
            Self::ExposesKing(next_move) => write!(f, "{next_move} leaves the king in check"),
            Self::NothingToUndo => write!(f, "there are no moves to undo"),
            Self::GameOver => write!(f, "the game is over"),
        }
    }
}

/// A half-move that was applied to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    #[allow(missing_docs)]
    pub next_move: Move,
    /// The piece that moved.
    pub piece: Piece,
    /// The piece that occupied the destination before the move.
    pub captured: Option<Piece>,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.piece, self.next_move)?;
        if let Some(captured) = self.captured {
            write!(f, " x {captured}")?;
        }
        Ok(())
    }
}

/// Result of submitting a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The move was refused and the same player has to move again.
    Rejected(Rejection),
    /// The move was applied and the turn passed to the opponent (unless the
    /// game is over now, see [`Game::outcome`]).
    Applied(MoveRecord),
}

/// State of the turn loop between two requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player of given color to move.
    AwaitingMove(Color),
    #[allow(missing_docs)]
    GameOver(Outcome),
}

/// Source of the players' requests.
pub trait MoveInput {
    /// Blocks until the `player` decides what to do.
    ///
    /// # Errors
    ///
    /// If the input can not be read.
    fn request_move(&mut self, player: &Player, board: &Board) -> anyhow::Result<Request>;

    /// Informs the `player` that the request was refused.
    ///
    /// # Errors
    ///
    /// If the message can not be delivered.
    fn reject(&mut self, player: &Player, rejection: &Rejection) -> anyhow::Result<()>;
}

/// Consumer of board snapshots and other views of the game state.
#[allow(clippy::missing_errors_doc)]
pub trait BoardRenderer {
    #[allow(missing_docs)]
    fn render_board(&mut self, board: &Board) -> anyhow::Result<()>;

    /// Shows the destinations the piece on `from` can move to.
    fn render_legal_moves(&mut self, from: Square, destinations: &[Square]) -> anyhow::Result<()>;

    /// Shows the applied half-moves, oldest first.
    fn render_history(&mut self, history: &[MoveRecord]) -> anyhow::Result<()>;

    /// Shows the captured pieces in the order they were taken.
    fn render_captured(&mut self, captured: &[Piece]) -> anyhow::Result<()>;
}

/// Consumer of the final result.
pub trait ResultReporter {
    /// `outcome` is `None` if the game ended without a decision (e.g. it was
    /// cancelled).
    ///
    /// # Errors
    ///
    /// If the result can not be delivered.
    fn report_result(&mut self, outcome: Option<Outcome>, players: &[Player; 2])
        -> anyhow::Result<()>;
}

/// A game between two players, from the first move until checkmate or
/// stalemate.
pub struct Game {
    board: Board,
    // White first.
    players: [Player; 2],
    turn: Color,
    settings: Settings,
    history: Vec<MoveRecord>,
    captured: Vec<Piece>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Starts a game on the given board with White to move.
    ///
    /// # Errors
    ///
    /// If the board does not have exactly one king per side or the players'
    /// colors do not match their seats.
    pub fn new(
        board: Board,
        white: Player,
        black: Player,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        board.validate()?;
        if !white.is_white() || black.is_white() {
            bail!(
                "expected white and black players, got {} and {}",
                white.color(),
                black.color()
            );
        }
        let mut game = Self {
            board,
            players: [white, black],
            turn: Color::White,
            settings,
            history: Vec::new(),
            captured: Vec::new(),
            outcome: None,
        };
        game.outcome = rules::outcome(&mut game.board)?;
        Ok(game)
    }

    /// Starts a game from the standard starting position.
    ///
    /// # Errors
    ///
    /// Never fails for the standard position; see [`Game::new`].
    pub fn standard(
        white_name: impl Into<String>,
        black_name: impl Into<String>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        Self::new(
            Board::starting(),
            Player::new(white_name, Color::White),
            Player::new(black_name, Color::Black),
            settings,
        )
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Both players, White first.
    #[must_use]
    pub const fn players(&self) -> &[Player; 2] {
        &self.players
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.players[0],
            Color::Black => &self.players[1],
        }
    }

    /// The player whose turn it is.
    #[must_use]
    pub const fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// Applied half-moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Captured pieces of both sides in the order they were taken.
    #[must_use]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// `None` while the game is in progress.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self.outcome {
            Some(outcome) => Phase::GameOver(outcome),
            None => Phase::AwaitingMove(self.turn),
        }
    }

    /// Validates the move of the current player and applies it. After the
    /// move the turn passes to the opponent and the game is checked for
    /// termination.
    ///
    /// # Errors
    ///
    /// Only on violated structural invariants (e.g. a missing king), never for
    /// illegal moves: those are reported as [`Transition::Rejected`].
    pub fn play(&mut self, next_move: Move) -> anyhow::Result<Transition> {
        if let Some(rejection) = self.rejection(next_move)? {
            debug!(player = %self.turn, %next_move, %rejection, "move rejected");
            return Ok(Transition::Rejected(rejection));
        }
        let piece = self
            .board
            .piece_at(next_move.from)
            .context("validated move starts on an empty square")?;
        let captured = self.board.move_piece(next_move)?;
        let record = MoveRecord {
            next_move,
            piece,
            captured,
        };
        self.history.push(record);
        debug!(player = %self.turn, %next_move, "move applied");
        if let Some(captured) = captured {
            self.captured.push(captured);
            debug!(%captured, "piece captured");
        }
        let mover = self.turn;
        self.turn = mover.opponent();
        self.outcome = if captured.is_some_and(|piece| piece.kind == PieceKind::King) {
            Some(Outcome::KingCaptured { winner: mover })
        } else {
            rules::outcome(&mut self.board)?
        };
        if let Some(outcome) = self.outcome {
            info!(?outcome, "game over");
        }
        Ok(Transition::Applied(record))
    }

    fn rejection(&mut self, next_move: Move) -> anyhow::Result<Option<Rejection>> {
        if self.outcome.is_some() {
            return Ok(Some(Rejection::GameOver));
        }
        for square in [next_move.from, next_move.to] {
            if !self.board.contains(square) {
                return Ok(Some(Rejection::OutOfBounds(square)));
            }
        }
        if let Some(rejection) = self.selection_rejection(next_move.from) {
            return Ok(Some(rejection));
        }
        let piece = self
            .board
            .piece_at(next_move.from)
            .context("selected square is empty")?;
        if !piece.can_move(&self.board, next_move.from, next_move.to) {
            return Ok(Some(Rejection::IllegalMove(next_move)));
        }
        if self.settings.king_safety && rules::leaves_king_in_check(&mut self.board, next_move)? {
            return Ok(Some(Rejection::ExposesKing(next_move)));
        }
        Ok(None)
    }

    /// Checks that the current player can pick the piece on `from`.
    fn selection_rejection(&self, from: Square) -> Option<Rejection> {
        if !self.board.contains(from) {
            return Some(Rejection::OutOfBounds(from));
        }
        match self.board.piece_at(from) {
            None => Some(Rejection::EmptySquare(from)),
            Some(piece) if piece.owner != self.turn => Some(Rejection::NotYourPiece(from)),
            Some(_) => None,
        }
    }

    /// Lists the destinations [`Game::play`] would accept for the piece on
    /// `from`, in row-major order. Moves exposing the king are only excluded
    /// when [`Settings::king_safety`] is enabled.
    ///
    /// # Errors
    ///
    /// If `from` is empty or the position has no king of the piece's color.
    pub fn legal_moves(&mut self, from: Square) -> anyhow::Result<Vec<Square>> {
        let piece = self
            .board
            .piece_at(from)
            .with_context(|| format!("no piece on {from}"))?;
        if self.settings.king_safety {
            return rules::legal_moves(&mut self.board, from);
        }
        Ok(self
            .board
            .squares()
            .filter(|&to| piece.can_move(&self.board, from, to))
            .collect())
    }

    /// Takes back the last half-move: the moved piece returns, the captured
    /// piece (if any) is put back and the turn passes back. Returns `None` if
    /// no moves were made.
    ///
    /// # Errors
    ///
    /// If the history does not match the board.
    pub fn undo(&mut self) -> anyhow::Result<Option<MoveRecord>> {
        let Some(record) = self.history.pop() else {
            return Ok(None);
        };
        let MoveRecord {
            next_move,
            piece,
            captured,
        } = record;
        let _ = self.board.remove_piece(next_move.to)?;
        self.board.place_piece(piece, next_move.from)?;
        if let Some(captured) = captured {
            self.board.place_piece(captured, next_move.to)?;
            if let Some(index) = self.captured.iter().rposition(|&piece| piece == captured) {
                let _ = self.captured.remove(index);
            }
        }
        self.turn = self.turn.opponent();
        // Moves are only accepted while the game is in progress.
        self.outcome = None;
        debug!(%next_move, "move taken back");
        Ok(Some(record))
    }

    /// Runs the turn loop until the game is over or the input is cancelled,
    /// then reports the result.
    ///
    /// # Errors
    ///
    /// If the collaborators fail or the game state is corrupted.
    pub fn run<I>(&mut self, interface: &mut I) -> anyhow::Result<Option<Outcome>>
    where
        I: MoveInput + BoardRenderer + ResultReporter,
    {
        while self.outcome.is_none() {
            interface.render_board(&self.board)?;
            match interface.request_move(self.current_player(), &self.board)? {
                Request::Move(next_move) => {
                    if let Transition::Rejected(rejection) = self.play(next_move)? {
                        interface.reject(self.current_player(), &rejection)?;
                    }
                },
                Request::Undo => {
                    if self.undo()?.is_none() {
                        interface.reject(self.current_player(), &Rejection::NothingToUndo)?;
                    }
                },
                Request::LegalMoves(from) => match self.selection_rejection(from) {
                    Some(rejection) => interface.reject(self.current_player(), &rejection)?,
                    None => {
                        let destinations = self.legal_moves(from)?;
                        interface.render_legal_moves(from, &destinations)?;
                    },
                },
                Request::History => interface.render_history(&self.history)?,
                Request::Captured => interface.render_captured(&self.captured)?,
                Request::Cancel => {
                    info!(player = self.current_player().name(), "game cancelled");
                    break;
                },
            }
        }
        if self.outcome.is_some() {
            interface.render_board(&self.board)?;
        }
        interface.report_result(self.outcome, &self.players)?;
        Ok(self.outcome)
    }
}
