//! Line-based terminal frontend. Each line of the input is a single command:
//!
//! - `<from_row> <from_col> <to_row> <to_col>`: move a piece, e.g. `6 4 4 4`
//! - `moves <row> <col>`: list where the piece on the square can go
//! - `history`: list the moves made so far
//! - `captured`: list the pieces taken by each side
//! - `undo`: take back the last half-move
//! - `board`: print the board again
//! - `help`: list the commands
//! - `quit`: abandon the game
//!
//! Malformed input never reaches the game: the player is told what went wrong
//! and asked again. End of input is treated as `quit`.

use std::io::{BufRead, Write};

use itertools::Itertools;
use tracing::debug;

use crate::chess::board::Board;
use crate::chess::core::{Color, Move, Square};
use crate::chess::piece::Piece;
use crate::chess::rules::Outcome;
use crate::game::{
    BoardRenderer, MoveInput, MoveRecord, Player, Rejection, Request, ResultReporter,
};

const HELP: &str = "\
Commands:
  <from_row> <from_col> <to_row> <to_col>  move a piece, e.g. `6 4 4 4`
  moves <row> <col>                        list where the piece can go
  history                                  list the moves made so far
  captured                                 list the captured pieces
  undo                                     take back the last move
  board                                    show the board
  help                                     show this message
  quit                                     end the game";

/// Plays the game over a pair of text streams, typically stdin and stdout.
pub struct TextInterface<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TextInterface<R, W> {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the interface and returns the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Announces the start of the game.
    ///
    /// # Errors
    ///
    /// If the output can not be written.
    pub fn greet(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Chess Game Started!")?;
        writeln!(self.output, "Type `help` for the list of commands.")?;
        Ok(())
    }

    fn report_out_of_range(&mut self, board: &Board) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Invalid move: coordinates must be between 0 and {} for rows and 0 and {} for \
             columns. Please try again.",
            board.rows().saturating_sub(1),
            board.cols().saturating_sub(1)
        )?;
        Ok(())
    }

    fn read_command(&mut self) -> anyhow::Result<Option<Command>> {
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(Command::parse(&String::from_utf8_lossy(&line))))
    }
}

impl<R: BufRead, W: Write> MoveInput for TextInterface<R, W> {
    fn request_move(&mut self, player: &Player, board: &Board) -> anyhow::Result<Request> {
        loop {
            writeln!(self.output, "{}'s turn:", player.name())?;
            self.output.flush()?;
            let Some(command) = self.read_command()? else {
                debug!("end of input");
                return Ok(Request::Cancel);
            };
            match command {
                Command::Move {
                    from: (from_row, from_col),
                    to: (to_row, to_col),
                } => match (
                    board.get_square(from_row, from_col),
                    board.get_square(to_row, to_col),
                ) {
                    (Some(from), Some(to)) => return Ok(Request::Move(Move::new(from, to))),
                    _ => self.report_out_of_range(board)?,
                },
                Command::Moves { from: (row, col) } => match board.get_square(row, col) {
                    Some(from) => return Ok(Request::LegalMoves(from)),
                    None => self.report_out_of_range(board)?,
                },
                Command::History => return Ok(Request::History),
                Command::Captured => return Ok(Request::Captured),
                Command::Undo => return Ok(Request::Undo),
                Command::Quit => return Ok(Request::Cancel),
                Command::Board => write!(self.output, "{board}")?,
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Empty => {},
                Command::Unknown(input) => writeln!(
                    self.output,
                    "Unknown command: {input}. Type `help` for the list of commands."
                )?,
            }
        }
    }

    fn reject(&mut self, _player: &Player, rejection: &Rejection) -> anyhow::Result<()> {
        match rejection {
            Rejection::NothingToUndo | Rejection::GameOver => {
                writeln!(self.output, "Can not do that: {rejection}.")?;
            },
            _ => writeln!(self.output, "Invalid move: {rejection}. Please try again.")?,
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> BoardRenderer for TextInterface<R, W> {
    fn render_board(&mut self, board: &Board) -> anyhow::Result<()> {
        writeln!(self.output)?;
        write!(self.output, "{board}")?;
        Ok(())
    }

    fn render_legal_moves(&mut self, from: Square, destinations: &[Square]) -> anyhow::Result<()> {
        if destinations.is_empty() {
            writeln!(self.output, "No legal moves from {from}.")?;
        } else {
            writeln!(
                self.output,
                "Legal moves from {from}: {}",
                destinations.iter().join(" ")
            )?;
        }
        Ok(())
    }

    fn render_history(&mut self, history: &[MoveRecord]) -> anyhow::Result<()> {
        if history.is_empty() {
            writeln!(self.output, "No moves yet.")?;
            return Ok(());
        }
        writeln!(self.output, "Move history:")?;
        for (number, record) in (1..).zip(history) {
            writeln!(self.output, "{number}. {record}")?;
        }
        Ok(())
    }

    fn render_captured(&mut self, captured: &[Piece]) -> anyhow::Result<()> {
        for (captor, victim) in [("White", Color::Black), ("Black", Color::White)] {
            let pieces = captured
                .iter()
                .filter(|piece| piece.owner == victim)
                .join(" ");
            let pieces = if pieces.is_empty() { "-".to_string() } else { pieces };
            writeln!(self.output, "Captured by {captor}: {pieces}")?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> ResultReporter for TextInterface<R, W> {
    fn report_result(
        &mut self,
        outcome: Option<Outcome>,
        players: &[Player; 2],
    ) -> anyhow::Result<()> {
        let name = |color: Color| {
            players
                .iter()
                .find(|player| player.color() == color)
                .map_or_else(|| color.to_string(), |player| player.name().to_string())
        };
        match outcome {
            Some(Outcome::Checkmate { winner }) => writeln!(
                self.output,
                "{} is in checkmate. {} wins!",
                name(winner.opponent()),
                name(winner)
            )?,
            Some(Outcome::KingCaptured { winner }) => writeln!(
                self.output,
                "{}'s king was captured. {} wins!",
                name(winner.opponent()),
                name(winner)
            )?,
            Some(Outcome::Stalemate) => writeln!(self.output, "Stalemate! The game is a draw.")?,
            None => {},
        }
        writeln!(self.output, "Game Over!")?;
        self.output.flush()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Move { from: (i32, i32), to: (i32, i32) },
    Moves { from: (i32, i32) },
    History,
    Captured,
    Undo,
    Board,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::Empty;
        }
        match input.to_lowercase().as_str() {
            "undo" => return Self::Undo,
            "board" => return Self::Board,
            "history" => return Self::History,
            "captured" => return Self::Captured,
            "help" => return Self::Help,
            "quit" | "exit" => return Self::Quit,
            _ => {},
        }
        let mut tokens = input.split_whitespace().peekable();
        let selection = tokens
            .next_if(|token| token.eq_ignore_ascii_case("moves"))
            .is_some();
        let coordinates: Option<Vec<i32>> = tokens.map(|token| token.parse().ok()).collect();
        let Some(coordinates) = coordinates else {
            return Self::Unknown(input.to_string());
        };
        if selection {
            if let Some((row, col)) = coordinates.into_iter().collect_tuple() {
                return Self::Moves { from: (row, col) };
            }
        } else if let Some((from_row, from_col, to_row, to_col)) =
            coordinates.into_iter().collect_tuple()
        {
            return Self::Move {
                from: (from_row, from_col),
                to: (to_row, to_col),
            };
        }
        Self::Unknown(input.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::game::{Game, Settings};

    #[test]
    fn parse_move() {
        assert_eq!(
            Command::parse("6 4 4 4\n"),
            Command::Move {
                from: (6, 4),
                to: (4, 4)
            }
        );
        assert_eq!(
            Command::parse("  1   2 3 4  "),
            Command::Move {
                from: (1, 2),
                to: (3, 4)
            }
        );
        // Range is checked against the board later.
        assert_eq!(
            Command::parse("-1 0 9 0"),
            Command::Move {
                from: (-1, 0),
                to: (9, 0)
            }
        );
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(Command::parse("undo"), Command::Undo);
        assert_eq!(Command::parse("board\n"), Command::Board);
        assert_eq!(Command::parse("HELP"), Command::Help);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("\n"), Command::Empty);
        assert_eq!(Command::parse("history"), Command::History);
        assert_eq!(Command::parse("Captured\n"), Command::Captured);
    }

    #[test]
    fn parse_selection() {
        assert_eq!(
            Command::parse("moves 7 1\n"),
            Command::Moves { from: (7, 1) }
        );
        assert_eq!(
            Command::parse("MOVES -1 3"),
            Command::Moves { from: (-1, 3) }
        );
        assert_eq!(
            Command::parse("moves 7"),
            Command::Unknown("moves 7".to_string())
        );
        assert_eq!(
            Command::parse("moves 7 1 5 2"),
            Command::Unknown("moves 7 1 5 2".to_string())
        );
    }

    #[test]
    fn unknown() {
        assert_eq!(
            Command::parse("6 4 4"),
            Command::Unknown("6 4 4".to_string())
        );
        assert_eq!(
            Command::parse("6 4 4 4 4"),
            Command::Unknown("6 4 4 4 4".to_string())
        );
        assert_eq!(
            Command::parse("e2e4"),
            Command::Unknown("e2e4".to_string())
        );
    }

    fn play(input: &str) -> (Option<Outcome>, String) {
        let mut game = Game::standard("Alice", "Bob", Settings::default()).unwrap();
        let mut interface = TextInterface::new(Cursor::new(input.to_string()), Vec::new());
        interface.greet().unwrap();
        let outcome = game.run(&mut interface).unwrap();
        (outcome, String::from_utf8(interface.into_output()).unwrap())
    }

    #[test]
    fn fools_mate() {
        let (outcome, output) = play("6 5 5 5\n1 4 3 4\n6 6 4 6\n0 3 4 7\n");
        assert_eq!(
            outcome,
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert!(output.starts_with("Chess Game Started!\n"));
        assert!(output.contains("Alice's turn:\n"));
        assert!(output.contains("Bob's turn:\n"));
        assert!(output.ends_with(
            "7 R N B Q K B N R\n\
             Alice is in checkmate. Bob wins!\n\
             Game Over!\n"
        ));
    }

    #[test]
    fn invalid_input_is_reprompted() {
        let (outcome, output) = play("hello\n6 4 9 4\n4 4 3 4\n1 4 3 4\nundo\nundo\nquit\n");
        assert_eq!(outcome, None);
        assert!(output.contains("Unknown command: hello. Type `help` for the list of commands.\n"));
        assert!(output.contains(
            "Invalid move: coordinates must be between 0 and 7 for rows and 0 and 7 for \
             columns. Please try again.\n"
        ));
        assert!(output.contains("Invalid move: there is no piece on (4, 4). Please try again.\n"));
        assert!(output.contains(
            "Invalid move: the piece on (1, 4) belongs to the opponent. Please try again.\n"
        ));
        assert!(output.contains("Can not do that: there are no moves to undo.\n"));
        assert!(output.ends_with("Alice's turn:\nGame Over!\n"));
    }

    #[test]
    fn game_state_commands() {
        let (_, output) = play(
            "history\ncaptured\nmoves 7 1\nmoves 9 9\nmoves 1 1\n6 4 4 4\nmoves 0 4\n\
             1 3 3 3\n4 4 3 3\nhistory\ncaptured\nmoves 0 4\n",
        );
        for expected in [
            "No moves yet.\n",
            "Captured by White: -\nCaptured by Black: -\n",
            "Legal moves from (7, 1): (5, 0) (5, 2)\n",
            "Invalid move: coordinates must be between 0 and 7 for rows and 0 and 7 for columns.",
            "Invalid move: the piece on (1, 1) belongs to the opponent. Please try again.\n",
            "No legal moves from (0, 4).\n",
            "Move history:\n\
             1. P (6, 4) -> (4, 4)\n\
             2. p (1, 3) -> (3, 3)\n\
             3. P (4, 4) -> (3, 3) x p\n",
            "Captured by White: p\nCaptured by Black: -\n",
            "Legal moves from (0, 4): (1, 3)\n",
        ] {
            assert!(output.contains(expected), "missing {expected:?} in:\n{output}");
        }
    }

    #[test]
    fn end_of_input_cancels() {
        let (outcome, output) = play("6 4 4 4\n");
        assert_eq!(outcome, None);
        assert!(output.ends_with("Bob's turn:\nGame Over!\n"));
    }

    #[test]
    fn help_and_board() {
        let (_, output) = play("help\nboard\n");
        assert!(output.contains(HELP));
        // Rendered by the game loop and on request.
        assert_eq!(output.matches("0 r n b q k b n r\n").count(), 2);
    }

    #[test]
    fn stalemate_report() {
        let mut interface = TextInterface::new(Cursor::new(String::new()), Vec::new());
        let players = [
            Player::new("Alice", Color::White),
            Player::new("Bob", Color::Black),
        ];
        interface
            .report_result(Some(Outcome::Stalemate), &players)
            .unwrap();
        interface
            .report_result(
                Some(Outcome::KingCaptured {
                    winner: Color::White,
                }),
                &players,
            )
            .unwrap();
        assert_eq!(
            String::from_utf8(interface.into_output()).unwrap(),
            "Stalemate! The game is a draw.\n\
             Game Over!\n\
             Bob's king was captured. Alice wins!\n\
             Game Over!\n"
        );
    }
}
