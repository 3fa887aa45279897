use std::io::{self, BufRead, Write};

use minesweeper_core::{Board, GameError};
use thiserror::Error;

mod render;

const ROWS: u32 = 10;
const COLS: u32 = 10;

/// Controller state, re-derived from the board after every turn.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum GameState {
  Playing,
  Ended { won: bool },
}

impl From<&Board> for GameState {
  fn from(board: &Board) -> Self {
    if board.ended() {
      GameState::Ended { won: board.won() }
    } else {
      GameState::Playing
    }
  }
}

#[derive(Debug, Error)]
enum InputError {
  #[error("enter two numbers separated by a space, like: 3 7")]
  Malformed,
  #[error("input closed")]
  Closed,
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Prompts for and parses one 1-indexed (row, column) pair.
fn read_turn(input: &mut impl BufRead, output: &mut impl Write) -> Result<(u32, u32), InputError> {
  write!(output, "Enter row, column: ")?;
  output.flush()?;

  let mut line = String::new();
  if input.read_line(&mut line)? == 0 {
    return Err(InputError::Closed);
  }

  parse_turn(&line)
}

fn parse_turn(line: &str) -> Result<(u32, u32), InputError> {
  let mut tokens = line.split_whitespace().map(str::parse::<u32>);
  match (tokens.next(), tokens.next(), tokens.next()) {
    (Some(Ok(row)), Some(Ok(col)), None) => Ok((row, col)),
    _ => Err(InputError::Malformed),
  }
}

fn play(
  board: &mut Board,
  input: &mut impl BufRead,
  output: &mut impl Write,
) -> anyhow::Result<()> {
  let mut status: Option<String> = None;

  while GameState::from(&*board) == GameState::Playing {
    render::clear_screen(output)?;
    render::draw(output, &board.view())?;
    writeln!(output, "\nRevealed: {}", board.revealed_count())?;
    if let Some(message) = status.take() {
      writeln!(output, "{}", message)?;
    }

    let (row, col) = match read_turn(input, output) {
      Ok(turn) => turn,
      Err(InputError::Closed) => return Ok(()),
      Err(err @ InputError::Malformed) => {
        status = Some(err.to_string());
        continue;
      }
      Err(InputError::Io(err)) => return Err(err.into()),
    };

    match board.reveal(row, col) {
      Ok(_) => {}
      Err(err @ GameError::OutOfRangeCoordinate { .. }) => {
        status = Some(err.to_string());
      }
      Err(err) => return Err(err.into()),
    }
  }

  render::clear_screen(output)?;
  render::draw(output, &board.full_reveal_view())?;
  render::banner(output, board.won())?;
  Ok(())
}

fn main() -> anyhow::Result<()> {
  let mut board = Board::new(ROWS, COLS)?;
  let mut stdin = io::stdin().lock();
  let mut stdout = io::stdout();
  play(&mut board, &mut stdin, &mut stdout)
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use minesweeper_core::grid::{Grid, Pos};

  use super::*;

  #[test]
  fn parse_accepts_two_whitespace_separated_numbers() {
    assert_eq!(parse_turn("3 7\n").unwrap(), (3, 7));
    assert_eq!(parse_turn("  10   1  ").unwrap(), (10, 1));
  }

  #[test]
  fn parse_rejects_malformed_lines() {
    for line in ["", "\n", "3", "a b", "1 2 3", "4 x", "-1 2", "1.5 2"] {
      assert!(matches!(parse_turn(line), Err(InputError::Malformed)), "accepted {:?}", line);
    }
  }

  #[test]
  fn read_turn_reports_closed_input() {
    let mut input = Cursor::new("");
    let mut output = Vec::new();
    assert!(matches!(
      read_turn(&mut input, &mut output),
      Err(InputError::Closed)
    ));
  }

  #[test]
  fn state_follows_the_board() {
    let mut mines = Grid::new(2, 2, false);
    mines[Pos::new(0, 0)] = true;
    let mut board = Board::from_mines(&mines);
    assert_eq!(GameState::from(&board), GameState::Playing);

    board.reveal(1, 1).unwrap();
    assert_eq!(GameState::from(&board), GameState::Ended { won: false });
  }

  #[test]
  fn malformed_and_out_of_range_input_do_not_end_the_session() {
    let mut mines = Grid::new(2, 2, false);
    mines[Pos::new(0, 0)] = true;
    let mut board = Board::from_mines(&mines);

    // Two bad lines, one out-of-range turn, then the losing reveal.
    let mut input = Cursor::new("oops\n1 2 3\n9 9\n1 1\n");
    let mut output = Vec::new();
    play(&mut board, &mut input, &mut output).unwrap();

    assert_eq!(GameState::from(&board), GameState::Ended { won: false });
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("You lose"));
  }

  #[test]
  fn session_ends_cleanly_on_eof() {
    let mut board = Board::new(3, 3).unwrap();
    let mut input = Cursor::new("2 2\n");
    let mut output = Vec::new();
    // The one supplied turn may or may not end the game; either way the
    // session must finish without error once input runs dry.
    play(&mut board, &mut input, &mut output).unwrap();
  }
}
