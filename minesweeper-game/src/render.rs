//! Terminal presentation: clears the screen between turns and draws the
//! board with index headers and per-tile colours. Only this module knows
//! about styling; the core hands over semantic [`Tile`]s.

use std::io::{self, Write};

use crossterm::style::{Color, StyledContent, Stylize};
use crossterm::{cursor, execute, terminal};
use minesweeper_core::{BoardView, Tile};

pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
  execute!(
    out,
    terminal::Clear(terminal::ClearType::All),
    cursor::MoveTo(0, 0)
  )
}

/// Colour palette for adjacency counts 1..=8, cycling like the original
/// terminal colours.
fn count_colour(mines: u8) -> Color {
  match mines {
    1 | 6 => Color::Green,
    2 | 7 => Color::Yellow,
    3 | 8 => Color::Blue,
    4 => Color::Magenta,
    _ => Color::Cyan,
  }
}

fn styled(tile: Tile) -> StyledContent<String> {
  let symbol = tile.to_string();
  match tile {
    Tile::Hidden => symbol.stylize(),
    Tile::Mine => symbol.bold().on_red(),
    Tile::Blank => symbol.bold().white(),
    Tile::Count(mines) => symbol.bold().with(count_colour(mines)),
  }
}

/// Cell width that fits the largest column index plus one space of
/// separation. Row and column labels share it so the grid stays aligned.
fn cell_width(view: &BoardView<'_>) -> usize {
  view.cols().max(view.rows()).to_string().len() + 1
}

pub fn draw(out: &mut impl Write, view: &BoardView<'_>) -> io::Result<()> {
  let width = cell_width(view);

  write!(out, "{:>width$}", "")?;
  for col in 1..=view.cols() {
    write!(out, "{:>width$}", col)?;
  }
  writeln!(out)?;

  for row in 1..=view.rows() {
    write!(out, "{:>width$}", row)?;
    for col in 1..=view.cols() {
      let tile = view.tile(row, col);
      // Pad with the raw symbol's length; the styled form carries
      // escape codes that would confuse the format width.
      let pad = width - tile.to_string().len();
      write!(out, "{:>pad$}{}", "", styled(tile))?;
    }
    writeln!(out)?;
  }

  Ok(())
}

pub fn banner(out: &mut impl Write, won: bool) -> io::Result<()> {
  if won {
    writeln!(out, "{}", "You win".bold().on_green())
  } else {
    writeln!(out, "{}", "You lose".bold().on_red())
  }
}
