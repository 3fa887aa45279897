use core::fmt;

use rand::Rng;
use thiserror::Error;

use crate::grid::{Grid, GridExplorer, Pos};

pub mod grid;

/// One grid position. A mine carries no adjacency count; the count of a
/// field cell is the number of its up-to-8 neighbours that are mines.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Cell {
  Mine,
  Field(u8),
}

impl Cell {
  pub fn is_mine(self) -> bool {
    matches!(self, Cell::Mine)
  }

  pub fn is_blank(self) -> bool {
    matches!(self, Cell::Field(0))
  }

  fn notify_mine(cell: &mut Cell) {
    if let Cell::Field(mines) = cell {
      *mines += 1;
    }
  }
}

/// What a renderer sees at one position: the semantic category of the
/// cell, already filtered through its revealed state.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Tile {
  Hidden,
  Mine,
  Blank,
  Count(u8),
}

impl fmt::Display for Tile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Tile::Hidden => write!(f, "."),
      Tile::Mine => write!(f, "X"),
      Tile::Blank => write!(f, "-"),
      Tile::Count(mines) => write!(f, "{}", mines),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum GameError {
  #[error("board dimensions must be at least 1x1, got {rows}x{cols}")]
  InvalidDimensions { rows: u32, cols: u32 },
  #[error("({row}, {col}) is outside the board; rows and columns go from 1 to {rows} and {cols}")]
  OutOfRangeCoordinate { row: u32, col: u32, rows: u32, cols: u32 },
}

/// Result of a single in-range reveal.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RevealOutcome {
  /// A hidden field cell was revealed (plus its blank region, if any).
  Revealed,
  /// The target was already revealed, or the game had already ended.
  AlreadyRevealed,
  /// The target was a mine. The game is over and lost.
  Detonated,
}

/// The minefield and all game-session state. Mines are fixed at
/// construction; afterwards the only mutation is through [`Board::reveal`].
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
  cells: Grid<Cell>,
  revealed: Grid<bool>,
  mine_count: u32,
  revealed_count: u32,
  ended: bool,
  won: bool,
}

impl Board {
  /// Builds a `rows` × `cols` board with `max(rows, cols)` randomly
  /// placed mines.
  pub fn new(rows: u32, cols: u32) -> Result<Board, GameError> {
    Self::with_rng(rows, cols, &mut rand::thread_rng())
  }

  /// Like [`Board::new`] with a caller-supplied RNG, so tests can seed
  /// a `StdRng` and get reproducible minefields.
  pub fn with_rng(rows: u32, cols: u32, rng: &mut impl Rng) -> Result<Board, GameError> {
    if rows == 0 || cols == 0 {
      return Err(GameError::InvalidDimensions { rows, cols });
    }

    let mine_count = rows.max(cols);
    let mut mines = Grid::new(rows, cols, false);
    let mut placed = 0;

    // Rejection sampling: re-roll when the chosen cell is already a
    // mine. mine_count <= rows*cols, so this always finishes.
    while placed < mine_count {
      let pos = Pos::new(
        rng.gen_range(0..rows) as i32,
        rng.gen_range(0..cols) as i32,
      );
      if !mines[pos] {
        mines[pos] = true;
        placed += 1;
      }
    }

    Ok(Self::from_mines(&mines))
  }

  /// Builds a board from an explicit mine mask, computing every field
  /// cell's adjacency count.
  pub fn from_mines(mines: &Grid<bool>) -> Board {
    let mut cells = Grid::new(mines.rows, mines.cols, Cell::Field(0));
    let mut mine_count = 0;
    for (pos, &is_mine) in mines.enumerate() {
      if is_mine {
        mine_count += 1;
        cells[pos] = Cell::Mine;
        for neighbour_pos in pos.neighbours() {
          if let Some(neighbour) = cells.get_mut(neighbour_pos) {
            Cell::notify_mine(neighbour);
          }
        }
      }
    }

    Board {
      revealed: Grid::new(cells.rows, cells.cols, false),
      cells,
      mine_count,
      revealed_count: 0,
      ended: false,
      won: false,
    }
  }

  pub fn rows(&self) -> u32 {
    self.cells.rows
  }

  pub fn cols(&self) -> u32 {
    self.cells.cols
  }

  pub fn mine_count(&self) -> u32 {
    self.mine_count
  }

  pub fn revealed_count(&self) -> u32 {
    self.revealed_count
  }

  pub fn safe_cell_count(&self) -> u32 {
    self.rows() * self.cols() - self.mine_count
  }

  pub fn ended(&self) -> bool {
    self.ended
  }

  /// Meaningful only once [`Board::ended`] is true.
  pub fn won(&self) -> bool {
    self.won
  }

  /// Reveals the cell at the 1-indexed coordinate.
  ///
  /// Out-of-range coordinates are reported as
  /// [`GameError::OutOfRangeCoordinate`] and mutate nothing. Revealing a
  /// mine latches the lost end state; revealing the last safe cell
  /// latches the won end state. Once ended, further calls are no-ops.
  pub fn reveal(&mut self, row: u32, col: u32) -> Result<RevealOutcome, GameError> {
    if !(1..=self.rows()).contains(&row) || !(1..=self.cols()).contains(&col) {
      return Err(GameError::OutOfRangeCoordinate {
        row,
        col,
        rows: self.rows(),
        cols: self.cols(),
      });
    }

    if self.ended {
      return Ok(RevealOutcome::AlreadyRevealed);
    }

    let pos = Pos::new(row as i32 - 1, col as i32 - 1);
    match self.cells[pos] {
      Cell::Mine => {
        self.ended = true;
        self.won = false;
        Ok(RevealOutcome::Detonated)
      }
      Cell::Field(_) if self.revealed[pos] => Ok(RevealOutcome::AlreadyRevealed),
      Cell::Field(mines) => {
        self.mark_revealed(pos);
        if mines == 0 {
          self.explore(pos);
        }
        if self.revealed_count == self.safe_cell_count() {
          self.ended = true;
          self.won = true;
        }
        Ok(RevealOutcome::Revealed)
      }
    }
  }

  fn mark_revealed(&mut self, pos: Pos) {
    self.revealed[pos] = true;
    self.revealed_count += 1;
  }

  /// Flood fill from a blank cell: reveals its connected blank region
  /// and the ring of numbered cells bordering it. A blank never
  /// neighbours a mine, so the expansion cannot reveal one.
  fn explore(&mut self, start: Pos) {
    let mut explorer = GridExplorer::from(&self.cells);
    explorer.enqueue(start);

    while let Some(pos) = explorer.pop() {
      if !self.revealed[pos] {
        self.mark_revealed(pos);
      }
      if self.cells[pos].is_blank() {
        explorer.enqueue_all(pos.neighbours());
      }
    }
  }

  /// Read-only projection of the player-visible board.
  pub fn view(&self) -> BoardView<'_> {
    BoardView {
      board: self,
      reveal_all: false,
    }
  }

  /// Read-only projection with every cell shown, for the end-of-game
  /// display. Persistent revealed state is untouched.
  pub fn full_reveal_view(&self) -> BoardView<'_> {
    BoardView {
      board: self,
      reveal_all: true,
    }
  }
}

impl fmt::Debug for Board {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.view())
  }
}

/// A borrowing snapshot of a [`Board`] for rendering.
#[derive(Clone, Copy)]
pub struct BoardView<'a> {
  board: &'a Board,
  reveal_all: bool,
}

impl BoardView<'_> {
  pub fn rows(&self) -> u32 {
    self.board.rows()
  }

  pub fn cols(&self) -> u32 {
    self.board.cols()
  }

  /// The tile at the 1-indexed coordinate. Panics when out of range;
  /// renderers only iterate in-range indices.
  pub fn tile(&self, row: u32, col: u32) -> Tile {
    let pos = Pos::new(row as i32 - 1, col as i32 - 1);
    if !self.reveal_all && !self.board.revealed[pos] {
      return Tile::Hidden;
    }
    match self.board.cells[pos] {
      Cell::Mine => Tile::Mine,
      Cell::Field(0) => Tile::Blank,
      Cell::Field(mines) => Tile::Count(mines),
    }
  }
}

impl fmt::Debug for BoardView<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for row in 1..=self.rows() {
      for col in 1..=self.cols() {
        write!(f, "{}", self.tile(row, col))?;
      }
      writeln!(f)?;
    }

    Ok(())
  }
}
