use core::fmt;
use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

/// The 8 neighbour offsets of a cell, row-major.
pub static NEIGHBOUR_OFFSETS: [Pos; 8] = [
  Pos::new(-1, -1),
  Pos::new(-1, 0),
  Pos::new(-1, 1),
  Pos::new(0, -1),
  Pos::new(0, 1),
  Pos::new(1, -1),
  Pos::new(1, 0),
  Pos::new(1, 1),
];

/// A 0-indexed grid position. Signed so border cells can form their
/// out-of-bounds neighbours and have them rejected by `Grid::get`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
  pub row: i32,
  pub col: i32,
}

impl Pos {
  pub const fn new(row: i32, col: i32) -> Pos {
    Pos { row, col }
  }

  pub fn neighbours(self) -> impl Iterator<Item = Pos> {
    NEIGHBOUR_OFFSETS
      .iter()
      .map(move |&off| Pos::new(self.row + off.row, self.col + off.col))
  }
}

impl fmt::Debug for Pos {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.row, self.col)
  }
}

/// A rows × cols rectangle of `T` over flat storage.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
  pub rows: u32,
  pub cols: u32,
  cells: Vec<T>,
}

impl<T> Grid<T> {
  pub fn new(rows: u32, cols: u32, default: T) -> Self
  where
    T: Clone,
  {
    Self {
      rows,
      cols,
      cells: vec![default; (rows * cols) as usize],
    }
  }

  fn pos_to_index(&self, pos: Pos) -> Option<usize> {
    match (usize::try_from(pos.row), usize::try_from(pos.col)) {
      (Ok(row), Ok(col)) if row < self.rows as usize && col < self.cols as usize => {
        Some(col + row * (self.cols as usize))
      }
      _ => None,
    }
  }

  pub fn get(&self, pos: Pos) -> Option<&T> {
    self.pos_to_index(pos).and_then(|i| self.cells.get(i))
  }

  pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
    self.pos_to_index(pos).and_then(|i| self.cells.get_mut(i))
  }

  pub fn positions(&self) -> impl Iterator<Item = Pos> {
    let cols = self.cols as i32;
    (0..self.rows as i32 * cols).map(move |i| Pos::new(i / cols, i % cols))
  }

  pub fn enumerate(&self) -> impl Iterator<Item = (Pos, &T)> {
    self.positions().zip(self.cells.iter())
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.cells.iter()
  }
}

impl<T> Index<Pos> for Grid<T> {
  type Output = T;

  fn index(&self, index: Pos) -> &Self::Output {
    self.get(index).unwrap_or_else(|| {
      panic!(
        "Cannot access position {:?} on grid with size {}x{}",
        index, self.rows, self.cols
      )
    })
  }
}

impl<T> IndexMut<Pos> for Grid<T> {
  fn index_mut(&mut self, index: Pos) -> &mut T {
    let (rows, cols) = (self.rows, self.cols);
    self.get_mut(index).unwrap_or_else(|| {
      panic!(
        "Cannot mut-access position {:?} on grid with size {}x{}",
        index, rows, cols
      )
    })
  }
}

/// Work-list traversal over a grid. Replaces recursive flood fill: each
/// position is enqueued at most once, so a pass over an n-cell grid pops
/// at most n positions and always terminates.
pub struct GridExplorer {
  queue: VecDeque<Pos>,
  visited: Grid<bool>,
}

impl GridExplorer {
  pub fn enqueue(&mut self, pos: Pos) -> bool {
    if let Some(seen) = self.visited.get_mut(pos) {
      if !*seen {
        *seen = true;
        self.queue.push_back(pos);
        return true;
      }
    }
    false
  }

  pub fn enqueue_all(&mut self, all: impl IntoIterator<Item = Pos>) {
    for pos in all {
      self.enqueue(pos);
    }
  }

  pub fn pop(&mut self) -> Option<Pos> {
    self.queue.pop_front()
  }
}

impl<T> From<&Grid<T>> for GridExplorer {
  fn from(grid: &Grid<T>) -> Self {
    Self {
      queue: VecDeque::new(),
      visited: Grid::new(grid.rows, grid.cols, false),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn positions_cover_grid_in_row_major_order() {
    let grid = Grid::new(2, 3, 0u8);
    let positions: Vec<_> = grid.positions().collect();
    assert_eq!(
      positions,
      vec![
        Pos::new(0, 0),
        Pos::new(0, 1),
        Pos::new(0, 2),
        Pos::new(1, 0),
        Pos::new(1, 1),
        Pos::new(1, 2),
      ]
    );
  }

  #[test]
  fn corner_has_three_in_bounds_neighbours() {
    let grid = Grid::new(4, 4, ());
    let in_bounds = Pos::new(0, 0)
      .neighbours()
      .filter(|&pos| grid.get(pos).is_some())
      .count();
    assert_eq!(in_bounds, 3);
  }

  #[test]
  fn interior_cell_has_eight_neighbours_excluding_itself() {
    let center = Pos::new(2, 2);
    let neighbours: Vec<_> = center.neighbours().collect();
    assert_eq!(neighbours.len(), 8);
    assert!(!neighbours.contains(&center));
  }

  #[test]
  fn out_of_bounds_get_is_none() {
    let grid = Grid::new(3, 3, 0u8);
    assert!(grid.get(Pos::new(-1, 0)).is_none());
    assert!(grid.get(Pos::new(0, 3)).is_none());
    assert!(grid.get(Pos::new(3, 0)).is_none());
    assert!(grid.get(Pos::new(2, 2)).is_some());
  }

  #[test]
  fn explorer_enqueues_each_position_once() {
    let grid = Grid::new(3, 3, ());
    let mut explorer = GridExplorer::from(&grid);
    assert!(explorer.enqueue(Pos::new(1, 1)));
    assert!(!explorer.enqueue(Pos::new(1, 1)));
    assert!(!explorer.enqueue(Pos::new(5, 5)));
    assert_eq!(explorer.pop(), Some(Pos::new(1, 1)));
    assert_eq!(explorer.pop(), None);
  }

  #[test]
  fn explorer_visits_whole_grid_exactly_once() {
    let grid = Grid::new(5, 5, ());
    let mut explorer = GridExplorer::from(&grid);
    explorer.enqueue(Pos::new(2, 2));
    let mut popped = 0;
    while let Some(pos) = explorer.pop() {
      popped += 1;
      explorer.enqueue_all(pos.neighbours());
    }
    assert_eq!(popped, 25);
  }
}
