//! Grid representation and basic cell operations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Smallest supported grid side, border included.
pub const MIN_DIMENSION: usize = 5;

/// A grid coordinate. Equality and hashing are by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell displaced by a signed delta, or `None` if it would leave the
    /// non-negative quadrant.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Whether `other` is one orthogonal step away.
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Wall,
    Open,
}

impl CellState {
    pub fn to_char(self) -> char {
        match self {
            CellState::Wall => '#',
            CellState::Open => '.',
        }
    }

    pub fn from_char(c: char) -> Option<CellState> {
        match c {
            '#' | '1' => Some(CellState::Wall),
            '.' | ' ' | '0' => Some(CellState::Open),
            _ => None,
        }
    }
}

/// Row-major `height x width` grid of walls and open cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an all-wall grid.
    pub fn walls(height: usize, width: usize) -> Result<Self> {
        if height < MIN_DIMENSION || width < MIN_DIMENSION {
            return Err(Error::InvalidDimensions {
                height,
                width,
                minimum: MIN_DIMENSION,
            });
        }
        Ok(Self {
            height,
            width,
            cells: vec![CellState::Wall; height * width],
        })
    }

    /// Parse a grid from text rows using `#` for walls and `.` for open cells.
    ///
    /// ```
    /// use mazerl::maze::{Cell, Grid};
    ///
    /// let grid = Grid::parse(&["#####", "#...#", "###.#", "#...#", "#####"])?;
    /// assert!(grid.is_open(Cell::new(1, 1)));
    /// assert!(!grid.is_open(Cell::new(2, 1)));
    /// # Ok::<(), mazerl::Error>(())
    /// ```
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut grid = Self::walls(height, width)?;

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != width {
                return Err(Error::InvalidConfiguration {
                    message: format!("grid row {row} has length {len}, expected {width}"),
                });
            }
            for (col, c) in line.chars().enumerate() {
                let state = CellState::from_char(c).ok_or_else(|| Error::InvalidConfiguration {
                    message: format!("invalid grid character '{c}' at ({row}, {col})"),
                })?;
                grid.cells[row * width + col] = state;
            }
        }
        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// State of `cell`, or `None` when it lies outside the grid.
    pub fn get(&self, cell: Cell) -> Option<CellState> {
        self.contains(cell)
            .then(|| self.cells[cell.row * self.width + cell.col])
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.get(cell) == Some(CellState::Open)
    }

    pub(crate) fn open(&mut self, cell: Cell) {
        if self.contains(cell) {
            self.cells[cell.row * self.width + cell.col] = CellState::Open;
        }
    }

    /// All open cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == CellState::Open)
            .map(|(idx, _)| Cell::new(idx / self.width, idx % self.width))
    }

    /// Open cells one orthogonal step away from `cell`.
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| cell.offset(dr, dc))
            .filter(|neighbor| self.is_open(*neighbor))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                write!(f, "{}", self.cells[row * self.width + col].to_char())?;
            }
            if row + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
