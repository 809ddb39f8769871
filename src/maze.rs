//! Maze construction
//!
//! This module provides:
//! - [`Grid`] and [`Cell`], the wall/open lattice the agent moves on
//! - [`generate_maze`], randomized depth-first carving of a perfect maze
//! - [`shortest_path`], breadth-first search between two open cells
//! - [`place_hazards`], trap and bonus sampling that keeps the solution path
//!   free of traps
//! - [`MazeLayout`], the immutable bundle one training run works against

pub mod generator;
pub mod grid;
pub mod hazards;
pub mod path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use generator::{generate_maze, rooms_along};
pub use grid::{Cell, CellState, Grid, MIN_DIMENSION};
pub use hazards::{Hazards, place_hazards};
pub use path::shortest_path;

use crate::{Error, Result};

/// First open cell in row-major order and last open cell in row-major order.
pub fn find_start_goal(grid: &Grid) -> Option<(Cell, Cell)> {
    let mut open = grid.open_cells();
    let start = open.next()?;
    let goal = open.last().unwrap_or(start);
    Some((start, goal))
}

/// Everything fixed for the lifetime of one training run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub grid: Grid,
    pub start: Cell,
    pub goal: Cell,
    /// Shortest start-goal path, `None` if the goal is unreachable
    pub solution: Option<Vec<Cell>>,
    pub hazards: Hazards,
}

impl MazeLayout {
    /// Generate a maze, locate start and goal, and place hazards.
    pub fn generate<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        trap_count: usize,
        bonus_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let grid = generate_maze(height, width, rng)?;
        let layout = Self::with_grid(grid, trap_count, bonus_count, rng)?;
        info!(
            height,
            width,
            start = %layout.start,
            goal = %layout.goal,
            path_len = layout.solution_len(),
            traps = layout.hazards.traps.len(),
            bonuses = layout.hazards.bonuses.len(),
            "maze ready"
        );
        Ok(layout)
    }

    /// Build a layout over an existing grid.
    pub fn with_grid<R: Rng + ?Sized>(
        grid: Grid,
        trap_count: usize,
        bonus_count: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let (start, goal) = find_start_goal(&grid).ok_or_else(|| Error::InvalidConfiguration {
            message: "grid has no open cells".to_string(),
        })?;
        let solution = shortest_path(&grid, start, goal);
        let hazards = place_hazards(&grid, start, goal, trap_count, bonus_count, rng);
        Ok(Self {
            grid,
            start,
            goal,
            solution,
            hazards,
        })
    }

    /// Layout with explicitly chosen hazards, for scripted scenarios.
    pub fn from_parts(grid: Grid, start: Cell, goal: Cell, hazards: Hazards) -> Result<Self> {
        for cell in [start, goal] {
            if !grid.is_open(cell) {
                return Err(Error::InvalidConfiguration {
                    message: format!("cell {cell} is not open"),
                });
            }
        }
        let solution = shortest_path(&grid, start, goal);
        Ok(Self {
            grid,
            start,
            goal,
            solution,
            hazards,
        })
    }

    /// Number of cells on the solution path, start and goal included.
    pub fn solution_len(&self) -> Option<usize> {
        self.solution.as_ref().map(Vec::len)
    }
}
