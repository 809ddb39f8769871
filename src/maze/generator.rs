//! Randomized depth-first maze carving
//!
//! Rooms live on odd coordinates strictly inside the border. Carving starts at
//! a random room and walks two-step neighbors in shuffled order, opening the
//! wall between the current room and any neighbor that is still a wall. A
//! neighbor is only joined while it is unvisited, so the open cells always
//! form a spanning tree over the rooms: a perfect maze.
//!
//! The walk uses an explicit stack of frames instead of recursion so the
//! maze size is not limited by the call stack. Each frame keeps its own
//! shuffled direction list and resumes where it left off, which visits cells
//! in exactly the order the recursive formulation would.

use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use super::grid::{Cell, Grid};
use crate::Result;

const CARVE_DIRECTIONS: [(isize, isize); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

struct Frame {
    cell: Cell,
    directions: [(isize, isize); 4],
    next: usize,
}

impl Frame {
    fn new<R: Rng + ?Sized>(cell: Cell, rng: &mut R) -> Self {
        let mut directions = CARVE_DIRECTIONS;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }
}

/// Number of room coordinates along an axis of length `len`.
///
/// Rooms sit at `1, 3, 5, ...` while `room + 1 < len`, which leaves a wall
/// border on both sides. Even lengths get a double wall on the far side.
pub fn rooms_along(len: usize) -> usize {
    len.saturating_sub(1) / 2
}

fn is_room(grid: &Grid, cell: Cell) -> bool {
    cell.row % 2 == 1
        && cell.col % 2 == 1
        && cell.row + 1 < grid.height()
        && cell.col + 1 < grid.width()
}

/// Generate a perfect maze of the given dimensions.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidDimensions`] if either side is below
/// [`super::MIN_DIMENSION`].
///
/// # Examples
///
/// ```
/// use mazerl::maze::{Cell, generate_maze};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let grid = generate_maze(7, 7, &mut rng)?;
/// // Every room is carved, so the corner rooms are always open.
/// assert!(grid.is_open(Cell::new(1, 1)));
/// assert!(grid.is_open(Cell::new(5, 5)));
/// # Ok::<(), mazerl::Error>(())
/// ```
pub fn generate_maze<R: Rng + ?Sized>(height: usize, width: usize, rng: &mut R) -> Result<Grid> {
    let mut grid = Grid::walls(height, width)?;

    let origin = Cell::new(
        2 * rng.random_range(0..rooms_along(height)) + 1,
        2 * rng.random_range(0..rooms_along(width)) + 1,
    );
    grid.open(origin);

    let mut stack = vec![Frame::new(origin, rng)];
    let mut carved = 1usize;

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.directions.len() {
            stack.pop();
            continue;
        }
        let (d_row, d_col) = frame.directions[frame.next];
        frame.next += 1;
        let current = frame.cell;

        let Some(target) = current.offset(d_row, d_col) else {
            continue;
        };
        if !is_room(&grid, target) || grid.is_open(target) {
            continue;
        }

        let Some(between) = current.offset(d_row / 2, d_col / 2) else {
            continue;
        };
        grid.open(between);
        grid.open(target);
        carved += 1;
        stack.push(Frame::new(target, rng));
    }

    debug!(height, width, %origin, rooms = carved, "carved maze");
    Ok(grid)
}
