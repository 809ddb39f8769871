//! Trap and bonus placement

use std::collections::HashSet;

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    grid::{Cell, Grid},
    path::shortest_path,
};

/// Disjoint trap and bonus cells for one maze
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazards {
    pub traps: HashSet<Cell>,
    pub bonuses: HashSet<Cell>,
}

impl Hazards {
    pub fn new(traps: HashSet<Cell>, bonuses: HashSet<Cell>) -> Self {
        Self { traps, bonuses }
    }

    pub fn is_trap(&self, cell: Cell) -> bool {
        self.traps.contains(&cell)
    }

    pub fn is_bonus(&self, cell: Cell) -> bool {
        self.bonuses.contains(&cell)
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty() && self.bonuses.is_empty()
    }
}

/// Sample traps off the solution path and bonuses from what remains.
///
/// Traps are drawn uniformly without replacement from open cells that are not
/// on the shortest `start`-`goal` path. Bonuses are drawn from open cells that
/// did not become traps, so they may sit on the path. Neither set ever holds
/// `start` or `goal`. Counts are capped by the number of candidates.
///
/// When the goal is unreachable both sets come back empty and training can
/// proceed without hazards.
pub fn place_hazards<R: Rng + ?Sized>(
    grid: &Grid,
    start: Cell,
    goal: Cell,
    trap_count: usize,
    bonus_count: usize,
    rng: &mut R,
) -> Hazards {
    let Some(path) = shortest_path(grid, start, goal) else {
        warn!(%start, %goal, "no path between start and goal; placing no hazards");
        return Hazards::default();
    };
    let path: HashSet<Cell> = path.into_iter().collect();

    let free: Vec<Cell> = grid
        .open_cells()
        .filter(|cell| *cell != start && *cell != goal)
        .collect();

    let trap_candidates: Vec<Cell> = free
        .iter()
        .copied()
        .filter(|cell| !path.contains(cell))
        .collect();
    let traps: HashSet<Cell> = trap_candidates
        .choose_multiple(rng, trap_count.min(trap_candidates.len()))
        .copied()
        .collect();

    let bonus_candidates: Vec<Cell> = free
        .into_iter()
        .filter(|cell| !traps.contains(cell))
        .collect();
    let bonuses: HashSet<Cell> = bonus_candidates
        .choose_multiple(rng, bonus_count.min(bonus_candidates.len()))
        .copied()
        .collect();

    Hazards { traps, bonuses }
}
