//! Trap and bonus placement over generated mazes.

use std::collections::HashSet;

use mazerl::maze::{Cell, Grid, MazeLayout, find_start_goal, place_hazards, shortest_path};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn traps_stay_off_the_solution_path() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = MazeLayout::generate(17, 17, 5, 5, &mut rng).unwrap();
        let path: HashSet<Cell> = layout.solution.clone().unwrap().into_iter().collect();

        assert_eq!(layout.hazards.traps.len(), 5);
        assert_eq!(layout.hazards.bonuses.len(), 5);
        for trap in &layout.hazards.traps {
            assert!(!path.contains(trap), "trap {trap} on path, seed {seed}");
            assert!(layout.grid.is_open(*trap));
        }
        for bonus in &layout.hazards.bonuses {
            assert!(layout.grid.is_open(*bonus));
        }
        assert!(layout.hazards.traps.is_disjoint(&layout.hazards.bonuses));
        for endpoint in [layout.start, layout.goal] {
            assert!(!layout.hazards.is_trap(endpoint));
            assert!(!layout.hazards.is_bonus(endpoint));
        }
    }
}

#[test]
fn counts_are_capped_by_available_cells() {
    // Straight corridor: every open cell is on the path, so no trap fits.
    let grid = Grid::parse(&["#######", "#     #", "#######", "#######", "#######"]).unwrap();
    let (start, goal) = find_start_goal(&grid).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let hazards = place_hazards(&grid, start, goal, 3, 10, &mut rng);
    assert!(hazards.traps.is_empty());
    // Only the three interior corridor cells can hold bonuses.
    assert_eq!(hazards.bonuses.len(), 3);
    let path: HashSet<Cell> = shortest_path(&grid, start, goal)
        .unwrap()
        .into_iter()
        .collect();
    assert!(hazards.bonuses.iter().all(|b| path.contains(b)));
}

#[test]
fn unreachable_goal_places_nothing() {
    let grid = Grid::parse(&["#####", "# # #", "#####", "#####", "#####"]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let hazards = place_hazards(&grid, Cell::new(1, 1), Cell::new(1, 3), 2, 2, &mut rng);
    assert!(hazards.is_empty());
}
