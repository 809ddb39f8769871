//! Breadth-first shortest paths over open cells

use std::collections::VecDeque;

use super::grid::{Cell, Grid};

/// Shortest sequence of open cells from `start` to `goal`, both included.
///
/// Returns `None` when either endpoint is not open or the goal cannot be
/// reached. In a perfect maze the shortest path is also the only simple path,
/// so neighbor order never changes the result there.
pub fn shortest_path(grid: &Grid, start: Cell, goal: Cell) -> Option<Vec<Cell>> {
    if !grid.is_open(start) || !grid.is_open(goal) {
        return None;
    }

    let width = grid.width();
    let index = |cell: Cell| cell.row * width + cell.col;

    let mut predecessor: Vec<Option<Cell>> = vec![None; grid.height() * width];
    let mut visited = vec![false; grid.height() * width];
    let mut queue = VecDeque::from([start]);
    visited[index(start)] = true;

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(previous) = predecessor[index(cursor)] {
                path.push(previous);
                cursor = previous;
            }
            path.reverse();
            return Some(path);
        }

        for neighbor in grid.open_neighbors(current) {
            let slot = index(neighbor);
            if !visited[slot] {
                visited[slot] = true;
                predecessor[slot] = Some(current);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::parse(&["#######", "#.....#", "#####.#", "#.....#", "#######"]).unwrap()
    }

    #[test]
    fn test_path_follows_corridor() {
        let grid = corridor();
        let path = shortest_path(&grid, Cell::new(1, 1), Cell::new(3, 1)).unwrap();
        assert_eq!(path.len(), 11);
        assert_eq!(path.first(), Some(&Cell::new(1, 1)));
        assert_eq!(path.last(), Some(&Cell::new(3, 1)));
        assert!(path.windows(2).all(|pair| pair[0].is_adjacent(pair[1])));
        assert!(path.iter().all(|cell| grid.is_open(*cell)));
    }

    #[test]
    fn test_same_start_and_goal() {
        let grid = corridor();
        let cell = Cell::new(1, 3);
        assert_eq!(shortest_path(&grid, cell, cell), Some(vec![cell]));
    }

    #[test]
    fn test_unreachable_goal() {
        let grid = Grid::parse(&["#####", "#.#.#", "#.#.#", "#.#.#", "#####"]).unwrap();
        assert_eq!(shortest_path(&grid, Cell::new(1, 1), Cell::new(1, 3)), None);
    }

    #[test]
    fn test_wall_endpoint() {
        let grid = corridor();
        assert_eq!(shortest_path(&grid, Cell::new(0, 0), Cell::new(1, 1)), None);
    }

    #[test]
    fn test_picks_shortest_when_loops_exist() {
        let grid = Grid::parse(&["#####", "#...#", "#.#.#", "#...#", "#####"]).unwrap();
        let path = shortest_path(&grid, Cell::new(1, 1), Cell::new(3, 3)).unwrap();
        assert_eq!(path.len(), 5);
    }
}
