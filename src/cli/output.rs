//! Output formatting for CLI

use crate::{
    maze::{Cell, MazeLayout},
    q_learning::QTable,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a ratio as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Greedy action per open cell drawn as arrows over the maze.
///
/// Walls print as `#`, the goal as `G`, and cells whose values are all zero
/// (never updated) as `.`.
pub fn policy_map(layout: &MazeLayout, table: &QTable) -> String {
    let grid = &layout.grid;
    let mut out = String::with_capacity(grid.height() * (grid.width() + 1));
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = Cell::new(row, col);
            let symbol = if !grid.is_open(cell) {
                '#'
            } else if cell == layout.goal {
                'G'
            } else if table.action_values(cell).iter().all(|v| *v == 0.0) {
                '.'
            } else {
                table.greedy_action(cell).arrow()
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// Greedy action per cell for a table with no maze attached.
pub fn table_policy_map(table: &QTable) -> String {
    let (rows, cols) = table.shape();
    let mut out = String::with_capacity(rows * (cols + 1));
    for row in 0..rows {
        for col in 0..cols {
            let cell = Cell::new(row, col);
            let values = table.action_values(cell);
            if values.iter().all(|v| *v == 0.0) {
                out.push('.');
            } else {
                out.push(table.greedy_action(cell).arrow());
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        environment::Action,
        maze::{Grid, Hazards},
    };

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_policy_map_marks_goal_and_untouched_cells() {
        let grid = Grid::parse(&["#####", "#   #", "#####", "#####", "#####"]).unwrap();
        let layout = MazeLayout::from_parts(
            grid,
            Cell::new(1, 1),
            Cell::new(1, 3),
            Hazards::new(HashSet::new(), HashSet::new()),
        )
        .unwrap();
        let mut table = QTable::new(5, 5);
        table.set(Cell::new(1, 1), Action::Right, 1.0);

        let map = policy_map(&layout, &table);
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines[0], "#####");
        assert_eq!(lines[1], "#>.G#");
    }
}
