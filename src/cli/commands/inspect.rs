//! Inspect command - Summarize a stored value table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::train::parse_size_arg;
use crate::{
    app::{App, MazeSize, RunConfig},
    cli::output,
};

#[derive(Parser, Debug)]
#[command(about = "Summarize a stored value table")]
pub struct InspectArgs {
    /// Maze interior size (5, 10 or 15) whose table to inspect
    #[arg(long, short = 's', value_parser = parse_size_arg)]
    pub size: MazeSize,

    /// Directory holding the stored value tables
    #[arg(long, default_value = ".")]
    pub table_dir: PathBuf,

    /// Seed of the training run; draws the greedy policy over that run's maze
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let app = App::with_table_dir(&args.table_dir);
    let path = app.table_path(args.size);
    let table = app
        .table_repository()
        .load(&path)
        .with_context(|| format!("failed to load value table {}", path.display()))?;

    let (rows, cols) = table.shape();
    output::print_section(&format!("Value table {}", path.display()));
    output::print_kv("Shape", &format!("{rows} x {cols} x 4"));
    output::print_kv("Non-zero entries", &output::format_number(table.nonzero_count()));
    match table.value_range() {
        Some((min, max)) => output::print_kv("Value range", &format!("{min:.4} .. {max:.4}")),
        None => output::print_kv("Value range", "empty"),
    }

    output::print_subsection("Greedy policy");
    let layout = match args.seed {
        Some(seed) => Some(app.create_layout(&RunConfig::new(args.size).with_seed(seed))?),
        None => None,
    };
    match layout {
        Some(layout) if layout.grid.height() == rows && layout.grid.width() == cols => {
            print!("{}", output::policy_map(&layout, &table));
        }
        _ => print!("{}", output::table_policy_map(&table)),
    }

    Ok(())
}
