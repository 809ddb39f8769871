//! mazerl CLI - Train Q-learning agents on generated mazes
//!
//! This CLI provides:
//! - Training on a fresh random maze, continuing from the stored value table
//! - Inspecting stored value tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "mazerl")]
#[command(version, about = "Tabular Q-learning on randomly generated mazes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an agent on a generated maze
    Train(Box<mazerl::cli::commands::train::TrainArgs>),

    /// Summarize a stored value table
    Inspect(mazerl::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => mazerl::cli::commands::train::execute(*args),
        Commands::Inspect(args) => mazerl::cli::commands::inspect::execute(args),
    }
}
