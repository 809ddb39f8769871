//! Train command - Train a Q-learning agent on a generated maze

use std::{
    fs::File,
    io::{self, BufRead},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::{App, Hyperparameters, MazeSize, RunConfig, TrainingMode},
    cli::{output, prompt},
    pipeline::{
        FrameObserver, JsonlObserver, MetricsObserver, MetricsSummary, Observer, ProgressObserver,
        SharedObserver, TrainingResult,
    },
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metrics: MetricsSummary,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    size: usize,
    mode: TrainingMode,
    episodes: usize,
    max_steps: usize,
    epsilon_decay: f64,
    seed: Option<u64>,
    table_path: PathBuf,
    table_saved: bool,
}

pub(crate) fn parse_size_arg(value: &str) -> std::result::Result<MazeSize, String> {
    value.parse::<MazeSize>().map_err(|e| e.to_string())
}

fn parse_mode_arg(value: &str) -> std::result::Result<TrainingMode, String> {
    value.parse::<TrainingMode>().map_err(|e| e.to_string())
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train an agent on a generated maze")]
pub struct TrainArgs {
    /// Maze interior size (5, 10 or 15); prompted for when omitted
    #[arg(long, short = 's', value_parser = parse_size_arg)]
    pub size: Option<MazeSize>,

    /// Training mode (visual or fast); prompted for when omitted
    #[arg(long, short = 'm', value_parser = parse_mode_arg)]
    pub mode: Option<TrainingMode>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Override the per-episode epsilon decay factor
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Override the per-episode step budget
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Directory holding the stored value tables
    #[arg(long, default_value = ".")]
    pub table_dir: PathBuf,

    /// JSON file with learning rate, discount, epsilon bounds and rewards
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Render frames in visual mode without the frame delay
    #[arg(long, default_value_t = false)]
    pub no_delay: bool,
}

/// Stop visual training when the operator enters `q`.
fn spawn_quit_listener(flag: Arc<AtomicBool>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    flag.store(true, Ordering::Relaxed);
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let size = match args.size {
        Some(size) => size,
        None => prompt::prompt_maze_size(&mut io::stdin().lock(), &mut io::stdout())
            .context("failed to read maze size")?,
    };
    let mode = match args.mode {
        Some(mode) => mode,
        None => prompt::prompt_training_mode(&mut io::stdin().lock(), &mut io::stdout())
            .context("failed to read training mode")?,
    };

    let hyperparameters = match &args.config {
        Some(path) => Hyperparameters::load_json(path)
            .with_context(|| format!("failed to load hyperparameters from {}", path.display()))?,
        None => Hyperparameters::default(),
    };

    let mut config = RunConfig::new(size)
        .with_mode(mode)
        .with_hyperparameters(hyperparameters);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(episodes) = args.episodes {
        config = config.with_episodes(episodes);
    }
    if let Some(decay) = args.epsilon_decay {
        config = config.with_epsilon_decay(decay);
    }
    if let Some(max_steps) = args.max_steps {
        config = config.with_max_steps(max_steps);
    }

    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut observers: Vec<Box<dyn Observer>> =
        vec![Box::new(SharedObserver::new(Arc::clone(&metrics)))];

    match mode {
        TrainingMode::Fast => observers.push(Box::new(ProgressObserver::new())),
        TrainingMode::Visual => {
            let delay = if args.no_delay {
                Duration::ZERO
            } else {
                FrameObserver::<io::Stdout>::DEFAULT_DELAY
            };
            let frames = FrameObserver::new(io::stdout())
                .with_delay(delay)
                .with_clear_screen(true);
            spawn_quit_listener(frames.quit_flag());
            println!("Enter 'q' to stop training (the table is not saved when stopped).");
            observers.push(Box::new(frames));
        }
    }

    if let Some(observations_path) = &args.observations {
        let jsonl_observer = JsonlObserver::new(observations_path).with_context(|| {
            format!("failed to create {}", observations_path.display())
        })?;
        observers.push(Box::new(jsonl_observer));
    }

    let app = App::with_table_dir(&args.table_dir);
    let report = app.train(&config, observers)?;
    let result = &report.result;
    let metrics_summary = metrics
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .summary();

    output::print_section(if result.interrupted {
        "Training Interrupted"
    } else {
        "Training Complete"
    });
    let stats = [
        ("Maze size", size.to_string()),
        ("Episodes", output::format_number(result.episodes)),
        (
            "Goals reached",
            format!(
                "{} ({})",
                output::format_number(result.successes),
                output::format_percent(result.success_rate)
            ),
        ),
        (
            "Recent success",
            format!(
                "{} of last {}",
                output::format_percent(metrics_summary.recent_success_rate),
                metrics_summary.window
            ),
        ),
        ("Bonuses collected", output::format_number(result.bonus_collections)),
        ("Traps hit", output::format_number(result.trap_hits)),
        ("Average reward", format!("{:.2}", result.average_reward)),
        ("Final epsilon", format!("{:.4}", result.final_epsilon)),
    ];
    let stats: Vec<(&str, &str)> = stats.iter().map(|(k, v)| (*k, v.as_str())).collect();
    output::print_stats_table(&stats);

    output::print_subsection("Greedy policy");
    print!("{}", output::policy_map(&report.layout, &report.table));

    if report.saved {
        println!("\nValue table saved to {}", report.table_path.display());
    } else {
        println!("\nValue table not saved");
    }

    if let Some((summary_path, normalized)) = summary_target {
        if normalized {
            println!(
                "\nNormalizing summary path to {}",
                summary_path.display()
            );
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: result,
            metrics: metrics_summary,
            metadata: SummaryMetadata {
                size: size.interior(),
                mode,
                episodes: report.training.episodes,
                max_steps: report.training.max_steps,
                epsilon_decay: report.training.epsilon_decay,
                seed: config.seed,
                table_path: report.table_path.clone(),
                table_saved: report.saved,
            },
        };

        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
