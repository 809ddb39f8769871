//! Dependency injection container for the training application.
//!
//! The container owns infrastructure dependencies (value table storage and
//! its location) and wires them into a complete training run: maze setup,
//! table load or cold start, the episode loop, and the final save.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};

use super::config::{MazeSize, RunConfig};
use crate::{
    Result,
    adapters::MsgPackRepository,
    maze::MazeLayout,
    pipeline::{Observer, TrainingConfig, TrainingPipeline, TrainingResult},
    ports::TableRepository,
    q_learning::{QLearningAgent, QTable},
    random::{build_rng, derive_seed},
};

/// Where the starting value table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Loaded from storage; training continues from it
    Stored,
    /// Nothing stored yet; all-zero table
    Fresh,
    /// Stored table could not be used; all-zero table
    Recovered { reason: String },
}

/// A value table ready for training
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: QTable,
    pub source: TableSource,
}

/// Outcome of a complete run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: TrainingResult,
    pub layout: MazeLayout,
    pub training: TrainingConfig,
    pub table: QTable,
    pub table_source: TableSource,
    pub table_path: PathBuf,
    /// False when the run was interrupted and storage was left untouched
    pub saved: bool,
}

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use mazerl::app::{App, MazeSize, RunConfig, TrainingMode};
///
/// let app = App::new();
/// let config = RunConfig::new(MazeSize::Small).with_mode(TrainingMode::Fast);
/// let report = app.train(&config, Vec::new())?;
/// println!("{} successes", report.result.successes);
/// # Ok::<(), mazerl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use mazerl::app::App;
/// use mazerl::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for value table persistence
    table_repository: Arc<dyn TableRepository + Send + Sync>,
    /// Directory holding one table per maze size
    table_dir: PathBuf,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for table persistence
    /// - The current directory for table files
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            table_repository: Arc::new(MsgPackRepository::new()),
            table_dir: PathBuf::from("."),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Production app storing tables under `dir`.
    pub fn with_table_dir<P: AsRef<Path>>(dir: P) -> Self {
        AppBuilder::new().with_table_dir(dir).build()
    }

    /// Get the table repository.
    pub fn table_repository(&self) -> Arc<dyn TableRepository + Send + Sync> {
        Arc::clone(&self.table_repository)
    }

    /// Storage location of the table for `size`
    pub fn table_path(&self, size: MazeSize) -> PathBuf {
        self.table_dir.join(size.table_file_name())
    }

    /// Load the stored table for `size`, or fall back to a fresh one.
    ///
    /// A missing table is a normal cold start. An unreadable, corrupt or
    /// wrongly shaped table is logged as a warning and also replaced by a
    /// fresh one; it never aborts training.
    pub fn load_table(&self, size: MazeSize) -> LoadedTable {
        let path = self.table_path(size);
        let side = size.bordered();

        let recovered = |reason: String| {
            warn!(path = %path.display(), %reason, "stored value table unusable; starting from scratch");
            LoadedTable {
                table: QTable::new(side, side),
                source: TableSource::Recovered { reason },
            }
        };

        match self.table_repository.load(&path) {
            Ok(table) => match table.ensure_shape(side, side) {
                Ok(()) => {
                    info!(path = %path.display(), %size, "loaded value table; continuing training");
                    LoadedTable {
                        table,
                        source: TableSource::Stored,
                    }
                }
                Err(err) => recovered(err.to_string()),
            },
            Err(err) if err.is_not_found() => {
                info!(path = %path.display(), "no saved value table; starting from scratch");
                LoadedTable {
                    table: QTable::new(side, side),
                    source: TableSource::Fresh,
                }
            }
            Err(err) => recovered(err.to_string()),
        }
    }

    /// Overwrite the stored table for `size`.
    pub fn save_table(&self, size: MazeSize, table: &QTable) -> Result<PathBuf> {
        let path = self.table_path(size);
        self.table_repository.save(table, &path)?;
        info!(path = %path.display(), "value table saved");
        Ok(path)
    }

    /// Build the maze for a run.
    pub fn create_layout(&self, config: &RunConfig) -> Result<MazeLayout> {
        let seed = config.seed.or(self.default_seed);
        let mut rng = build_rng(derive_seed(seed, 0));
        let side = config.size.bordered();
        MazeLayout::generate(
            side,
            side,
            config.trap_count(),
            config.bonus_count(),
            &mut rng,
        )
    }

    /// Run a complete training session.
    ///
    /// Generates the maze, loads or creates the table, trains, and saves the
    /// table back unless an observer interrupted the run.
    pub fn train(&self, config: &RunConfig, observers: Vec<Box<dyn Observer>>) -> Result<RunReport> {
        config.hyperparameters.validate()?;
        let seed = config.seed.or(self.default_seed);

        let layout = self.create_layout(config)?;
        let mut training = config.training_config(layout.solution_len());
        training.seed = derive_seed(seed, 1);
        info!(
            size = %config.size,
            mode = %config.mode,
            max_steps = training.max_steps,
            epsilon_decay = training.epsilon_decay,
            episodes = training.episodes,
            "training setup"
        );

        let LoadedTable { table, source } = self.load_table(config.size);
        let params = &config.hyperparameters;
        let mut agent = QLearningAgent::new(table, params.learning_rate, params.discount_factor);

        let mut pipeline = observers
            .into_iter()
            .fold(TrainingPipeline::new(training.clone()), |pipeline, observer| {
                pipeline.with_observer(observer)
            });
        let result = pipeline.run(&mut agent, &layout)?;

        let table = agent.into_q_table();
        let table_path = self.table_path(config.size);
        let saved = if result.interrupted {
            warn!("training interrupted; value table not saved");
            false
        } else {
            self.save_table(config.size, &table)?;
            true
        };

        Ok(RunReport {
            result,
            layout,
            training,
            table,
            table_source: source,
            table_path,
            saved,
        })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing App with custom dependencies.
pub struct AppBuilder {
    table_repository: Option<Arc<dyn TableRepository + Send + Sync>>,
    table_dir: PathBuf,
    default_seed: Option<u64>,
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            table_repository: None,
            table_dir: PathBuf::from("."),
            default_seed: None,
        }
    }

    /// Set a custom table repository.
    pub fn with_repository<R: TableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.table_repository = Some(Arc::new(repo));
        self
    }

    /// Set the directory holding table files.
    pub fn with_table_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.table_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set a default random seed for all runs.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with configured dependencies.
    ///
    /// Uses `MsgPackRepository` if no repository was provided.
    pub fn build(self) -> App {
        App {
            table_repository: self
                .table_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            table_dir: self.table_dir,
            default_seed: self.default_seed,
        }
    }
}
