//! Run configuration: maze size, training mode and hyperparameters.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, environment::RewardConfig, pipeline::TrainingConfig};

/// Supported maze interior sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeSize {
    Small,
    Medium,
    Large,
}

impl MazeSize {
    pub const ALL: [MazeSize; 3] = [MazeSize::Small, MazeSize::Medium, MazeSize::Large];

    /// Playable side length, border excluded
    pub fn interior(self) -> usize {
        match self {
            MazeSize::Small => 5,
            MazeSize::Medium => 10,
            MazeSize::Large => 15,
        }
    }

    /// Grid side length including a one-cell wall border on each side
    pub fn bordered(self) -> usize {
        self.interior() + 2
    }

    pub fn from_interior(size: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.interior() == size)
            .ok_or_else(|| Error::InvalidMazeSize {
                size,
                expected: Self::expected(),
            })
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|s| s.interior().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Traps and bonuses placed per maze: a third of the interior side, at least one.
    pub fn hazard_count(self) -> usize {
        (self.interior() / 3).max(1)
    }

    /// Episode count and per-episode ε decay.
    ///
    /// Mazes larger than the smallest get more episodes and faster decay.
    pub fn episode_schedule(self) -> (usize, f64) {
        if self.bordered() > 7 {
            (2000, 0.99)
        } else {
            (1000, 0.995)
        }
    }

    /// Step budget: the larger of three times the interior area and seven
    /// times the solution path length.
    pub fn step_budget(self, solution_len: Option<usize>) -> usize {
        let area_budget = self.interior() * self.interior() * 3;
        solution_len.map_or(area_budget, |len| area_budget.max(len * 7))
    }

    /// File name of the stored value table for this size
    pub fn table_file_name(self) -> String {
        format!("qtable_{}.msgpack", self.interior())
    }
}

impl fmt::Display for MazeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.interior())
    }
}

impl FromStr for MazeSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let size = s
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::InvalidConfiguration {
                message: format!("maze size '{}' is not a number", s.trim()),
            })?;
        Self::from_interior(size)
    }
}

/// Whether frames are rendered while training
///
/// Learning is identical in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingMode {
    #[default]
    Visual,
    Fast,
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingMode::Visual => f.write_str("visual"),
            TrainingMode::Fast => f.write_str("fast"),
        }
    }
}

impl FromStr for TrainingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visual" => Ok(TrainingMode::Visual),
            "fast" => Ok(TrainingMode::Fast),
            _ => Err(Error::ParseTrainingMode {
                input: s.to_string(),
                expected: "visual, fast".to_string(),
            }),
        }
    }
}

/// Learning hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// α
    pub learning_rate: f64,
    /// γ
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    pub min_epsilon: f64,
    pub rewards: RewardConfig,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            initial_epsilon: 1.0,
            min_epsilon: 0.01,
            rewards: RewardConfig::default(),
        }
    }
}

impl Hyperparameters {
    /// Read hyperparameters from a JSON file. Missing fields keep their defaults.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open hyperparameter file {path:?}"),
            source,
        })?;
        let params: Self = serde_json::from_reader(file)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        for (name, value) in [
            ("learning rate", self.learning_rate),
            ("discount factor", self.discount_factor),
            ("initial epsilon", self.initial_epsilon),
            ("min epsilon", self.min_epsilon),
        ] {
            if !unit.contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} {value} must lie in [0, 1]"),
                });
            }
        }
        let rewards = &self.rewards;
        if ![rewards.goal, rewards.bonus, rewards.trap, rewards.step]
            .iter()
            .all(|r| r.is_finite())
        {
            return Err(Error::InvalidConfiguration {
                message: "reward magnitudes must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for one training run.
///
/// Values left unset are derived from the maze size once the maze exists.
///
/// # Examples
///
/// ```
/// use mazerl::app::{MazeSize, RunConfig, TrainingMode};
///
/// let config = RunConfig::new(MazeSize::Small)
///     .with_mode(TrainingMode::Fast)
///     .with_seed(42)
///     .with_episodes(300);
/// let training = config.training_config(Some(9));
/// assert_eq!(training.episodes, 300);
/// assert_eq!(training.max_steps, 75);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub size: MazeSize,
    pub mode: TrainingMode,
    pub hyperparameters: Hyperparameters,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    pub episodes: Option<usize>,
    pub epsilon_decay: Option<f64>,
    pub max_steps: Option<usize>,
    pub trap_count: Option<usize>,
    pub bonus_count: Option<usize>,
}

impl RunConfig {
    pub fn new(size: MazeSize) -> Self {
        Self {
            size,
            mode: TrainingMode::default(),
            hyperparameters: Hyperparameters::default(),
            seed: None,
            episodes: None,
            epsilon_decay: None,
            max_steps: None,
            trap_count: None,
            bonus_count: None,
        }
    }

    pub fn with_mode(mut self, mode: TrainingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = Some(episodes);
        self
    }

    pub fn with_epsilon_decay(mut self, decay: f64) -> Self {
        self.epsilon_decay = Some(decay);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_hazards(mut self, traps: usize, bonuses: usize) -> Self {
        self.trap_count = Some(traps);
        self.bonus_count = Some(bonuses);
        self
    }

    pub fn trap_count(&self) -> usize {
        self.trap_count.unwrap_or_else(|| self.size.hazard_count())
    }

    pub fn bonus_count(&self) -> usize {
        self.bonus_count.unwrap_or_else(|| self.size.hazard_count())
    }

    /// Resolve the training loop configuration for a maze whose solution path
    /// has `solution_len` cells.
    pub fn training_config(&self, solution_len: Option<usize>) -> TrainingConfig {
        let (episodes, decay) = self.size.episode_schedule();
        let params = &self.hyperparameters;
        TrainingConfig {
            episodes: self.episodes.unwrap_or(episodes),
            max_steps: self
                .max_steps
                .unwrap_or_else(|| self.size.step_budget(solution_len)),
            initial_epsilon: params.initial_epsilon,
            min_epsilon: params.min_epsilon,
            epsilon_decay: self.epsilon_decay.unwrap_or(decay),
            rewards: params.rewards,
            seed: self.seed,
            report_every: match self.mode {
                TrainingMode::Visual => 1,
                TrainingMode::Fast => 100,
            },
        }
    }
}
