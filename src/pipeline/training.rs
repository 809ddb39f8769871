//! Episodic training loop

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    environment::{Environment, RewardConfig, StepEvent},
    maze::{Cell, MazeLayout},
    ports::{Observer, StepFrame},
    q_learning::QLearningAgent,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of episodes to run
    pub episodes: usize,

    /// Step budget per episode
    pub max_steps: usize,

    /// Exploration rate for the first episode
    pub initial_epsilon: f64,

    /// Floor the exploration rate decays toward
    pub min_epsilon: f64,

    /// Multiplicative decay applied after every episode
    pub epsilon_decay: f64,

    /// Reward magnitudes
    pub rewards: RewardConfig,

    /// Random seed for the agent's exploration stream
    pub seed: Option<u64>,

    /// Log a report every this many episodes (the first is always logged)
    pub report_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            max_steps: 75,
            initial_epsilon: 1.0,
            min_epsilon: 0.01,
            epsilon_decay: 0.995,
            rewards: RewardConfig::default(),
            seed: None,
            report_every: 100,
        }
    }
}

impl TrainingConfig {
    /// Check that the exploration schedule is well formed.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(0.0..=1.0).contains(&self.initial_epsilon) {
            return invalid(format!(
                "initial epsilon {} must lie in [0, 1]",
                self.initial_epsilon
            ));
        }
        if !(0.0..=self.initial_epsilon).contains(&self.min_epsilon) {
            return invalid(format!(
                "min epsilon {} must lie in [0, {}]",
                self.min_epsilon, self.initial_epsilon
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return invalid(format!(
                "epsilon decay {} must lie in (0, 1]",
                self.epsilon_decay
            ));
        }
        Ok(())
    }
}

/// Exploration rate owned by a single training run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exploration {
    epsilon: f64,
    min_epsilon: f64,
    decay: f64,
}

impl Exploration {
    pub fn new(initial: f64, min_epsilon: f64, decay: f64) -> Self {
        Self {
            epsilon: initial,
            min_epsilon,
            decay,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// ε ← max(min_ε, ε·decay)
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.decay).max(self.min_epsilon);
    }
}

impl From<&TrainingConfig> for Exploration {
    fn from(config: &TrainingConfig) -> Self {
        Self::new(
            config.initial_epsilon,
            config.min_epsilon,
            config.epsilon_decay,
        )
    }
}

/// Statistics of one finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode index (1-based)
    pub episode: usize,
    /// Sum of raw rewards
    pub total_reward: f64,
    pub steps: usize,
    pub reached_goal: bool,
    pub bonuses_collected: usize,
    pub traps_hit: usize,
    /// Exploration rate the episode ran with
    pub epsilon: f64,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes that ran to completion
    pub episodes: usize,

    /// Episodes that ended at the goal
    pub successes: usize,

    /// Bonus pickups across all episodes
    pub bonus_collections: usize,

    /// Trap hits across all episodes
    pub trap_hits: usize,

    /// Transitions across all episodes
    pub total_steps: usize,

    /// Success rate
    pub success_rate: f64,

    /// Mean raw episode reward
    pub average_reward: f64,

    /// Exploration rate after the last decay
    pub final_epsilon: f64,

    /// An observer asked to quit before the run finished
    pub interrupted: bool,

    /// Summary of the last completed episode
    pub last_episode: Option<EpisodeSummary>,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

#[derive(Debug, Default)]
struct Totals {
    episodes: usize,
    successes: usize,
    bonus_collections: usize,
    trap_hits: usize,
    total_steps: usize,
    reward_sum: f64,
    last_episode: Option<EpisodeSummary>,
}

impl Totals {
    fn record(&mut self, summary: EpisodeSummary) {
        self.episodes += 1;
        self.successes += usize::from(summary.reached_goal);
        self.bonus_collections += summary.bonuses_collected;
        self.trap_hits += summary.traps_hit;
        self.total_steps += summary.steps;
        self.reward_sum += summary.total_reward;
        self.last_episode = Some(summary);
    }

    fn finish(self, final_epsilon: f64, interrupted: bool) -> TrainingResult {
        let (success_rate, average_reward) = if self.episodes > 0 {
            (
                self.successes as f64 / self.episodes as f64,
                self.reward_sum / self.episodes as f64,
            )
        } else {
            (0.0, 0.0)
        };
        TrainingResult {
            episodes: self.episodes,
            successes: self.successes,
            bonus_collections: self.bonus_collections,
            trap_hits: self.trap_hits,
            total_steps: self.total_steps,
            success_rate,
            average_reward,
            final_epsilon,
            interrupted,
            last_episode: self.last_episode,
        }
    }
}

enum EpisodeEnd {
    Finished(EpisodeSummary),
    Interrupted,
}

/// Training pipeline driving one agent through a fixed maze
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run all episodes against `layout`, updating the agent's table in place.
    ///
    /// Stops early, with `interrupted` set, as soon as an observer requests a
    /// quit. Observers get no further events after that.
    pub fn run(
        &mut self,
        agent: &mut QLearningAgent,
        layout: &MazeLayout,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
        }

        let env = Environment::new(layout, self.config.rewards);
        let mut exploration = Exploration::from(&self.config);
        let mut totals = Totals::default();

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 1..=self.config.episodes {
            let summary = match self.run_episode(episode, agent, &env, exploration.epsilon())? {
                EpisodeEnd::Finished(summary) => summary,
                EpisodeEnd::Interrupted => {
                    info!(episode, "training interrupted");
                    return Ok(totals.finish(exploration.epsilon(), true));
                }
            };

            exploration.decay();

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
            totals.record(summary);

            if episode == 1 || episode % self.config.report_every.max(1) == 0 {
                if let Some(last) = &totals.last_episode {
                    info!(
                        episode,
                        reward = last.total_reward,
                        steps = last.steps,
                        epsilon = exploration.epsilon(),
                        successes = totals.successes,
                        bonuses = totals.bonus_collections,
                        "episode finished"
                    );
                }
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(totals.finish(exploration.epsilon(), false))
    }

    fn run_episode(
        &mut self,
        episode: usize,
        agent: &mut QLearningAgent,
        env: &Environment<'_>,
        epsilon: f64,
    ) -> Result<EpisodeEnd> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let layout = env.layout();
        let mut position: Cell = layout.start;
        let mut collected: HashSet<Cell> = HashSet::new();
        let mut summary = EpisodeSummary {
            episode,
            total_reward: 0.0,
            steps: 0,
            reached_goal: false,
            bonuses_collected: 0,
            traps_hit: 0,
            epsilon,
        };

        let mut done = false;
        while !done && summary.steps < self.config.max_steps {
            let action = agent.select_action(position, epsilon);
            let outcome = env.step(position, action, collected);
            let shaped = outcome.shaped_reward(env.rewards());
            agent.update(position, action, shaped, outcome.position);

            position = outcome.position;
            collected = outcome.collected;
            done = outcome.done;
            summary.total_reward += outcome.reward;
            summary.steps += 1;
            match outcome.event {
                StepEvent::ReachedGoal => summary.reached_goal = true,
                StepEvent::HitTrap => summary.traps_hit += 1,
                StepEvent::CollectedBonus => summary.bonuses_collected += 1,
                StepEvent::Plain | StepEvent::RevisitedBonus => {}
            }

            let frame = StepFrame {
                episode,
                step: summary.steps,
                layout,
                position,
                collected: &collected,
                action,
                event: outcome.event,
                reward: outcome.reward,
                total_reward: summary.total_reward,
                epsilon,
            };
            for observer in &mut self.observers {
                observer.on_step(&frame)?;
            }
            if self.observers.iter().any(|observer| observer.quit_requested()) {
                return Ok(EpisodeEnd::Interrupted);
            }
        }

        debug!(
            episode,
            steps = summary.steps,
            reached_goal = summary.reached_goal,
            "episode ended"
        );
        Ok(EpisodeEnd::Finished(summary))
    }
}
