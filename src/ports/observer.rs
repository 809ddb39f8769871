//! Observer port - abstraction for training observation and rendering
//!
//! This port defines the interface for watching a training run,
//! allowing progress bars, metrics, episode logs and frame renderers to be
//! composed without coupling the training loop to any of them.

use std::collections::HashSet;

use crate::{
    Result,
    environment::{Action, StepEvent},
    maze::{Cell, MazeLayout},
    pipeline::training::EpisodeSummary,
};

/// Everything a renderer needs to draw one step
#[derive(Debug, Clone, Copy)]
pub struct StepFrame<'a> {
    /// Episode index (1-based)
    pub episode: usize,
    /// Steps taken so far in this episode, this one included
    pub step: usize,
    pub layout: &'a MazeLayout,
    /// Agent position after the step
    pub position: Cell,
    pub collected: &'a HashSet<Cell>,
    pub action: Action,
    pub event: StepEvent,
    /// Raw reward of this step
    pub reward: f64,
    /// Raw reward accumulated this episode
    pub total_reward: f64,
    /// Exploration rate in effect for this episode
    pub epsilon: f64,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(frame)` - For each transition
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - Once at the end, unless training was interrupted
///
/// After every step the loop asks each observer whether the operator
/// requested a quit. A quit stops training at once.
///
/// # Examples
///
/// ```no_run
/// use mazerl::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct GoalCounter {
///     reached: usize,
/// }
///
/// impl Observer for GoalCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> mazerl::Result<()> {
///         if summary.reached_goal {
///             self.reached += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts, with its 1-based index.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every transition, once the value table was updated.
    fn on_step(&mut self, _frame: &StepFrame<'_>) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, at the goal or on an exhausted budget.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether the operator asked to stop.
    ///
    /// # Default Implementation
    ///
    /// Never requests a quit.
    fn quit_requested(&self) -> bool {
        false
    }
}
