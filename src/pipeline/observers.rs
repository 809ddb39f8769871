//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::EpisodeSummary;
use crate::{
    Result,
    maze::Cell,
    ports::{Observer, StepFrame},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.successes += usize::from(summary.reached_goal);

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64);
            pb.set_message(format!(
                "goals: {} eps: {:.3}",
                self.successes, summary.epsilon
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("goals: {}", self.successes));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks per-episode training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: Vec<EpisodeSummary>,
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Success rate over the most recent `window` episodes
    pub recent_success_rate: f64,
    pub window: usize,
    pub avg_reward: f64,
    pub avg_steps: f64,
    /// First episode that reached the goal
    pub first_success: Option<usize>,
}

impl MetricsObserver {
    /// Window used for the recent success rate
    pub const WINDOW: usize = 100;

    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }

    fn rate(episodes: &[EpisodeSummary]) -> f64 {
        if episodes.is_empty() {
            0.0
        } else {
            episodes.iter().filter(|e| e.reached_goal).count() as f64 / episodes.len() as f64
        }
    }

    fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            values.sum::<f64>() / count as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let count = self.episodes.len();
        let recent = &self.episodes[count.saturating_sub(Self::WINDOW)..];
        MetricsSummary {
            episodes: count,
            successes: self.episodes.iter().filter(|e| e.reached_goal).count(),
            success_rate: Self::rate(&self.episodes),
            recent_success_rate: Self::rate(recent),
            window: recent.len(),
            avg_reward: Self::mean(self.episodes.iter().map(|e| e.total_reward), count),
            avg_steps: Self::mean(self.episodes.iter().map(|e| e.steps as f64), count),
            first_success: self
                .episodes
                .iter()
                .find(|e| e.reached_goal)
                .map(|e| e.episode),
        }
    }
}

impl Observer for MetricsObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.episodes = Vec::with_capacity(total_episodes);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes.push(summary.clone());
        Ok(())
    }
}

/// JSONL observer - Writes one episode summary per line
///
/// Each line is flushed when its episode ends, so an interrupted run keeps
/// every finished episode and write failures surface as errors.
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Shares an observer with the caller so its data can be read after training.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use mazerl::pipeline::{MetricsObserver, SharedObserver};
///
/// let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
/// let observer = SharedObserver::new(Arc::clone(&metrics));
/// # let _ = observer;
/// ```
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O> SharedObserver<O> {
    pub fn new(inner: Arc<Mutex<O>>) -> Self {
        Self { inner }
    }

    fn with<T>(&self, f: impl FnOnce(&mut O) -> T) -> T {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.with(|o| o.on_training_start(total_episodes))
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.with(|o| o.on_episode_start(episode))
    }

    fn on_step(&mut self, frame: &StepFrame<'_>) -> Result<()> {
        self.with(|o| o.on_step(frame))
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.with(|o| o.on_episode_end(summary))
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.with(|o| o.on_training_end())
    }

    fn quit_requested(&self) -> bool {
        self.with(|o| o.quit_requested())
    }
}

/// Draw one step as text.
///
/// `#` wall, `A` agent, `S` start, `G` goal, `T` trap, `$` uncollected bonus,
/// blank for open floor and collected bonuses.
pub fn render_frame(frame: &StepFrame<'_>) -> String {
    let layout = frame.layout;
    let grid = &layout.grid;
    let mut out = String::with_capacity((grid.width() + 1) * (grid.height() + 2));

    out.push_str(&format!(
        "Episode {} | Step {} | Reward {:.2} | Epsilon {:.3} | Action {}\n",
        frame.episode, frame.step, frame.total_reward, frame.epsilon, frame.action
    ));

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = Cell::new(row, col);
            let symbol = if cell == frame.position {
                'A'
            } else if !grid.is_open(cell) {
                '#'
            } else if cell == layout.goal {
                'G'
            } else if cell == layout.start {
                'S'
            } else if layout.hazards.is_trap(cell) {
                'T'
            } else if layout.hazards.is_bonus(cell) && !frame.collected.contains(&cell) {
                '$'
            } else {
                ' '
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// Frame observer - Renders every step to a text sink
///
/// Used for visual training. Rendering never feeds back into learning; the
/// only signal it returns is a quit request raised through its shared flag.
pub struct FrameObserver<W: Write + Send> {
    out: W,
    delay: Duration,
    clear_screen: bool,
    quit: Arc<AtomicBool>,
}

impl<W: Write + Send> FrameObserver<W> {
    /// Frame delay matching a 30 fps display.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(33);

    pub fn new(out: W) -> Self {
        Self {
            out,
            delay: Self::DEFAULT_DELAY,
            clear_screen: false,
            quit: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Clear the terminal before each frame using ANSI escapes.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Flag that, once set, asks the training loop to stop.
    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }
}

impl<W: Write + Send> Observer for FrameObserver<W> {
    fn on_step(&mut self, frame: &StepFrame<'_>) -> Result<()> {
        if self.clear_screen {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        write!(self.out, "{}", render_frame(frame))?;
        self.out.flush()?;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        environment::{Action, StepEvent},
        maze::{Grid, Hazards, MazeLayout},
    };

    fn summary(episode: usize, reached_goal: bool, reward: f64, steps: usize) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            total_reward: reward,
            steps,
            reached_goal,
            bonuses_collected: 0,
            traps_hit: 0,
            epsilon: 1.0,
        }
    }

    #[test]
    fn test_jsonl_lines_visible_before_training_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("episodes.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap();
        observer.on_training_start(10).unwrap();
        observer.on_episode_end(&summary(1, false, -7.5, 75)).unwrap();
        observer.on_episode_end(&summary(2, true, 40.0, 20)).unwrap();

        // Still alive and never told training ended, as after a quit.
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: EpisodeSummary = serde_json::from_str(lines[1]).unwrap();
        assert!(second.reached_goal);
        drop(observer);
    }

    #[test]
    fn test_metrics_summary() {
        let mut metrics = MetricsObserver::new();
        metrics.on_training_start(3).unwrap();
        metrics.on_episode_end(&summary(1, false, -7.5, 75)).unwrap();
        metrics.on_episode_end(&summary(2, true, 40.0, 20)).unwrap();
        metrics.on_episode_end(&summary(3, true, 45.0, 5)).unwrap();

        let s = metrics.summary();
        assert_eq!(s.episodes, 3);
        assert_eq!(s.successes, 2);
        assert_eq!(s.first_success, Some(2));
        assert!((s.avg_steps - 100.0 / 3.0).abs() < 1e-9);
        assert!((s.avg_reward - 77.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_empty() {
        let s = MetricsObserver::new().summary();
        assert_eq!(s.episodes, 0);
        assert_eq!(s.success_rate, 0.0);
        assert_eq!(s.first_success, None);
    }

    #[test]
    fn test_render_frame_symbols() {
        let grid = Grid::parse(&["#######", "#.....#", "#.###.#", "#.....#", "#######"]).unwrap();
        let hazards = Hazards::new(
            [Cell::new(3, 3)].into_iter().collect(),
            [Cell::new(1, 3)].into_iter().collect(),
        );
        let layout =
            MazeLayout::from_parts(grid, Cell::new(1, 1), Cell::new(1, 5), hazards).unwrap();
        let collected = HashSet::new();
        let frame = StepFrame {
            episode: 2,
            step: 1,
            layout: &layout,
            position: Cell::new(1, 2),
            collected: &collected,
            action: Action::Right,
            event: StepEvent::Plain,
            reward: -0.1,
            total_reward: -0.1,
            epsilon: 0.5,
        };

        let text = render_frame(&frame);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Episode 2 | Step 1"));
        assert_eq!(lines[2], "#SA$ G#");
        assert_eq!(lines[4], "#  T  #");
    }

    #[test]
    fn test_frame_observer_quit_flag() {
        let observer = FrameObserver::new(Vec::<u8>::new()).with_delay(Duration::ZERO);
        assert!(!observer.quit_requested());
        observer.quit_flag().store(true, Ordering::Relaxed);
        assert!(observer.quit_requested());
    }
}
