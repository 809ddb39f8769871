//! Integration tests for dependency injection.
//!
//! Full training runs against an in-memory repository:
//! - No file I/O
//! - Deterministic behavior with fixed seeds
//! - Interrupted runs leave storage untouched

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use mazerl::{
    Environment, Result,
    adapters::InMemoryRepository,
    app::{App, MazeSize, RunConfig, TableSource, TrainingMode},
    pipeline::{EpisodeSummary, MetricsObserver, Observer, SharedObserver},
    ports::TableRepository,
};

fn app(repo: &InMemoryRepository) -> App {
    App::for_testing()
        .with_repository(repo.clone())
        .with_table_dir("tables")
        .build()
}

fn fast_config(episodes: usize) -> RunConfig {
    RunConfig::new(MazeSize::Small)
        .with_mode(TrainingMode::Fast)
        .with_seed(42)
        .with_episodes(episodes)
        .with_epsilon_decay(0.98)
}

#[test]
fn agent_learns_small_maze() {
    let repo = InMemoryRepository::new();
    let app = app(&repo);
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));

    let report = app
        .train(
            &fast_config(500).with_hazards(0, 0),
            vec![Box::new(SharedObserver::new(Arc::clone(&metrics)))],
        )
        .unwrap();

    assert_eq!(report.result.episodes, 500);
    assert!(!report.result.interrupted);
    assert!(report.saved);
    assert!((report.result.final_epsilon - 0.01).abs() < 1e-12);

    let summary = metrics.lock().unwrap().summary();
    assert!(summary.first_success.is_some());
    assert!(
        summary.recent_success_rate >= 0.8,
        "recent success rate {}",
        summary.recent_success_rate
    );

    // Following the greedy policy from start reaches the goal.
    let layout = &report.layout;
    let env = Environment::new(layout, report.training.rewards);
    let mut position = layout.start;
    let mut collected = HashSet::new();
    let mut reached = false;
    for _ in 0..report.training.max_steps {
        let outcome = env.step(position, report.table.greedy_action(position), collected);
        position = outcome.position;
        collected = outcome.collected;
        if outcome.done {
            reached = true;
            break;
        }
    }
    assert!(reached, "greedy rollout did not reach the goal");
}

#[test]
fn trained_small_maze_with_hazards_ends_at_goal() {
    let repo = InMemoryRepository::new();
    let report = app(&repo)
        .train(&fast_config(300).with_hazards(1, 1), Vec::new())
        .unwrap();

    assert_eq!(report.layout.grid.height(), 7);
    assert_eq!(report.layout.hazards.bonuses.len(), 1);
    let last = report.result.last_episode.as_ref().unwrap();
    assert_eq!(last.episode, 300);
    assert!(last.reached_goal, "final episode ended after {} steps", last.steps);

    let stored = repo.load(&report.table_path).unwrap();
    assert_eq!(stored, report.table);
    let start = report.layout.start;
    let best = stored.greedy_action(start);
    assert!(
        stored.get(start, best) > 0.0,
        "value of {best} at start is {}",
        stored.get(start, best)
    );
}

#[test]
fn agent_finds_goal_with_hazards() {
    let repo = InMemoryRepository::new();
    let report = app(&repo).train(&fast_config(200), Vec::new()).unwrap();

    assert!(report.layout.hazards.traps.len() <= 1);
    assert_eq!(report.layout.hazards.bonuses.len(), 1);
    assert!(report.result.successes > 0);
    assert!(report.table.nonzero_count() > 0);
}

#[test]
fn same_seed_same_result() {
    let first = app(&InMemoryRepository::new())
        .train(&fast_config(50), Vec::new())
        .unwrap();
    let second = app(&InMemoryRepository::new())
        .train(&fast_config(50), Vec::new())
        .unwrap();

    assert_eq!(first.layout, second.layout);
    assert_eq!(first.table, second.table);
    assert_eq!(first.result.successes, second.result.successes);
    assert_eq!(first.result.total_steps, second.result.total_steps);
}

#[test]
fn second_run_continues_from_stored_table() {
    let repo = InMemoryRepository::new();
    let app = app(&repo);

    let first = app.train(&fast_config(20), Vec::new()).unwrap();
    assert_eq!(first.table_source, TableSource::Fresh);
    assert_eq!(repo.count(), 1);

    let second = app.train(&fast_config(20), Vec::new()).unwrap();
    assert_eq!(second.table_source, TableSource::Stored);
    assert_eq!(second.table_path, first.table_path);
}

struct QuitAfter {
    episodes: usize,
    seen: usize,
}

impl Observer for QuitAfter {
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        self.seen += 1;
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.seen >= self.episodes
    }
}

#[test]
fn interrupted_run_is_not_saved() {
    let repo = InMemoryRepository::new();
    let app = app(&repo);

    let report = app
        .train(
            &fast_config(100),
            vec![Box::new(QuitAfter {
                episodes: 3,
                seen: 0,
            })],
        )
        .unwrap();

    assert!(report.result.interrupted);
    assert!(!report.saved);
    assert_eq!(report.result.episodes, 3);
    assert_eq!(repo.count(), 0);
}

#[test]
fn invalid_hyperparameters_are_rejected() {
    let repo = InMemoryRepository::new();
    let mut config = fast_config(5);
    config.hyperparameters.discount_factor = 1.5;
    assert!(app(&repo).train(&config, Vec::new()).is_err());
    assert_eq!(repo.count(), 0);
}
