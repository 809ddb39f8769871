//! Transition behavior of the maze environment.

use std::collections::HashSet;

use mazerl::{
    Action, Environment, RewardConfig, StepEvent,
    maze::{Cell, Grid, Hazards, MazeLayout},
};
use rand::{SeedableRng, rngs::StdRng};

const EPS: f64 = 1e-9;

/// ```text
/// #######
/// #S T$G#
/// #######
/// ```
fn corridor() -> MazeLayout {
    let grid = Grid::parse(&["#######", "#     #", "#######", "#######", "#######"]).unwrap();
    let hazards = Hazards::new(
        HashSet::from([Cell::new(1, 3)]),
        HashSet::from([Cell::new(1, 4)]),
    );
    MazeLayout::from_parts(grid, Cell::new(1, 1), Cell::new(1, 5), hazards).unwrap()
}

#[test]
fn every_open_cell_and_action_yields_an_open_cell() {
    let mut rng = StdRng::seed_from_u64(21);
    let layout = MazeLayout::generate(12, 12, 3, 3, &mut rng).unwrap();
    let env = Environment::new(&layout, RewardConfig::default());

    for cell in layout.grid.open_cells() {
        for action in Action::ALL {
            let outcome = env.step(cell, action, HashSet::new());
            assert!(layout.grid.is_open(outcome.position));
            assert!(outcome.reward.is_finite());
            assert_eq!(outcome.done, outcome.event == StepEvent::ReachedGoal);
            if outcome.blocked {
                assert_eq!(outcome.position, cell);
            }
        }
    }
}

#[test]
fn wall_bump_costs_a_step() {
    let layout = corridor();
    let env = Environment::new(&layout, RewardConfig::default());
    let outcome = env.step(layout.start, Action::Up, HashSet::new());
    assert!(outcome.blocked);
    assert_eq!(outcome.position, layout.start);
    assert!((outcome.reward + 0.1).abs() < EPS);
    assert_eq!(outcome.event, StepEvent::Plain);
}

#[test]
fn trap_sends_agent_back_to_start() {
    let layout = corridor();
    let env = Environment::new(&layout, RewardConfig::default());
    let outcome = env.step(Cell::new(1, 2), Action::Right, HashSet::new());
    assert_eq!(outcome.event, StepEvent::HitTrap);
    assert_eq!(outcome.position, layout.start);
    assert!((outcome.reward + 10.1).abs() < EPS);
    assert!(!outcome.done);
}

#[test]
fn bonus_pays_once_per_episode() {
    let layout = corridor();
    let rewards = RewardConfig::default();
    let env = Environment::new(&layout, rewards);
    let bonus = Cell::new(1, 4);

    let first = env.step(Cell::new(1, 5), Action::Left, HashSet::new());
    assert_eq!(first.event, StepEvent::CollectedBonus);
    assert_eq!(first.position, bonus);
    assert!((first.reward - 4.9).abs() < EPS);
    // The pickup is scored but never fed to the value update.
    assert!((first.shaped_reward(&rewards) + 0.1).abs() < EPS);
    assert!(first.collected.contains(&bonus));

    // Step back onto the bonus with it already collected.
    let second = env.step(Cell::new(1, 5), Action::Left, first.collected);
    assert_eq!(second.event, StepEvent::RevisitedBonus);
    assert!((second.reward + 0.1).abs() < EPS);
    assert!((second.shaped_reward(&rewards) + 0.1).abs() < EPS);
    assert_eq!(second.collected.len(), 1);
}

#[test]
fn goal_ends_the_episode() {
    let layout = corridor();
    let env = Environment::new(&layout, RewardConfig::default());
    let mut collected = HashSet::new();
    collected.insert(Cell::new(1, 4));
    let outcome = env.step(Cell::new(1, 4), Action::Right, collected);
    assert!(outcome.done);
    assert_eq!(outcome.position, layout.goal);
    assert!((outcome.reward - 49.9).abs() < EPS);
}
