//! Value update and action selection of the Q-learning agent.

use mazerl::{Action, QLearningAgent, QTable, maze::Cell};

fn seeded_table() -> QTable {
    let mut table = QTable::new(5, 5);
    let next = Cell::new(1, 2);
    table.set(next, Action::Up, 2.0);
    table.set(next, Action::Right, 4.0);
    table.set(Cell::new(1, 1), Action::Right, 1.0);
    table
}

#[test]
fn zero_learning_rate_leaves_table_unchanged() {
    let before = seeded_table();
    let mut agent = QLearningAgent::new(before.clone(), 0.0, 0.9);
    agent.update(Cell::new(1, 1), Action::Right, 50.0, Cell::new(1, 2));
    assert_eq!(agent.q_table(), &before);
}

#[test]
fn unit_learning_rate_replaces_entry_with_target() {
    let mut agent = QLearningAgent::new(seeded_table(), 1.0, 0.9);
    agent.update(Cell::new(1, 1), Action::Right, -0.1, Cell::new(1, 2));
    let expected = -0.1 + 0.9 * 4.0;
    assert!((agent.q_table().get(Cell::new(1, 1), Action::Right) - expected).abs() < 1e-12);
}

#[test]
fn update_touches_a_single_entry() {
    let before = seeded_table();
    let mut agent = QLearningAgent::new(before.clone(), 0.1, 0.9);
    agent.update(Cell::new(1, 1), Action::Right, 5.0, Cell::new(1, 2));

    let after = agent.q_table();
    let changed = before
        .as_slice()
        .iter()
        .zip(after.as_slice())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(changed, 1);
    // (1 - 0.1) * 1.0 + 0.1 * (5.0 + 0.9 * 4.0)
    assert!((after.get(Cell::new(1, 1), Action::Right) - 1.76).abs() < 1e-12);
}

#[test]
fn greedy_ties_resolve_in_action_order() {
    let mut table = QTable::new(5, 5);
    let cell = Cell::new(2, 2);
    assert_eq!(table.greedy_action(cell), Action::Up);

    table.set(cell, Action::Left, 1.0);
    table.set(cell, Action::Right, 1.0);
    assert_eq!(table.greedy_action(cell), Action::Left);
}

#[test]
fn zero_epsilon_is_always_greedy() {
    let mut agent = QLearningAgent::new(seeded_table(), 0.1, 0.9).with_seed(4);
    for _ in 0..100 {
        assert_eq!(agent.select_action(Cell::new(1, 2), 0.0), Action::Right);
    }
}

#[test]
fn full_exploration_tries_every_action() {
    let mut agent = QLearningAgent::new(seeded_table(), 0.1, 0.9).with_seed(4);
    let mut seen = [false; Action::COUNT];
    for _ in 0..400 {
        seen[agent.select_action(Cell::new(1, 2), 1.0).index()] = true;
    }
    assert!(seen.iter().all(|s| *s));
}
