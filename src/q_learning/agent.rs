//! Q-learning agent
//!
//! Owns the value table, the ε-greedy action selector and the TD update.
//! The exploration rate is supplied by the caller on every selection, so the
//! agent carries no schedule state of its own.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    environment::Action, maze::Cell, q_learning::q_table::QTable, random::build_rng,
};

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal action-value function by always updating toward the
/// maximum next-state value, regardless of the action actually taken next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    learning_rate: f64,
    discount_factor: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `q_table` - Fresh or previously trained value table
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    pub fn new(q_table: QTable, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_table,
            learning_rate,
            discount_factor,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Reseed the exploration stream.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// ε-greedy action selection
    ///
    /// With probability `epsilon` a uniformly random action, otherwise the
    /// greedy action (earliest action on ties).
    pub fn select_action(&mut self, state: Cell, epsilon: f64) -> Action {
        if self.rng.random::<f64>() < epsilon {
            // Explore: random action
            Action::ALL[self.rng.random_range(0..Action::COUNT)]
        } else {
            // Exploit: greedy action based on Q-values
            self.q_table.greedy_action(state)
        }
    }

    /// Greedy action without exploration
    pub fn best_action(&self, state: Cell) -> Action {
        self.q_table.greedy_action(state)
    }

    /// Apply one TD update with an already shaped reward.
    pub fn update(&mut self, state: Cell, action: Action, reward: f64, next_state: Cell) {
        self.q_table.q_learning_update(
            state,
            action,
            reward,
            next_state,
            self.learning_rate,
            self.discount_factor,
        );
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_epsilon_is_greedy() {
        let mut table = QTable::new(5, 5);
        let state = Cell::new(1, 1);
        table.set(state, Action::Right, 3.0);
        let mut agent = QLearningAgent::new(table, 0.1, 0.9).with_seed(3);
        for _ in 0..50 {
            assert_eq!(agent.select_action(state, 0.0), Action::Right);
        }
    }

    #[test]
    fn test_full_epsilon_explores_every_action() {
        let mut agent = QLearningAgent::new(QTable::new(5, 5), 0.1, 0.9).with_seed(8);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[agent.select_action(Cell::new(1, 1), 1.0).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_same_seed_same_choices() {
        let choose = |seed| {
            let mut agent = QLearningAgent::new(QTable::new(5, 5), 0.1, 0.9).with_seed(seed);
            (0..32)
                .map(|_| agent.select_action(Cell::new(2, 2), 0.5))
                .collect::<Vec<_>>()
        };
        assert_eq!(choose(42), choose(42));
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut agent = QLearningAgent::new(QTable::new(5, 5), 0.5, 0.9);
        agent.update(Cell::new(1, 1), Action::Down, 10.0, Cell::new(2, 1));
        assert_eq!(agent.q_table().get(Cell::new(1, 1), Action::Down), 5.0);
    }
}
