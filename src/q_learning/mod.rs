//! Tabular Q-learning
//!
//! Temporal difference control over a dense `(row, col, action)` table.
//! Each transition nudges one entry toward the bootstrapped target
//!
//! ```text
//! Q(s,a) ← (1 - α)·Q(s,a) + α·(r' + γ·max_a' Q(s',a'))
//! ```
//!
//! where `r'` is the shaped reward from
//! [`StepOutcome::shaped_reward`](crate::environment::StepOutcome::shaped_reward).
//!
//! ## Usage Example
//!
//! ```
//! use mazerl::{
//!     environment::Action,
//!     maze::Cell,
//!     q_learning::{QLearningAgent, QTable},
//! };
//!
//! let mut agent = QLearningAgent::new(QTable::new(7, 7), 0.1, 0.9).with_seed(42);
//! let start = Cell::new(1, 1);
//! let action = agent.select_action(start, 1.0);
//! agent.update(start, action, -0.1, start);
//! assert!(agent.q_table().get(start, action) < 0.0);
//! ```

pub mod agent;
pub mod q_table;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::QTable;
