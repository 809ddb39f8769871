//! Dense value table for tabular Q-learning

use serde::{Deserialize, Serialize};

use crate::{Error, Result, environment::Action, maze::Cell};

/// Value table indexed by `(row, col, action)`
///
/// Stored as a dense row-major `rows x cols x 4` array, all zero at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQTable")]
pub struct QTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

/// Decoded form of a stored table, checked before it becomes a [`QTable`]
#[derive(Deserialize)]
struct RawQTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl TryFrom<RawQTable> for QTable {
    type Error = Error;

    fn try_from(raw: RawQTable) -> Result<Self> {
        Self::from_values(raw.rows, raw.cols, raw.values)
    }
}

impl QTable {
    /// Create an all-zero table
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols * Action::COUNT],
        }
    }

    /// Wrap an existing dense array, checking its length.
    pub fn from_values(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        let expected = rows.checked_mul(cols).and_then(|n| n.checked_mul(Action::COUNT));
        if expected != Some(values.len()) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "value table for {rows}x{cols} needs {rows}*{cols}*{} entries, got {}",
                    Action::COUNT,
                    values.len()
                ),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// `(rows, cols)` of the grid this table covers
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Error unless this table covers a `rows x cols` grid.
    pub fn ensure_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() != (rows, cols) || self.values.len() != rows * cols * Action::COUNT {
            return Err(Error::TableShapeMismatch {
                expected: (rows, cols),
                found: self.shape(),
            });
        }
        Ok(())
    }

    fn offset(&self, state: Cell) -> usize {
        debug_assert!(state.row < self.rows && state.col < self.cols);
        (state.row * self.cols + state.col) * Action::COUNT
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: Cell, action: Action) -> f64 {
        self.values[self.offset(state) + action.index()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: Cell, action: Action, value: f64) {
        let idx = self.offset(state) + action.index();
        self.values[idx] = value;
    }

    /// The four action values of a state, in [`Action::ALL`] order
    pub fn action_values(&self, state: Cell) -> &[f64] {
        let start = self.offset(state);
        &self.values[start..start + Action::COUNT]
    }

    /// Maximum Q-value over all actions in a state
    pub fn max_q(&self, state: Cell) -> f64 {
        self.action_values(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest value; ties go to the earliest action in
    /// [`Action::ALL`] order.
    pub fn greedy_action(&self, state: Cell) -> Action {
        let mut best = Action::Up;
        let mut best_value = f64::NEG_INFINITY;
        for (action, &value) in Action::ALL.iter().zip(self.action_values(state)) {
            if value > best_value {
                best = *action;
                best_value = value;
            }
        }
        best
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1 - α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    pub fn q_learning_update(
        &mut self,
        state: Cell,
        action: Action,
        reward: f64,
        next_state: Cell,
        learning_rate: f64,
        discount_factor: f64,
    ) {
        let current_q = self.get(state, action);
        let td_target = reward + discount_factor * self.max_q(next_state);
        let new_q = (1.0 - learning_rate) * current_q + learning_rate * td_target;
        self.set(state, action, new_q);
    }

    /// Raw dense values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Number of entries that moved away from zero
    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Smallest and largest stored value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().copied().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
