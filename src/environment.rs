//! Maze environment: actions, rewards and the step function

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::maze::{Cell, MazeLayout};

/// A unit move on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in table order. Greedy ties resolve to the earliest entry.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Row and column delta of the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Action::Up => '^',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Right => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

/// Reward magnitudes for each outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Added on reaching the goal
    pub goal: f64,
    /// Added the first time a bonus cell is entered in an episode
    pub bonus: f64,
    /// Added on entering a trap
    pub trap: f64,
    /// Applied on every step
    pub step: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal: 50.0,
            bonus: 5.0,
            trap: -10.0,
            step: -0.1,
        }
    }
}

/// Which reward branch a step took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEvent {
    /// Ordinary open cell (or a blocked move)
    Plain,
    ReachedGoal,
    /// Entered a trap and was sent back to start
    HitTrap,
    CollectedBonus,
    /// Landed on a bonus already collected this episode
    RevisitedBonus,
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Agent position after the step (start after a trap)
    pub position: Cell,
    /// Raw reward, used for scoring
    pub reward: f64,
    pub done: bool,
    /// Bonuses collected this episode, including any collected by this step
    pub collected: HashSet<Cell>,
    pub event: StepEvent,
    /// The move hit a wall or the grid edge and the agent stayed put
    pub blocked: bool,
}

impl StepOutcome {
    /// Reward fed to the value update.
    ///
    /// Matches the raw reward except on a bonus cell, where it is the step
    /// cost alone. The bonus only counts toward the episode score; it is
    /// collected into the set before this is evaluated, so the first pickup
    /// and every revisit are treated alike.
    pub fn shaped_reward(&self, rewards: &RewardConfig) -> f64 {
        match self.event {
            StepEvent::CollectedBonus | StepEvent::RevisitedBonus => rewards.step,
            _ => self.reward,
        }
    }
}

/// Transition function over a fixed layout
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    layout: &'a MazeLayout,
    rewards: RewardConfig,
}

impl<'a> Environment<'a> {
    pub fn new(layout: &'a MazeLayout, rewards: RewardConfig) -> Self {
        Self { layout, rewards }
    }

    pub fn layout(&self) -> &'a MazeLayout {
        self.layout
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Apply `action` from `position`.
    ///
    /// Moves into walls or off the grid leave the agent in place and still
    /// cost a step. On the resulting cell the goal is checked first, then
    /// traps, then uncollected bonuses. `collected` is consumed and the
    /// updated set is returned in the outcome.
    pub fn step(&self, position: Cell, action: Action, mut collected: HashSet<Cell>) -> StepOutcome {
        let (d_row, d_col) = action.delta();
        let target = position
            .offset(d_row, d_col)
            .filter(|cell| self.layout.grid.is_open(*cell));
        let blocked = target.is_none();
        let landed = target.unwrap_or(position);

        let mut reward = self.rewards.step;
        let mut done = false;
        let mut next = landed;

        let event = if landed == self.layout.goal {
            reward += self.rewards.goal;
            done = true;
            StepEvent::ReachedGoal
        } else if self.layout.hazards.is_trap(landed) {
            reward += self.rewards.trap;
            next = self.layout.start;
            StepEvent::HitTrap
        } else if self.layout.hazards.is_bonus(landed) {
            if collected.insert(landed) {
                reward += self.rewards.bonus;
                StepEvent::CollectedBonus
            } else {
                StepEvent::RevisitedBonus
            }
        } else {
            StepEvent::Plain
        };

        StepOutcome {
            position: next,
            reward,
            done,
            collected,
            event,
            blocked,
        }
    }
}
