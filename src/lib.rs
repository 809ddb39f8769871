//! Tabular Q-learning on randomly generated mazes
//!
//! This crate provides:
//! - Perfect maze generation by randomized depth-first carving
//! - Breadth-first shortest paths and trap/bonus placement off the solution
//! - A grid environment with goal, trap and bonus rewards
//! - An epsilon-greedy Q-learning agent with a dense value table
//! - An episodic training pipeline with pluggable observers
//! - Value table persistence keyed by maze size

pub mod adapters;
pub mod app;
pub mod cli;
pub mod environment;
pub mod error;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod random;

pub use environment::{Action, Environment, RewardConfig, StepEvent, StepOutcome};
pub use error::{Error, Result};
pub use maze::{Cell, Grid, MazeLayout};
pub use q_learning::{QLearningAgent, QTable};
