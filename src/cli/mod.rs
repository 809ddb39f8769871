//! CLI infrastructure for the maze learning toolkit
//!
//! This module provides the command-line interface for training agents on
//! generated mazes and inspecting the value tables they leave behind.

pub mod commands;
pub mod output;
pub mod prompt;
