//! Training pipeline abstractions
//!
//! This module provides:
//! - The episodic training loop driving environment and agent
//! - Observers recording or rendering what happens during training

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    FrameObserver, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    SharedObserver, render_frame,
};
pub use training::{EpisodeSummary, Exploration, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Observer, StepFrame};
