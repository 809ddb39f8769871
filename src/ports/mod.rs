//! Ports (trait boundaries) for external collaborators.
//!
//! Following hexagonal architecture, these traits are owned by the domain and
//! implemented by adapters: observers and renderers on one side, value table
//! storage on the other.

pub mod observer;
pub mod repository;

pub use observer::{Observer, StepFrame};
pub use repository::TableRepository;
