//! Simulation driver.
//!
//! Provides the simulation context that dispatches trace records into the
//! cache and accumulates the run's statistics.

/// Simulation context, record dispatch and trace replay.
pub mod simulator;

pub use simulator::{DispatchReport, RunSummary, Simulator};
