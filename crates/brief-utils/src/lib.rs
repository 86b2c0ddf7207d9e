//! Shared utilities for equibrief
//!
//! Logging setup and API cost accounting used across the workspace.

pub mod cost;
pub mod logging;

pub use cost::{CostSummary, CostTracker};
pub use logging::init_tracing;
