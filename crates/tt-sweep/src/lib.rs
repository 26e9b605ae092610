//! # tt-sweep
//!
//! Parameter-sweep mechanics for TrafficTune.
//!
//! Provides the Cartesian-product grid over the three simulation parameters,
//! job descriptors and the fire-and-forget dispatcher, the completion tracker
//! that derives sweep status from stored results, and the squared-error
//! scorer that picks the winning result.

mod dispatch;
mod grid;
mod scoring;
mod status;

pub use dispatch::{dispatch_all, spawn_dispatch, DispatchSummary, Job, Launcher};
pub use grid::{count, generate, ParameterGrid};
pub use scoring::{best_result, score};
pub use status::{status, SweepStatus};
