//! # tt-coordinator
//!
//! Coordinates a TrafficTune parameter sweep: accepts a sweep submission,
//! dispatches one worker per parameter combination, collects the results
//! workers report back, and answers with progress or the best-matching
//! combination.

pub mod config;
pub mod coordinator;
pub mod launcher;
pub mod server;

pub use config::{CoordinatorConfig, LauncherKind, StoreKind};
pub use coordinator::{Coordinator, PingAck, QueryOutcome, ReportAck, SubmitAck, Submission};
pub use launcher::{DryRunLauncher, ProcessLauncher};
pub use server::{router, AppState};
