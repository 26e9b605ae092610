//! Completion tracking: sweep status derived from stored results.

use serde::{Deserialize, Serialize};

/// Progress of the active sweep.
///
/// Serialized in the `/results` wire shape, e.g.
/// `{"status":"in_progress","received":3,"expected":4}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepStatus {
    NoResultsYet,
    InProgress { received: usize, expected: usize },
    /// At least one result, and at least as many as expected. Excess results
    /// are not an error.
    Complete,
}

impl SweepStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Status for `received` results against `expected` jobs.
pub fn status(received: usize, expected: usize) -> SweepStatus {
    if received == 0 {
        SweepStatus::NoResultsYet
    } else if received < expected {
        SweepStatus::InProgress { received, expected }
    } else {
        SweepStatus::Complete
    }
}
