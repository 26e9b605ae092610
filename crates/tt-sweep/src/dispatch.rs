//! Job descriptors and the fire-and-forget dispatcher.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tt_types::{Combination, LaunchError};
use uuid::Uuid;

/// Describes a single simulation run to be handed to a worker.
///
/// `id` only exists for log correlation: reported results carry the
/// combination, not the job id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job id.
    pub id: Uuid,

    /// Sweep this job belongs to.
    pub sweep_id: Uuid,

    /// Position in grid order (0-indexed).
    pub sequence: usize,

    pub combination: Combination,

    /// Where the worker posts its result.
    pub callback_url: String,

    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        sweep_id: Uuid,
        sequence: usize,
        combination: Combination,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sweep_id,
            sequence,
            combination,
            callback_url: callback_url.into(),
            created_at: Utc::now(),
        }
    }

    /// One job per combination, in grid order.
    pub fn batch(sweep_id: Uuid, combinations: Vec<Combination>, callback_url: &str) -> Vec<Job> {
        combinations
            .into_iter()
            .enumerate()
            .map(|(i, c)| Job::new(sweep_id, i, c, callback_url))
            .collect()
    }
}

/// Starts one unit of work for a job.
///
/// Implementations must return once the work is started; the worker reports
/// back on its own through `job.callback_url`.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, job: &Job) -> Result<(), LaunchError>;

    /// Human-readable launcher name.
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Launcher({})", self.name())
    }
}

/// Outcome of one dispatch batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub launched: usize,
    pub failed: usize,
}

/// Launch every job in order. A failed launch is logged and skipped; it never
/// stops the rest of the batch.
pub async fn dispatch_all(launcher: &dyn Launcher, jobs: Vec<Job>) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for job in &jobs {
        match launcher.launch(job).await {
            Ok(()) => summary.launched += 1,
            Err(e) => {
                summary.failed += 1;
                warn!(
                    job_id = %job.id,
                    sweep_id = %job.sweep_id,
                    combination = %job.combination,
                    error = %e,
                    "job launch failed"
                );
            }
        }
    }

    info!(
        launcher = launcher.name(),
        launched = summary.launched,
        failed = summary.failed,
        "dispatch batch finished"
    );
    summary
}

/// Run [`dispatch_all`] on the tokio runtime without waiting for it.
///
/// No limit is placed on how many jobs are in flight; the whole grid is
/// dispatched.
pub fn spawn_dispatch(launcher: Arc<dyn Launcher>, jobs: Vec<Job>) -> JoinHandle<DispatchSummary> {
    tokio::spawn(async move { dispatch_all(launcher.as_ref(), jobs).await })
}
