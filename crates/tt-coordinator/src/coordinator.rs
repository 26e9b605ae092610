//! The coordinator façade: submit, report and query.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tt_store::ResultStore;
use tt_sweep::{spawn_dispatch, DispatchSummary, Job, Launcher, ParameterGrid, SweepStatus};
use tt_types::{ScoreError, SweepSpec, TtResult, WorkerResult};
use uuid::Uuid;

/// `GET /ping` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingAck {
    pub status: String,
}

/// Acknowledges a submitted sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    pub status: String,
    pub total_combinations: usize,
}

/// Acknowledges a reported result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAck {
    pub status: String,
}

/// What `query` answers: progress while results are outstanding, the winning
/// result itself once the sweep is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Pending(SweepStatus),
    Winner(WorkerResult),
}

/// A submitted sweep: the acknowledgment for the client plus the handle of
/// the background dispatch, which callers are free to drop.
#[derive(Debug)]
pub struct Submission {
    pub sweep_id: Uuid,
    pub ack: SubmitAck,
    pub dispatch: JoinHandle<DispatchSummary>,
}

/// Orchestrates the store, the grid and the dispatcher.
#[derive(Debug, Clone)]
pub struct Coordinator {
    store: Arc<dyn ResultStore>,
    launcher: Arc<dyn Launcher>,
    callback_url: String,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn ResultStore>,
        launcher: Arc<dyn Launcher>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            launcher,
            callback_url: callback_url.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    pub fn ping(&self) -> PingAck {
        debug!("ping");
        PingAck {
            status: "ok".to_string(),
        }
    }

    /// Start a new sweep, discarding any previous one.
    ///
    /// The store is reset and the new expectations recorded before any job is
    /// dispatched. Dispatch runs in the background; this returns without
    /// waiting for it or for any worker.
    pub async fn submit(&self, spec: SweepSpec) -> TtResult<Submission> {
        let sweep_id = Uuid::new_v4();
        let grid = ParameterGrid::from_spec(&spec);
        let total = grid.size();

        info!(%sweep_id, ?spec, "received sweep specification");
        if grid.is_empty() {
            warn!(%sweep_id, "a parameter domain is empty, no jobs will be dispatched");
        }
        self.store.begin_sweep(spec, total).await?;

        let jobs = Job::batch(sweep_id, grid.combinations(), &self.callback_url);
        let dispatch = spawn_dispatch(self.launcher.clone(), jobs);

        info!(%sweep_id, total_combinations = total, "sweep submitted");
        Ok(Submission {
            sweep_id,
            ack: SubmitAck {
                status: "processing_started".to_string(),
                total_combinations: total,
            },
            dispatch,
        })
    }

    /// Record one worker result. The combination is not checked against the
    /// active sweep and repeated reports are all kept.
    pub async fn report(&self, result: WorkerResult) -> TtResult<ReportAck> {
        info!(combination = %result.combination, "received result");
        let stored = self.store.append(result).await?;
        info!(stored, "total results stored");
        Ok(ReportAck {
            status: "result_received".to_string(),
        })
    }

    /// Progress of the active sweep, or its best result once complete.
    pub async fn query(&self) -> TtResult<QueryOutcome> {
        let state = self.store.snapshot().await?;
        debug!(
            received = state.results.len(),
            expected = state.expected_count,
            "stored results"
        );

        let status = tt_sweep::status(state.results.len(), state.expected_count);
        if !status.is_complete() {
            return Ok(QueryOutcome::Pending(status));
        }

        let spec = state.spec.as_ref().ok_or(ScoreError::MissingSpec)?;
        let (winner, score) = tt_sweep::best_result(&state.results, spec.target())?;
        info!(combination = %winner.combination, score, "best result found");
        Ok(QueryOutcome::Winner(winner.clone()))
    }
}
