use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use tt_types::{StoreResult, SweepSpec, SweepState, WorkerResult};

use crate::store::ResultStore;

/// In-process store: the whole [`SweepState`] behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<SweepState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn reset(&self) -> StoreResult<()> {
        *self.state.lock() = SweepState::default();
        Ok(())
    }

    async fn begin_sweep(&self, spec: SweepSpec, expected_count: usize) -> StoreResult<()> {
        *self.state.lock() = SweepState {
            spec: Some(spec),
            expected_count,
            results: Vec::new(),
        };
        Ok(())
    }

    async fn set_spec(&self, spec: SweepSpec) -> StoreResult<()> {
        self.state.lock().spec = Some(spec);
        Ok(())
    }

    async fn spec(&self) -> StoreResult<Option<SweepSpec>> {
        Ok(self.state.lock().spec.clone())
    }

    async fn set_expected_count(&self, count: usize) -> StoreResult<()> {
        self.state.lock().expected_count = count;
        Ok(())
    }

    async fn expected_count(&self) -> StoreResult<usize> {
        Ok(self.state.lock().expected_count)
    }

    async fn append(&self, result: WorkerResult) -> StoreResult<usize> {
        let mut state = self.state.lock();
        state.results.push(result);
        debug!(stored = state.results.len(), "result appended");
        Ok(state.results.len())
    }

    async fn replace_all(&self, results: Vec<WorkerResult>) -> StoreResult<()> {
        self.state.lock().results = results;
        Ok(())
    }

    async fn results(&self) -> StoreResult<Vec<WorkerResult>> {
        Ok(self.state.lock().results.clone())
    }

    async fn snapshot(&self) -> StoreResult<SweepState> {
        Ok(self.state.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;
    use std::sync::Arc;

    #[tokio::test]
    async fn reset_clears_everything() {
        contract::reset_clears_everything(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn setters_round_trip() {
        contract::setters_round_trip(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn append_preserves_order() {
        contract::append_preserves_order(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn replace_all_swaps_results() {
        contract::replace_all_swaps_results(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn begin_sweep_replaces_previous_sweep() {
        contract::begin_sweep_replaces_previous_sweep(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn snapshot_is_a_copy() {
        contract::snapshot_is_a_copy(&MemoryStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_not_lost() {
        contract::concurrent_appends_are_not_lost(Arc::new(MemoryStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sweep_start_is_never_observed_half_done() {
        contract::sweep_start_is_never_observed_half_done(Arc::new(MemoryStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn replace_all_races_appends() {
        contract::replace_all_races_appends(Arc::new(MemoryStore::new())).await;
    }
}
