use async_trait::async_trait;
use tt_types::{StoreResult, SweepSpec, SweepState, WorkerResult};

/// Owner of the active sweep's state.
///
/// Implementations serialize every call against every other call on the
/// same state; no caller may observe a half-applied mutation. Reads return
/// copies, never live handles.
#[async_trait]
pub trait ResultStore: Send + Sync + std::fmt::Debug {
    /// Clear spec, expected count and results together.
    async fn reset(&self) -> StoreResult<()>;

    /// Reset, then record `spec` and `expected_count`, as one operation.
    async fn begin_sweep(&self, spec: SweepSpec, expected_count: usize) -> StoreResult<()>;

    async fn set_spec(&self, spec: SweepSpec) -> StoreResult<()>;

    async fn spec(&self) -> StoreResult<Option<SweepSpec>>;

    async fn set_expected_count(&self, count: usize) -> StoreResult<()>;

    async fn expected_count(&self) -> StoreResult<usize>;

    /// Append one result. Returns the number of results now stored.
    async fn append(&self, result: WorkerResult) -> StoreResult<usize>;

    /// Swap in a whole results sequence (snapshot restore).
    async fn replace_all(&self, results: Vec<WorkerResult>) -> StoreResult<()>;

    async fn results(&self) -> StoreResult<Vec<WorkerResult>>;

    /// Spec, expected count and results read together.
    async fn snapshot(&self) -> StoreResult<SweepState>;
}
