//! Key-value backed result store.
//!
//! The entire [`SweepState`] is stored as one JSON document under
//! [`SWEEP_STATE_KEY`]. Mutations go through [`KvBackend::update`], which the
//! backend must apply atomically, so spec, expected count and results can
//! never drift apart the way separately-keyed fields could.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};
use tt_types::{StoreError, StoreResult, SweepSpec, SweepState, WorkerResult};

use crate::store::ResultStore;

/// Key under which the serialized sweep state lives.
pub const SWEEP_STATE_KEY: &str = "sweep_state";

/// Minimal key-value capability a remote cache or an in-process map provides.
#[async_trait]
pub trait KvBackend: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Apply `f` to the value at `key` atomically: no other `update` on the
    /// same key may interleave. `f` receives the current value and returns
    /// the next one (`None` deletes the key) plus a value handed back to the
    /// caller.
    async fn update<T, F>(&self, key: &str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Option<&str>) -> StoreResult<(Option<String>, T)> + Send + 'static;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// In-process [`KvBackend`] over a [`DashMap`]. `update` holds the entry's
/// shard lock for the whole read-modify-write.
#[derive(Debug, Default)]
pub struct DashMapBackend {
    map: DashMap<String, String>,
}

impl DashMapBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[async_trait]
impl KvBackend for DashMapBackend {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.map.get(key).map(|v| v.value().clone()))
    }

    async fn update<T, F>(&self, key: &str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Option<&str>) -> StoreResult<(Option<String>, T)> + Send + 'static,
    {
        match self.map.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let (next, out) = f(Some(entry.get().as_str()))?;
                match next {
                    Some(value) => {
                        entry.insert(value);
                    }
                    None => {
                        entry.remove();
                    }
                }
                Ok(out)
            }
            Entry::Vacant(entry) => {
                let (next, out) = f(None)?;
                if let Some(value) = next {
                    entry.insert(value);
                }
                Ok(out)
            }
        }
    }

    fn name(&self) -> &str {
        "dashmap"
    }
}

/// [`ResultStore`] over any [`KvBackend`].
#[derive(Debug)]
pub struct KvResultStore<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> KvResultStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn load(&self) -> StoreResult<SweepState> {
        match self.backend.get(SWEEP_STATE_KEY).await? {
            Some(raw) => decode(&raw),
            None => Ok(SweepState::default()),
        }
    }

    /// Atomically mutate the stored state and return what `f` returns.
    async fn modify<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SweepState) -> T + Send + 'static,
    {
        self.backend
            .update(SWEEP_STATE_KEY, move |current| {
                let mut state = match current {
                    Some(raw) => decode(raw)?,
                    None => SweepState::default(),
                };
                let out = f(&mut state);
                Ok((Some(encode(&state)?), out))
            })
            .await
    }
}

fn decode(raw: &str) -> StoreResult<SweepState> {
    serde_json::from_str(raw).map_err(|e| {
        warn!(error = %e, "failed to decode stored sweep state");
        StoreError::Corrupt {
            message: e.to_string(),
        }
    })
}

fn encode(state: &SweepState) -> StoreResult<String> {
    serde_json::to_string(state).map_err(|e| StoreError::Corrupt {
        message: e.to_string(),
    })
}

#[async_trait]
impl<B: KvBackend> ResultStore for KvResultStore<B> {
    async fn reset(&self) -> StoreResult<()> {
        self.backend
            .update(SWEEP_STATE_KEY, |_| Ok((None, ())))
            .await
    }

    async fn begin_sweep(&self, spec: SweepSpec, expected_count: usize) -> StoreResult<()> {
        let state = SweepState {
            spec: Some(spec),
            expected_count,
            results: Vec::new(),
        };
        let encoded = encode(&state)?;
        self.backend
            .update(SWEEP_STATE_KEY, move |_| Ok((Some(encoded), ())))
            .await
    }

    async fn set_spec(&self, spec: SweepSpec) -> StoreResult<()> {
        self.modify(move |state| state.spec = Some(spec)).await
    }

    async fn spec(&self) -> StoreResult<Option<SweepSpec>> {
        Ok(self.load().await?.spec)
    }

    async fn set_expected_count(&self, count: usize) -> StoreResult<()> {
        self.modify(move |state| state.expected_count = count).await
    }

    async fn expected_count(&self) -> StoreResult<usize> {
        Ok(self.load().await?.expected_count)
    }

    async fn append(&self, result: WorkerResult) -> StoreResult<usize> {
        let stored = self
            .modify(move |state| {
                state.results.push(result);
                state.results.len()
            })
            .await?;
        debug!(stored, backend = self.backend.name(), "result appended");
        Ok(stored)
    }

    async fn replace_all(&self, results: Vec<WorkerResult>) -> StoreResult<()> {
        self.modify(move |state| state.results = results).await
    }

    async fn results(&self) -> StoreResult<Vec<WorkerResult>> {
        Ok(self.load().await?.results)
    }

    async fn snapshot(&self) -> StoreResult<SweepState> {
        self.load().await
    }
}
