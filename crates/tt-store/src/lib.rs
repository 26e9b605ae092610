//! Sweep state storage for TrafficTune.
//!
//! All sweep state lives behind a [`ResultStore`]. Every operation is atomic
//! with respect to every other operation on the same store:
//! - [`MemoryStore`] keeps the state behind a single mutex
//! - [`KvResultStore`] keeps the whole state serialized under one key of a
//!   [`KvBackend`] and mutates it with the backend's atomic update

pub mod kv;
pub mod memory;
pub mod store;

pub use kv::{DashMapBackend, KvBackend, KvResultStore, SWEEP_STATE_KEY};
pub use memory::MemoryStore;
pub use store::ResultStore;
