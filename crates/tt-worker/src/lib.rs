//! # tt-worker
//!
//! One sweep worker runs exactly one parameter combination: it checks the
//! coordinator is reachable, runs the simulator, and posts the measurements
//! back to the coordinator's report address.

pub mod config;
pub mod simulator;
pub mod worker;

pub use config::WorkerConfig;
pub use simulator::{CommandSimulator, Simulator};
pub use worker::{ping_url, SimulationWorker};
