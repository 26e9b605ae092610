//! The worker run: ping the coordinator, simulate, report.

use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};
use tt_types::{TtResult, WorkerResult};

use crate::config::WorkerConfig;
use crate::simulator::Simulator;

/// The coordinator's ping address, derived from its report address.
pub fn ping_url(master_url: &str) -> String {
    master_url.replace("/report_result", "/ping")
}

pub struct SimulationWorker<S: Simulator> {
    config: WorkerConfig,
    simulator: S,
    client: Client,
}

impl<S: Simulator> SimulationWorker<S> {
    pub fn new(config: WorkerConfig, simulator: S) -> Self {
        Self {
            config,
            simulator,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// `true` only when the coordinator answers its ping with HTTP 200.
    /// Failures are logged, never returned.
    pub async fn ping_master(&self) -> bool {
        let Some(master_url) = self.config.master_url.as_deref() else {
            warn!("MASTER_URL is not set, skipping ping");
            return false;
        };

        let url = ping_url(master_url);
        match self
            .client
            .get(&url)
            .timeout(self.config.ping_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(%url, "coordinator is reachable");
                true
            }
            Ok(response) => {
                warn!(%url, status = %response.status(), "coordinator ping failed");
                false
            }
            Err(e) => {
                error!(%url, error = %e, "could not reach coordinator");
                false
            }
        }
    }

    /// Post the result once. Returns whether the coordinator accepted it;
    /// failures are logged and not retried.
    pub async fn post_result(&self, result: &WorkerResult) -> bool {
        let Some(master_url) = self.config.master_url.as_deref() else {
            warn!("MASTER_URL is not set, result not sent");
            return false;
        };

        info!(url = %master_url, combination = %result.combination, "posting result");
        match self
            .client
            .post(master_url)
            .json(result)
            .timeout(self.config.report_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!(%status, "coordinator accepted result");
                } else {
                    warn!(%status, "coordinator rejected result");
                }
                status.is_success()
            }
            Err(e) => {
                error!(error = %e, "failed to send result to coordinator");
                false
            }
        }
    }

    /// Run the configured combination end to end and return what was
    /// reported. The ping outcome does not gate the simulation.
    pub async fn execute(&self) -> TtResult<WorkerResult> {
        let combination = self.config.combination;
        info!(%combination, simulator = self.simulator.name(), "received parameters");

        self.ping_master().await;
        let measurements = self.simulator.run(combination).await?;
        let result = WorkerResult::new(combination, measurements);
        self.post_result(&result).await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tt_coordinator::{router, AppState, Coordinator, DryRunLauncher, QueryOutcome};
    use tt_store::{MemoryStore, ResultStore};
    use tt_types::{Combination, Measurements, SweepSpec};

    struct FixedSimulator(Measurements);

    #[async_trait]
    impl Simulator for FixedSimulator {
        async fn run(&self, _combination: Combination) -> TtResult<Measurements> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn delays(i2: f64, i3: f64) -> Measurements {
        [("I2".to_string(), i2), ("I3".to_string(), i3)]
            .into_iter()
            .collect()
    }

    async fn spawn_coordinator() -> (String, Arc<dyn ResultStore>) {
        let store: Arc<dyn ResultStore> = Arc::new(MemoryStore::new());
        let coordinator = Coordinator::new(store.clone(), Arc::new(DryRunLauncher), "unused");
        let app = router(AppState::new(coordinator, "templates"));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/report_result"), store)
    }

    fn worker(master_url: Option<String>, combination: Combination) -> SimulationWorker<FixedSimulator> {
        let config = WorkerConfig {
            combination,
            master_url,
            ping_timeout: Duration::from_secs(1),
            report_timeout: Duration::from_secs(1),
            ..Default::default()
        };
        SimulationWorker::new(config, FixedSimulator(delays(50.0, 21.0)))
    }

    #[test]
    fn ping_url_replaces_report_path() {
        assert_eq!(
            ping_url("http://master:8000/report_result"),
            "http://master:8000/ping"
        );
        assert_eq!(ping_url("http://master:8000"), "http://master:8000");
    }

    #[tokio::test]
    async fn ping_reaches_live_coordinator() {
        let (url, _) = spawn_coordinator().await;
        assert!(worker(Some(url), Combination::new(1.0, 1.0, 1.0)).ping_master().await);
    }

    #[tokio::test]
    async fn ping_without_master_is_false() {
        assert!(!worker(None, Combination::new(1.0, 1.0, 1.0)).ping_master().await);
    }

    #[tokio::test]
    async fn unreachable_master_is_swallowed() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/report_result");
        let worker = worker(Some(url), Combination::new(1.0, 1.0, 1.0));
        assert!(!worker.ping_master().await);

        let result = worker.execute().await.unwrap();
        assert_eq!(result.intersection_avg_delays, delays(50.0, 21.0));
    }

    #[tokio::test]
    async fn execute_reports_to_coordinator() {
        let (url, store) = spawn_coordinator().await;
        let spec = SweepSpec::new(delays(50.0, 20.0), vec![1.0], vec![1.0], vec![1.0]);
        store.begin_sweep(spec, 1).await.unwrap();

        let combination = Combination::new(1.0, 1.0, 1.0);
        let result = worker(Some(url), combination).execute().await.unwrap();

        assert_eq!(result.combination, combination);
        assert_eq!(store.results().await.unwrap(), vec![result.clone()]);

        let coordinator = Coordinator::new(store, Arc::new(DryRunLauncher), "unused");
        assert_eq!(
            coordinator.query().await.unwrap(),
            QueryOutcome::Winner(result)
        );
    }

    #[tokio::test]
    async fn rejected_result_is_not_retried() {
        let (url, store) = spawn_coordinator().await;
        let worker = worker(Some(url), Combination::new(1.0, 1.0, 1.0));

        let mut bad = BTreeMap::new();
        bad.insert(" ".to_string(), 1.0);
        let accepted = worker
            .post_result(&WorkerResult::new(Combination::new(1.0, 1.0, 1.0), bad))
            .await;

        assert!(!accepted);
        assert!(store.results().await.unwrap().is_empty());
    }
}
