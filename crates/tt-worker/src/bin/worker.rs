use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tt_types::config_error;
use tt_worker::{CommandSimulator, SimulationWorker, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = WorkerConfig::from_env()?;
    let command = config
        .sim_command
        .clone()
        .ok_or_else(|| config_error!("TT_SIM_COMMAND must be set"))?;
    let simulator = CommandSimulator::from_command_line(&command)?;

    let worker = SimulationWorker::new(config, simulator);
    match worker.execute().await {
        Ok(result) => {
            info!(result = %serde_json::to_string(&result)?, "worker finished");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "worker failed");
            Err(e.into())
        }
    }
}
