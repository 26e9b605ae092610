use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tt_coordinator::{router, AppState, Coordinator, CoordinatorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = CoordinatorConfig::from_env()?;
    let store = config.build_store();
    let launcher = config.build_launcher()?;
    info!(
        store = ?config.store,
        launcher = launcher.name(),
        callback = %config.callback_url,
        "coordinator configured"
    );

    let coordinator = Coordinator::new(store, launcher, config.callback_url.clone());
    let app = router(AppState::new(coordinator, config.template_dir.clone()));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "TrafficTune coordinator listening");

    axum::serve(listener, app).await?;
    Ok(())
}
