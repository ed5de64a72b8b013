//! kvconf agent binary.

use std::sync::Arc;

use anyhow::Context;
use kvconf_consul::kvconf_core::Namespace;
use kvconf_consul::{ConfigClient, ConsulSettings};
use kvconf_server::{AgentSettings, AppState, metrics::init_metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let agent = AgentSettings::from_env().context("invalid KVCONF_* settings")?;
    let consul = ConsulSettings::from_env().context("invalid CONSUL_* settings")?;

    tracing::info!("Starting kvconf agent v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Consul endpoint: {}", consul.base_url());
    tracing::info!("Service namespace: {}", agent.service);

    let prometheus = init_metrics().context("failed to initialize metrics")?;

    let client = ConfigClient::new(consul, Namespace::for_service(&agent.service))
        .context("failed to build configuration client")?;

    let report = client
        .initialize()
        .await
        .context("configuration preload failed")?;
    tracing::info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "Configuration preload finished"
    );

    let state = AppState::new(Arc::new(client));
    run_server_with_state(agent.addr(), state, prometheus).await?;

    Ok(())
}
