//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use super::http::register_http_metrics;

/// Buckets de latencia en segundos. Las lecturas de Consul tienen un
/// timeout de 5s, por eso el ultimo bucket es 10s.
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Instala el recorder global y retorna el handle para el endpoint.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;

    register_http_metrics();
    kvconf_consul::register_client_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Construye un handle sin instalarlo como recorder global (tests).
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
