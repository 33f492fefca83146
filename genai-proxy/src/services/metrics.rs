//! Prometheus metrics for genai-proxy.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Metrics recorder already initialized"))
}

/// Render the current metrics, or `None` before `init_metrics` ran.
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

/// Count one proxied invocation by target and outcome.
pub fn record_proxy_request(kind: &'static str, outcome: &'static str) {
    counter!("genai_proxy_requests_total", "kind" => kind, "outcome" => outcome).increment(1);
}
