use genai_proxy::config::ProxyConfig;
use genai_proxy::services::metrics::init_metrics;
use genai_proxy::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProxyConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "genai-proxy",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
