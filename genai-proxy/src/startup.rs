//! Application startup and lifecycle management.
//!
//! One HTTP listener serves the proxy on every path. `GET /health` and
//! `GET /metrics` are answered locally; any other method on those paths
//! still reaches the proxy.

use crate::config::ProxyConfig;
use crate::handlers::{health::health_check, metrics::metrics, proxy::call_ai};
use crate::services::{GeminiClient, ProxyService};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    cors_headers_middleware, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub proxy: ProxyService,
}

/// Build the router. Exposed so tests can drive it in-process.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(call_ai))
        .route("/metrics", get(metrics).fallback(call_ai))
        .fallback(call_ai)
        .layer(from_fn(cors_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ProxyConfig) -> Result<Self, AppError> {
        let client = GeminiClient::new(&config.upstream.api_base).map_err(|e| {
            tracing::error!("Failed to create HTTP client: {}", e);
            AppError::InternalError(anyhow::Error::new(e))
        })?;

        let gemini_configured = config.credentials.gemini_api_key.is_some();
        let imagen_configured = config.credentials.imagen_api_key.is_some();
        if !gemini_configured || !imagen_configured {
            tracing::warn!(
                gemini_configured,
                imagen_configured,
                "API keys missing - requests for those targets will fail"
            );
        }

        tracing::info!(
            api_base = %config.upstream.api_base,
            text_model = %config.upstream.text_model,
            image_model = %config.upstream.image_model,
            "Initialized Gemini proxy"
        );

        let proxy = ProxyService::new(client, config.credentials, config.upstream);
        let router = build_router(AppState { proxy });

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("genai-proxy listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
