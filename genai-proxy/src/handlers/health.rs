use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Does not touch the upstream API.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "genai-proxy",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
