use crate::models::{InboundRequest, ProxyResponse};
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, http::Method};

/// Catch-all entry point: any path, any method.
///
/// The body is taken as raw bytes so that non-UTF-8 or empty bodies reach
/// the proxy's own parsing and error reporting.
pub async fn call_ai(State(state): State<AppState>, method: Method, body: Bytes) -> ProxyResponse {
    state.proxy.handle(InboundRequest { method, body }).await
}
