#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use genai_proxy::config::{Credentials, UpstreamConfig};
use genai_proxy::services::{GeminiClient, ProxyService};
use genai_proxy::startup::{build_router, AppState};
use tower::util::ServiceExt;
use wiremock::MockServer;

pub const TEXT_KEY: &str = "test-gemini-key";
pub const IMAGE_KEY: &str = "test-imagen-key";
pub const TEXT_MODEL: &str = "gemini-test";
pub const IMAGE_MODEL: &str = "gemini-image-test";

pub struct TestApp {
    pub router: Router,
    pub upstream: MockServer,
}

impl TestApp {
    /// Router wired to a fresh mock upstream with both keys configured.
    pub async fn spawn() -> Self {
        Self::spawn_with(Credentials::new(Some(TEXT_KEY), Some(IMAGE_KEY))).await
    }

    pub async fn spawn_with(credentials: Credentials) -> Self {
        let upstream = MockServer::start().await;

        let client = GeminiClient::new(upstream.uri()).expect("Failed to build HTTP client");
        let proxy = ProxyService::new(
            client,
            credentials,
            UpstreamConfig {
                api_base: upstream.uri(),
                text_model: TEXT_MODEL.to_string(),
                image_model: IMAGE_MODEL.to_string(),
            },
        );

        Self {
            router: build_router(AppState { proxy }),
            upstream,
        }
    }

    pub async fn send(&self, method: &str, body: &str) -> Response<Body> {
        self.send_to(method, "/.netlify/functions/callAI", body).await
    }

    pub async fn send_to(&self, method: &str, uri: &str, body: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn post_json(&self, body: serde_json::Value) -> Response<Body> {
        self.send("POST", &body.to_string()).await
    }
}

pub fn text_path() -> String {
    format!("/models/{}:generateContent", TEXT_MODEL)
}

pub fn image_path() -> String {
    format!("/models/{}:generateContent", IMAGE_MODEL)
}

pub async fn read_body(response: Response<Body>) -> (StatusCode, Vec<u8>) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, bytes.to_vec())
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = read_body(response).await;
    let json = serde_json::from_slice(&bytes).expect("Response is not JSON");
    (status, json)
}

pub fn assert_cors_headers(response: &Response<Body>) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["access-control-allow-methods"], "POST");
}
