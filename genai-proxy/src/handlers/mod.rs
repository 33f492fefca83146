//! HTTP handlers for genai-proxy.

pub mod health;
pub mod metrics;
pub mod proxy;
