//! service-core: Shared infrastructure for the genai-proxy workspace.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

