//! genai-proxy: forwards browser requests to Gemini text and image
//! generation with a server-held API key.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
