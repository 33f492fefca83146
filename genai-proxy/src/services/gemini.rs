//! Generative Language API client.
//!
//! Issues a single `generateContent` call per invocation with the API key as
//! the `key` query parameter. No timeout or retry is applied here.

use crate::error::ProxyError;
use crate::models::GenerateContentRequest;
use axum::body::Bytes;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::IgnoredAny;
use serde_json::Value;

const FALLBACK_ERROR_MESSAGE: &str = "API request failed";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, api_base))
    }

    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    /// Build the API URL for the given model and method. The key is added
    /// separately so this string is safe to log.
    fn api_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.api_base, model, method)
    }

    /// POST `request` to `model:generateContent` and return the response body
    /// exactly as received, once it is known to be valid JSON.
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &Secret<String>,
        request: &GenerateContentRequest,
    ) -> Result<Bytes, ProxyError> {
        let url = self.api_url(model, "generateContent");

        tracing::debug!(model = %model, "Sending request to Gemini API");

        // reqwest errors embed the full URL, including the key.
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.expose_secret().as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| ProxyError::Network(e.without_url()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Network(e.without_url()))?;

        if !status.is_success() {
            let payload: Option<Value> = serde_json::from_slice(&bytes).ok();

            tracing::error!(
                model = %model,
                status = %status,
                upstream_error = %String::from_utf8_lossy(&bytes),
                "Gemini API returned an error"
            );

            let message = payload
                .as_ref()
                .and_then(|p| p.pointer("/error/message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(FALLBACK_ERROR_MESSAGE)
                .to_string();

            return Err(ProxyError::Upstream { status, message });
        }

        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(ProxyError::InvalidUpstreamPayload)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_ignores_trailing_slash_and_omits_key() {
        let client = GeminiClient::with_client(Client::new(), "http://localhost:9000/v1beta/");
        assert_eq!(
            client.api_url("gemini-test", "generateContent"),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }
}
