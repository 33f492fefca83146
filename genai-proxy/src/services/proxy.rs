//! The request proxy: method gate, `type` dispatch, credential injection,
//! and image response normalization.

use super::gemini::GeminiClient;
use super::metrics::record_proxy_request;
use crate::config::{Credentials, UpstreamConfig};
use crate::error::ProxyError;
use crate::models::{
    AiKind, GenerateContentResponse, ImageEnvelope, InboundRequest, ProxyBody, ProxyRequest,
    ProxyResponse,
};
use axum::http::Method;
use secrecy::Secret;

#[derive(Debug, Clone)]
pub struct ProxyService {
    client: GeminiClient,
    credentials: Credentials,
    upstream: UpstreamConfig,
}

impl ProxyService {
    pub fn new(client: GeminiClient, credentials: Credentials, upstream: UpstreamConfig) -> Self {
        Self {
            client,
            credentials,
            upstream,
        }
    }

    /// Handle one invocation. Never fails: every error becomes a response.
    pub async fn handle(&self, request: InboundRequest) -> ProxyResponse {
        if request.method == Method::OPTIONS {
            return ProxyResponse::no_content();
        }
        if request.method != Method::POST {
            return ProxyError::MethodNotAllowed.into();
        }

        let parsed = match ProxyRequest::from_body(&request.body) {
            Ok(parsed) => parsed,
            Err(err) => return self.fail(None, err),
        };
        let kind = parsed.kind();

        match self.forward(&parsed).await {
            Ok(body) => {
                record_proxy_request(kind.as_str(), "success");
                tracing::info!(kind = %kind, "Proxy request completed");
                ProxyResponse::ok(body)
            }
            Err(err) => self.fail(Some(kind), err),
        }
    }

    async fn forward(&self, request: &ProxyRequest) -> Result<ProxyBody, ProxyError> {
        let kind = request.kind();
        let api_key = self.credential(kind)?;
        let model = self.upstream.model_for(kind);

        let payload = self
            .client
            .generate_content(model, api_key, &request.upstream_body())
            .await?;

        match request {
            ProxyRequest::Text { .. } => Ok(ProxyBody::Upstream(payload)),
            ProxyRequest::Image { .. } => normalize_image_response(&payload).map(ProxyBody::Image),
        }
    }

    fn credential(&self, kind: AiKind) -> Result<&Secret<String>, ProxyError> {
        self.credentials
            .get(kind)
            .ok_or(ProxyError::MissingCredential(kind.credential_key()))
    }

    fn fail(&self, kind: Option<AiKind>, err: ProxyError) -> ProxyResponse {
        let kind_label = kind.map(|k| k.as_str()).unwrap_or("unknown");
        record_proxy_request(kind_label, err.outcome());

        match &err {
            ProxyError::InvalidType(requested) => {
                tracing::warn!(
                    kind = kind_label,
                    requested_type = %requested,
                    error = %err,
                    "Proxy request rejected"
                );
            }
            _ if err.status_code().is_server_error() => {
                tracing::error!(kind = kind_label, error = %err, "Proxy request failed");
            }
            _ => {
                tracing::warn!(kind = kind_label, error = %err, "Proxy request rejected");
            }
        }

        err.into()
    }
}

/// Reshape a `generateContent` image response into the `predict` envelope.
fn normalize_image_response(payload: &[u8]) -> Result<ImageEnvelope, ProxyError> {
    let response: GenerateContentResponse =
        serde_json::from_slice(payload).map_err(ProxyError::InvalidUpstreamPayload)?;

    let data = response
        .first_inline_data()
        .and_then(|inline| inline.data.as_deref())
        .ok_or(ProxyError::NoImageData)?;

    Ok(ImageEnvelope::single(data))
}
