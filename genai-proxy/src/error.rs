//! Error funnel for proxy invocations.

use crate::models::{ProxyBody, ProxyResponse};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything that can end an invocation early. Each variant maps to exactly
/// one HTTP status and message.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Invalid AI type specified")]
    InvalidType(String),

    #[error("{0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("{0} is not set in environment variables.")]
    MissingCredential(&'static str),

    #[error("{0}")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Invalid response from upstream API: {0}")]
    InvalidUpstreamPayload(#[source] serde_json::Error),

    #[error("No image data found in Gemini Image Preview response.")]
    NoImageData,
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InvalidType(_) => StatusCode::BAD_REQUEST,
            ProxyError::InvalidPayload(_)
            | ProxyError::MissingCredential(_)
            | ProxyError::Network(_)
            | ProxyError::Upstream { .. }
            | ProxyError::InvalidUpstreamPayload(_)
            | ProxyError::NoImageData => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::MethodNotAllowed => "method_not_allowed",
            ProxyError::InvalidType(_) => "invalid_type",
            ProxyError::InvalidPayload(_) => "invalid_payload",
            ProxyError::MissingCredential(_) => "missing_credential",
            ProxyError::Network(_) => "network_error",
            ProxyError::Upstream { .. } => "upstream_error",
            ProxyError::InvalidUpstreamPayload(_) => "invalid_upstream_payload",
            ProxyError::NoImageData => "no_image_data",
        }
    }
}

impl From<ProxyError> for ProxyResponse {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MethodNotAllowed => ProxyResponse {
                status: StatusCode::METHOD_NOT_ALLOWED,
                body: ProxyBody::Text("Method Not Allowed"),
            },
            other => ProxyResponse::error(other.status_code(), other.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        ProxyResponse::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_type_is_a_client_error_with_fixed_message() {
        let response = ProxyResponse::from(ProxyError::InvalidType("dalle".to_string()));
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response,
            ProxyResponse::error(StatusCode::BAD_REQUEST, "Invalid AI type specified")
        );
    }

    #[test]
    fn method_not_allowed_is_plain_text() {
        let response = ProxyResponse::from(ProxyError::MethodNotAllowed);
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.body, ProxyBody::Text("Method Not Allowed"));
    }

    #[test]
    fn missing_credential_names_the_key() {
        let err = ProxyError::MissingCredential("IMAGEN_API_KEY");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "IMAGEN_API_KEY is not set in environment variables."
        );
    }

    #[test]
    fn upstream_error_surfaces_upstream_message() {
        let response = ProxyResponse::from(ProxyError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "quota exceeded".to_string(),
        });
        assert_eq!(
            response,
            ProxyResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "quota exceeded")
        );
    }
}
