//! Responses returned to the browser.

use axum::{
    Json,
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Image result in the Imagen `predict` response shape that existing
/// callers decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEnvelope {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: String,
}

impl ImageEnvelope {
    pub fn single(bytes_base64_encoded: impl Into<String>) -> Self {
        Self {
            predictions: vec![Prediction {
                bytes_base64_encoded: bytes_base64_encoded.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProxyBody {
    Empty,
    Text(&'static str),
    /// Upstream JSON body, byte for byte.
    Upstream(Bytes),
    Image(ImageEnvelope),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: ProxyBody,
}

impl ProxyResponse {
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: ProxyBody::Empty,
        }
    }

    pub fn ok(body: ProxyBody) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ProxyBody::Error(ErrorBody {
                error: message.into(),
            }),
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        match self.body {
            ProxyBody::Empty => status.into_response(),
            ProxyBody::Text(text) => (status, text).into_response(),
            ProxyBody::Upstream(bytes) => (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                bytes,
            )
                .into_response(),
            ProxyBody::Image(envelope) => (status, Json(envelope)).into_response(),
            ProxyBody::Error(body) => (status, Json(body)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_serializes_in_predict_shape() {
        let value = serde_json::to_value(ImageEnvelope::single("ABC123")).unwrap();
        assert_eq!(value, json!({"predictions": [{"bytesBase64Encoded": "ABC123"}]}));
    }

    #[tokio::test]
    async fn no_content_has_empty_body() {
        let response = ProxyResponse::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn upstream_body_is_written_verbatim() {
        let raw = r#"{"modelVersion":"m","candidates":[{"z":1,"a":2.50}]}"#;
        let response = ProxyResponse::ok(ProxyBody::Upstream(Bytes::from_static(raw.as_bytes())))
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], raw.as_bytes());
    }

    #[tokio::test]
    async fn error_renders_json_body() {
        let response =
            ProxyResponse::error(StatusCode::BAD_REQUEST, "Invalid AI type specified").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"error":"Invalid AI type specified"}"#);
    }
}
