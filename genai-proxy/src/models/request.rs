//! Inbound request parsing and `type` dispatch.

use super::upstream::{Content, GenerateContentRequest, GenerationConfig, Modality, Part};
use crate::error::ProxyError;
use axum::body::Bytes;
use axum::http::Method;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single invocation as the host delivered it.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub body: Bytes,
}

/// Upstream target selected by the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiKind {
    Gemini,
    Imagen,
}

impl AiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiKind::Gemini => "gemini",
            AiKind::Imagen => "imagen",
        }
    }

    /// Name of the environment variable holding this target's API key.
    pub fn credential_key(&self) -> &'static str {
        match self {
            AiKind::Gemini => "GEMINI_API_KEY",
            AiKind::Imagen => "IMAGEN_API_KEY",
        }
    }

    /// Resolve a raw `type` value. Anything other than the two known strings,
    /// including non-string JSON, is an invalid type.
    fn from_value(value: Value) -> Result<Self, ProxyError> {
        match value {
            Value::String(s) => s.parse(),
            other => Err(ProxyError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for AiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiKind {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(AiKind::Gemini),
            "imagen" => Ok(AiKind::Imagen),
            other => Err(ProxyError::InvalidType(other.to_string())),
        }
    }
}

/// Fields are kept as raw JSON so `type` can be judged before anything
/// else about the payload.
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "type", default, deserialize_with = "present")]
    kind: Option<Value>,
    #[serde(default)]
    prompt: Option<Value>,
}

/// Distinguishes an explicit `null` (`Some(Value::Null)`) from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn missing_field(field: &'static str) -> ProxyError {
    ProxyError::InvalidPayload(<serde_json::Error as serde::de::Error>::missing_field(field))
}

/// A validated proxy request, one variant per upstream target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyRequest {
    Text { prompt: String },
    Image { prompt: String },
}

impl ProxyRequest {
    /// Parse a POST body.
    ///
    /// `type` is checked before `prompt`, so an unknown type is reported as
    /// such even when the prompt is also missing.
    pub fn from_body(body: &[u8]) -> Result<Self, ProxyError> {
        let raw: RawPayload = serde_json::from_slice(body).map_err(ProxyError::InvalidPayload)?;
        let kind = AiKind::from_value(raw.kind.ok_or_else(|| missing_field("type"))?)?;

        let prompt: String = raw
            .prompt
            .ok_or_else(|| missing_field("prompt"))
            .and_then(|value| serde_json::from_value(value).map_err(ProxyError::InvalidPayload))?;

        Ok(match kind {
            AiKind::Gemini => ProxyRequest::Text { prompt },
            AiKind::Imagen => ProxyRequest::Image { prompt },
        })
    }

    pub fn kind(&self) -> AiKind {
        match self {
            ProxyRequest::Text { .. } => AiKind::Gemini,
            ProxyRequest::Image { .. } => AiKind::Imagen,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            ProxyRequest::Text { prompt } | ProxyRequest::Image { prompt } => prompt,
        }
    }

    /// Build the `generateContent` body for this request.
    pub fn upstream_body(&self) -> GenerateContentRequest {
        let contents = vec![Content {
            parts: vec![Part::text(self.prompt())],
        }];

        match self {
            ProxyRequest::Text { .. } => GenerateContentRequest {
                contents,
                generation_config: None,
            },
            // The image preview model rejects IMAGE without TEXT.
            ProxyRequest::Image { .. } => GenerateContentRequest {
                contents,
                generation_config: Some(GenerationConfig {
                    response_modalities: vec![Modality::Text, Modality::Image],
                }),
            },
        }
    }
}
