use crate::models::AiKind;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default Generative Language API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for `gemini` (text) requests.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Default model for `imagen` requests. Image output comes from the Gemini
/// image preview model, not the Imagen predict endpoint.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub common: core_config::Config,
    pub credentials: Credentials,
    pub upstream: UpstreamConfig,
}

/// Per-target API keys. Either may be absent; that only fails the requests
/// that need it.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub gemini_api_key: Option<Secret<String>>,
    pub imagen_api_key: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl ProxyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(ProxyConfig {
            common: common_config,
            credentials: Credentials {
                gemini_api_key: get_secret(AiKind::Gemini.credential_key()),
                imagen_api_key: get_secret(AiKind::Imagen.credential_key()),
            },
            upstream: UpstreamConfig {
                api_base: get_env("GENAI_API_BASE", DEFAULT_API_BASE),
                text_model: get_env("GENAI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
                image_model: get_env("GENAI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
            },
        })
    }
}

impl Credentials {
    pub fn new(gemini_api_key: Option<&str>, imagen_api_key: Option<&str>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.and_then(secret_from),
            imagen_api_key: imagen_api_key.and_then(secret_from),
        }
    }

    pub fn get(&self, kind: AiKind) -> Option<&Secret<String>> {
        match kind {
            AiKind::Gemini => self.gemini_api_key.as_ref(),
            AiKind::Imagen => self.imagen_api_key.as_ref(),
        }
    }
}

impl UpstreamConfig {
    pub fn model_for(&self, kind: AiKind) -> &str {
        match kind {
            AiKind::Gemini => &self.text_model,
            AiKind::Imagen => &self.image_model,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_secret(key: &str) -> Option<Secret<String>> {
    env::var(key).ok().as_deref().and_then(secret_from)
}

// Blank keys count as unset.
fn secret_from(value: &str) -> Option<Secret<String>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Secret::new(trimmed.to_string()))
    }
}
