pub mod gemini;
pub mod metrics;
pub mod proxy;

pub use gemini::GeminiClient;
pub use proxy::ProxyService;
