//! Request, upstream, and response shapes for the proxy.

pub mod request;
pub mod response;
pub mod upstream;

pub use request::{AiKind, InboundRequest, ProxyRequest};
pub use response::{ErrorBody, ImageEnvelope, ProxyBody, ProxyResponse};
pub use upstream::{GenerateContentRequest, GenerateContentResponse};
