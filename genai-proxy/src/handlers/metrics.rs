use crate::services::metrics::render_metrics;
use service_core::error::AppError;

pub async fn metrics() -> Result<String, AppError> {
    render_metrics().ok_or(AppError::ServiceUnavailable)
}
