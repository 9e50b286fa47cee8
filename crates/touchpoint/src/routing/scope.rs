use std::error::Error;

use axum::http::HeaderMap;
use tracing::{debug, error, info};

/// Header carrying the caller's correlation id, echoed on every log line for the request.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Per-request logging context threaded through resolvers and the fault mapper.
pub trait LogScope: Send + Sync {
    fn enter_method(&self, name: &str);
    fn exit_method(&self, name: &str);
    fn information(&self, message: &str);
    fn exception_detail(&self, error: &(dyn Error + 'static));
}

/// `tracing`-backed scope tagging each event with the request's correlation id.
#[derive(Debug, Clone)]
pub struct TracingScope {
    correlation_id: String,
}

impl TracingScope {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    /// Uses the caller's correlation header when present, otherwise a fresh UUID.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let correlation_id = headers
            .get(CORRELATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self { correlation_id }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

impl LogScope for TracingScope {
    fn enter_method(&self, name: &str) {
        debug!(correlation_id = %self.correlation_id, method = name, "entering method");
    }

    fn exit_method(&self, name: &str) {
        debug!(correlation_id = %self.correlation_id, method = name, "exiting method");
    }

    fn information(&self, message: &str) {
        info!(correlation_id = %self.correlation_id, "{message}");
    }

    fn exception_detail(&self, err: &(dyn Error + 'static)) {
        error!(correlation_id = %self.correlation_id, error = ?err, "unhandled fault: {err}");
    }
}
