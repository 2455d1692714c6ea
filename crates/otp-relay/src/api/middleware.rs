//! Request logging middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{debug, warn};

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}
