//! HTTP API for the OTP relay.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use axum::{middleware as axum_middleware, routing::get, Router};
use flipkart_client::FlipkartClient;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Deliberately small: one upstream client behind an `Arc`, nothing mutable.
/// Handlers keep no state between requests.
#[derive(Clone)]
pub struct AppState {
    /// Flipkart login API client
    pub client: Arc<FlipkartClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(client: FlipkartClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/spam", get(handlers::send_otp))
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
