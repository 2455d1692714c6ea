//! HTTP request handlers.

use super::types::{
    DeliveryDetails, HealthResponse, NotFoundResponse, ServiceInfo, SpamParams, SpamResponse,
    UsageInfo, SPAM_USAGE,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use flipkart_client::{DeliveryOutcome, PhoneNumber};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Service descriptor.
pub async fn home() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "active",
        message: "Flipkart OTP relay is running",
        usage: UsageInfo {
            method: "GET",
            url: SPAM_USAGE,
            example: "https://otp-relay.example.com/spam?number=9876543210",
        },
    })
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    let mut endpoints = BTreeMap::new();
    endpoints.insert("/", "GET - service info");
    endpoints.insert("/health", "GET - health check");
    endpoints.insert(SPAM_USAGE, "GET - send OTP");

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        endpoints,
    })
}

/// Relay one OTP trigger for the number in the query string.
pub async fn send_otp(
    State(state): State<AppState>,
    query: Result<Query<SpamParams>, QueryRejection>,
) -> Result<(StatusCode, Json<SpamResponse>), ApiError> {
    let Query(params) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let phone = PhoneNumber::parse(params.number.as_deref().unwrap_or(""))?;
    info!(phone = %phone, "OTP relay requested");

    let delivery = state.client.send_otp(&phone).await;

    if delivery.outcome.is_delivered() {
        info!(phone = %phone, "OTP delivered");
    } else {
        warn!(phone = %phone, status = %delivery.outcome.label(), "OTP not delivered");
    }

    Ok((
        outcome_status(&delivery.outcome),
        Json(SpamResponse {
            success: delivery.outcome.is_delivered(),
            timestamp: Utc::now().to_rfc3339(),
            phone: phone.e164(),
            message: delivery.outcome.message(),
            details: DeliveryDetails::from_delivery(&delivery),
        }),
    ))
}

/// JSON fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            error: "Route not found",
            timestamp: Utc::now().to_rfc3339(),
            available_routes: vec!["/", "/health", SPAM_USAGE],
        }),
    )
}

/// Inbound status for a classified delivery outcome.
///
/// Rejections mirror whatever status the upstream answered with, so a caller
/// sees 429 when Flipkart rate-limits us. Everything the upstream never
/// answered maps onto the gateway statuses.
fn outcome_status(outcome: &DeliveryOutcome) -> StatusCode {
    match outcome {
        DeliveryOutcome::Delivered { .. } => StatusCode::OK,
        DeliveryOutcome::Rejected { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        DeliveryOutcome::Invalid { .. } => StatusCode::BAD_GATEWAY,
        DeliveryOutcome::TimedOut | DeliveryOutcome::Unreachable { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
