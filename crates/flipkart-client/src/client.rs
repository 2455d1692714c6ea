//! Single-attempt OTP delivery against the Flipkart login API.

use crate::headers::{browser_headers, ForwardedAddr};
use crate::types::{
    ActionRequest, Delivery, DeliveryOutcome, PhoneNumber, RejectionReason, EXCERPT_MAX_CHARS,
};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Production endpoint for the login-identity action.
pub const DEFAULT_API_URL: &str = "https://2.rome.api.flipkart.com";

/// Default bound on the outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header pair that carries the forwarded address when decoration is on.
pub const FORWARDED_HEADERS: [&str; 2] = ["x-forwarded-for", "client-ip"];

const ACTION_VIEW_PATH: &str = "/1/action/view";

/// Client for the Flipkart login-identity API.
///
/// Issues exactly one POST per [`send_otp`](Self::send_otp) call. There is
/// deliberately no retry of any kind in this crate: the call triggers an SMS
/// against a live account, so repeating it is a caller-visible decision,
/// never an internal one.
#[derive(Clone)]
pub struct FlipkartClient {
    client: Client,
    base_url: String,
    forwarded: Arc<dyn ForwardedAddr>,
}

impl FlipkartClient {
    /// Create a new client.
    ///
    /// `base_url` is overridable so tests can point at a stub server;
    /// `timeout` bounds the whole call including the response body.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        forwarded: Arc<dyn ForwardedAddr>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            forwarded,
        })
    }

    /// Trigger one OTP for `phone`.
    ///
    /// Exactly one HTTP request leaves this function regardless of what
    /// comes back; every possible result maps onto a [`DeliveryOutcome`].
    #[instrument(skip(self), fields(phone = %phone))]
    pub async fn send_otp(&self, phone: &PhoneNumber) -> Delivery {
        let payload = ActionRequest::otp_for(phone);
        let ip_used = self.forwarded.next_addr();

        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, ACTION_VIEW_PATH))
            .json(&payload);

        if let Some(addr) = &ip_used {
            for name in FORWARDED_HEADERS {
                request = request.header(name, addr.as_str());
            }
        }

        debug!("Sending OTP trigger");

        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => classify(status, &body),
                    Err(e) => transport_outcome(e),
                }
            }
            Err(e) => transport_outcome(e),
        };

        if outcome.is_delivered() {
            debug!("OTP delivered");
        } else {
            warn!(outcome = %outcome.label(), "Delivery not confirmed");
        }

        Delivery { outcome, ip_used }
    }
}

/// Classify an upstream response.
///
/// Total over every (status, body) pair. Parse failures keep a bounded
/// excerpt of the raw body, never the whole thing; a 200 without the
/// `STATUS: SUCCESS` marker counts as a rejection, not a delivery.
pub fn classify(status: StatusCode, body: &str) -> DeliveryOutcome {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return DeliveryOutcome::Invalid {
                status: status.as_u16(),
                excerpt: body.chars().take(EXCERPT_MAX_CHARS).collect(),
            }
        }
    };

    if status == StatusCode::OK {
        if parsed.get("STATUS").and_then(|v| v.as_str()) == Some("SUCCESS") {
            return DeliveryOutcome::Delivered {
                status: status.as_u16(),
                response: parsed,
            };
        }

        let reason = match parsed.get("error").and_then(|v| v.as_str()) {
            Some(message) => RejectionReason::UpstreamError(message.to_string()),
            None => RejectionReason::Unclear,
        };

        return DeliveryOutcome::Rejected {
            status: status.as_u16(),
            reason,
            response: parsed,
        };
    }

    let reason = match status {
        StatusCode::TOO_MANY_REQUESTS => RejectionReason::RateLimited,
        StatusCode::BAD_REQUEST => RejectionReason::BadRequest,
        StatusCode::FORBIDDEN => RejectionReason::Forbidden,
        StatusCode::UNAUTHORIZED => RejectionReason::Unauthorized,
        other => RejectionReason::UnexpectedStatus(other.as_u16()),
    };

    DeliveryOutcome::Rejected {
        status: status.as_u16(),
        reason,
        response: parsed,
    }
}

/// Map a transport-level failure onto an outcome.
fn transport_outcome(err: reqwest::Error) -> DeliveryOutcome {
    if err.is_timeout() {
        DeliveryOutcome::TimedOut
    } else {
        DeliveryOutcome::Unreachable {
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_delivered() {
        let outcome = classify(StatusCode::OK, r#"{"STATUS":"SUCCESS"}"#);
        assert_eq!(
            outcome,
            DeliveryOutcome::Delivered {
                status: 200,
                response: json!({"STATUS": "SUCCESS"}),
            }
        );
    }

    #[test]
    fn test_classify_ok_with_error_field() {
        let outcome = classify(StatusCode::OK, r#"{"error":"Account locked"}"#);
        assert_eq!(
            outcome,
            DeliveryOutcome::Rejected {
                status: 200,
                reason: RejectionReason::UpstreamError("Account locked".into()),
                response: json!({"error": "Account locked"}),
            }
        );
    }

    #[test]
    fn test_classify_ok_without_marker() {
        // A 200 that confirms nothing is a rejection, not a delivery.
        let outcome = classify(StatusCode::OK, r#"{"STATUS":"PENDING"}"#);
        assert!(matches!(
            outcome,
            DeliveryOutcome::Rejected {
                status: 200,
                reason: RejectionReason::Unclear,
                ..
            }
        ));
    }

    #[test]
    fn test_classify_known_statuses() {
        let cases = [
            (StatusCode::TOO_MANY_REQUESTS, RejectionReason::RateLimited),
            (StatusCode::BAD_REQUEST, RejectionReason::BadRequest),
            (StatusCode::FORBIDDEN, RejectionReason::Forbidden),
            (StatusCode::UNAUTHORIZED, RejectionReason::Unauthorized),
        ];

        for (status, expected) in cases {
            match classify(status, "{}") {
                DeliveryOutcome::Rejected { reason, .. } => assert_eq!(reason, expected),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[test]
    fn test_classify_unexpected_status() {
        match classify(StatusCode::SERVICE_UNAVAILABLE, "{}") {
            DeliveryOutcome::Rejected { status, reason, .. } => {
                assert_eq!(status, 503);
                assert_eq!(reason, RejectionReason::UnexpectedStatus(503));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_json_keeps_bounded_excerpt() {
        let body = "<!DOCTYPE html>".repeat(40);
        match classify(StatusCode::OK, &body) {
            DeliveryOutcome::Invalid { status, excerpt } => {
                assert_eq!(status, 200);
                assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS);
                assert!(body.starts_with(&excerpt));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_classify_excerpt_respects_char_boundaries() {
        // Multi-byte input must not split a code point.
        let body = "\u{30c6}".repeat(300);
        match classify(StatusCode::BAD_GATEWAY, &body) {
            DeliveryOutcome::Invalid { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_json_short_body() {
        match classify(StatusCode::OK, "nope") {
            DeliveryOutcome::Invalid { excerpt, .. } => assert_eq!(excerpt, "nope"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
