//! Response bodies for the relay API.

use std::collections::BTreeMap;

use flipkart_client::{Delivery, DeliveryOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical example of the one interesting route.
pub const SPAM_USAGE: &str = "/spam?number=9876543210";

/// Query parameters accepted by `GET /spam`.
///
/// `number` stays optional at the extractor level so that an absent parameter
/// reaches validation (and its structured error body) instead of tripping a
/// framework rejection.
#[derive(Debug, Deserialize)]
pub struct SpamParams {
    pub number: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub message: &'static str,
    pub usage: UsageInfo,
}

#[derive(Debug, Serialize)]
pub struct UsageInfo {
    pub method: &'static str,
    pub url: &'static str,
    pub example: &'static str,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Body of `GET /spam` once a number has validated, success or not.
#[derive(Debug, Serialize)]
pub struct SpamResponse {
    pub success: bool,
    pub timestamp: String,
    pub phone: String,
    pub message: String,
    pub details: DeliveryDetails,
}

/// Classified upstream outcome, flattened for the caller.
///
/// Exactly one of `flipkart_response`, `response_excerpt`, and `error` is
/// populated per outcome; absent fields are omitted rather than nulled.
#[derive(Debug, Serialize)]
pub struct DeliveryDetails {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipkart_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_used: Option<String>,
}

impl DeliveryDetails {
    pub fn from_delivery(delivery: &Delivery) -> Self {
        let mut details = Self {
            status: delivery.outcome.label(),
            status_code: delivery.outcome.upstream_status(),
            flipkart_response: None,
            response_excerpt: None,
            error: None,
            ip_used: delivery.ip_used.clone(),
        };

        match &delivery.outcome {
            DeliveryOutcome::Delivered { response, .. }
            | DeliveryOutcome::Rejected { response, .. } => {
                details.flipkart_response = Some(response.clone());
            }
            DeliveryOutcome::Invalid { excerpt, .. } => {
                details.response_excerpt = Some(excerpt.clone());
            }
            DeliveryOutcome::TimedOut => {
                details.error = Some("timeout".to_string());
            }
            DeliveryOutcome::Unreachable { detail } => {
                details.error = Some(detail.clone());
            }
        }

        details
    }
}

/// Body of the JSON 404 fallback.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub success: bool,
    pub error: &'static str,
    pub timestamp: String,
    pub available_routes: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_for_delivered() {
        let delivery = Delivery {
            outcome: DeliveryOutcome::Delivered {
                status: 200,
                response: serde_json::json!({"STATUS": "SUCCESS"}),
            },
            ip_used: Some("203.0.113.7".into()),
        };

        let value = serde_json::to_value(DeliveryDetails::from_delivery(&delivery)).unwrap();
        assert_eq!(value["status"], "SUCCESS");
        assert_eq!(value["status_code"], 200);
        assert_eq!(value["flipkart_response"]["STATUS"], "SUCCESS");
        assert_eq!(value["ip_used"], "203.0.113.7");
        assert!(value.get("response_excerpt").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_details_for_timeout_omit_upstream_fields() {
        let delivery = Delivery {
            outcome: DeliveryOutcome::TimedOut,
            ip_used: None,
        };

        let value = serde_json::to_value(DeliveryDetails::from_delivery(&delivery)).unwrap();
        assert_eq!(value["status"], "TIMEOUT");
        assert!(value.get("status_code").is_none());
        assert!(value.get("flipkart_response").is_none());
        assert!(value.get("ip_used").is_none());
        assert_eq!(value["error"], "timeout");
    }

    #[test]
    fn test_details_for_invalid_body_keep_excerpt() {
        let delivery = Delivery {
            outcome: DeliveryOutcome::Invalid {
                status: 200,
                excerpt: "<html>captcha".into(),
            },
            ip_used: None,
        };

        let value = serde_json::to_value(DeliveryDetails::from_delivery(&delivery)).unwrap();
        assert_eq!(value["status"], "INVALID_RESPONSE");
        assert_eq!(value["status_code"], 200);
        assert_eq!(value["response_excerpt"], "<html>captcha");
    }
}
