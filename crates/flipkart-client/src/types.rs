//! Domain and wire types for the Flipkart login API.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Country code prefix the upstream expects alongside the bare digits.
pub const COUNTRY_PREFIX: &str = "+91";

/// Upper bound on the raw-body excerpt kept when a response is not JSON.
///
/// Diagnostics only ever retain this many characters, never the full body.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// A validated 10-digit mobile number.
///
/// Construction goes through [`PhoneNumber::parse`], so every value of this
/// type has already passed validation and the client never sees raw input.
/// The value lives for the duration of one request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

/// Why an input string is not a usable phone number.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Phone number is required")]
    Missing,

    #[error("Phone number must contain only digits")]
    NonNumeric { provided: String },

    #[error("Phone number must be 10 digits")]
    WrongLength { provided: String },
}

impl ValidationError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Missing => "MISSING_NUMBER",
            ValidationError::NonNumeric { .. } => "NON_NUMERIC",
            ValidationError::WrongLength { .. } => "WRONG_LENGTH",
        }
    }

    /// The rejected input, where there was one to echo back.
    pub fn provided(&self) -> Option<&str> {
        match self {
            ValidationError::Missing => None,
            ValidationError::NonNumeric { provided }
            | ValidationError::WrongLength { provided } => Some(provided),
        }
    }
}

impl PhoneNumber {
    /// Parse user input into a phone number.
    ///
    /// Trims surrounding whitespace and accepts exactly 10 ASCII digits;
    /// nothing else is normalized. Checks run in order: empty input reports
    /// `Missing`, any non-digit reports `NonNumeric`, and only all-digit
    /// input of the wrong size reports `WrongLength`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Missing);
        }

        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::NonNumeric {
                provided: trimmed.to_string(),
            });
        }

        if trimmed.len() != 10 {
            return Err(ValidationError::WrongLength {
                provided: trimmed.to_string(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The bare 10 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number in E.164 form (e.g., "+919876543210").
    pub fn e164(&self) -> String {
        format!("{}{}", COUNTRY_PREFIX, self.0)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire payload for the login-identity action.
#[derive(Debug, Serialize)]
pub struct ActionRequest {
    #[serde(rename = "actionRequestContext")]
    pub context: ActionRequestContext,
}

/// The action descriptor itself. Everything except `login_id` is a fixed
/// constant of the upstream contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequestContext {
    #[serde(rename = "type")]
    pub kind: String,
    pub login_id_prefix: String,
    pub login_id: String,
    pub client_query_param_map: ClientQueryParams,
    pub login_type: String,
    pub verification_type: String,
    pub screen_name: String,
    pub source_context: String,
}

#[derive(Debug, Serialize)]
pub struct ClientQueryParams {
    pub ret: String,
}

impl ActionRequest {
    /// Build the OTP trigger payload for a validated number.
    pub fn otp_for(phone: &PhoneNumber) -> Self {
        Self {
            context: ActionRequestContext {
                kind: "LOGIN_IDENTITY_VERIFY".into(),
                login_id_prefix: COUNTRY_PREFIX.into(),
                login_id: phone.as_str().into(),
                client_query_param_map: ClientQueryParams { ret: "/".into() },
                login_type: "MOBILE".into(),
                verification_type: "OTP".into(),
                screen_name: "LOGIN_V4_MOBILE".into(),
                source_context: "DEFAULT".into(),
            },
        }
    }
}

/// Why the upstream declined (or failed to confirm) a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    RateLimited,
    BadRequest,
    Forbidden,
    Unauthorized,
    UnexpectedStatus(u16),
    /// HTTP 200 carrying an explicit error field.
    UpstreamError(String),
    /// HTTP 200 with neither the success marker nor an error field.
    Unclear,
}

impl RejectionReason {
    /// Stable label used in response bodies.
    pub fn label(&self) -> String {
        match self {
            RejectionReason::RateLimited => "RATE_LIMITED".into(),
            RejectionReason::BadRequest => "BAD_REQUEST".into(),
            RejectionReason::Forbidden => "FORBIDDEN".into(),
            RejectionReason::Unauthorized => "UNAUTHORIZED".into(),
            RejectionReason::UnexpectedStatus(code) => format!("HTTP_{}", code),
            RejectionReason::UpstreamError(_) => "ERROR".into(),
            RejectionReason::Unclear => "UNKNOWN".into(),
        }
    }

    /// Human-readable message for the relay response.
    pub fn message(&self) -> String {
        match self {
            RejectionReason::RateLimited => "Too many requests".into(),
            RejectionReason::BadRequest => "Invalid request format".into(),
            RejectionReason::Forbidden => "Access denied".into(),
            RejectionReason::Unauthorized => "Authentication failed".into(),
            RejectionReason::UnexpectedStatus(code) => {
                format!("Unexpected status code: {}", code)
            }
            RejectionReason::UpstreamError(message) => message.clone(),
            RejectionReason::Unclear => "Response received but status unclear".into(),
        }
    }
}

/// What one delivery attempt did.
///
/// Total over everything the transport and the upstream can produce; there is
/// no "unknown" escape hatch beyond the variants listed here.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// Upstream answered HTTP 200 with the success marker.
    Delivered { status: u16, response: Value },
    /// Upstream was reachable and parseable but did not report success.
    Rejected {
        status: u16,
        reason: RejectionReason,
        response: Value,
    },
    /// Response body was not JSON. Keeps a bounded excerpt for diagnostics.
    Invalid { status: u16, excerpt: String },
    /// The request ran past the client timeout.
    TimedOut,
    /// Connection-level failure before any response arrived.
    Unreachable { detail: String },
}

impl DeliveryOutcome {
    /// True only for a confirmed delivery.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    /// Stable label for response bodies.
    pub fn label(&self) -> String {
        match self {
            DeliveryOutcome::Delivered { .. } => "SUCCESS".into(),
            DeliveryOutcome::Rejected { reason, .. } => reason.label(),
            DeliveryOutcome::Invalid { .. } => "INVALID_RESPONSE".into(),
            DeliveryOutcome::TimedOut => "TIMEOUT".into(),
            DeliveryOutcome::Unreachable { .. } => "CONNECTION_ERROR".into(),
        }
    }

    /// Human-readable message for the relay response.
    pub fn message(&self) -> String {
        match self {
            DeliveryOutcome::Delivered { .. } => "OTP sent successfully".into(),
            DeliveryOutcome::Rejected { reason, .. } => reason.message(),
            DeliveryOutcome::Invalid { .. } => "Invalid JSON response from Flipkart".into(),
            DeliveryOutcome::TimedOut => "Request timed out".into(),
            DeliveryOutcome::Unreachable { .. } => "Failed to connect to Flipkart".into(),
        }
    }

    /// Upstream HTTP status, where one was observed.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            DeliveryOutcome::Delivered { status, .. }
            | DeliveryOutcome::Rejected { status, .. }
            | DeliveryOutcome::Invalid { status, .. } => Some(*status),
            DeliveryOutcome::TimedOut | DeliveryOutcome::Unreachable { .. } => None,
        }
    }
}

/// Result of [`send_otp`](crate::FlipkartClient::send_otp): the classified
/// outcome plus the forwarded address attached to the request, if any.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub outcome: DeliveryOutcome,
    pub ip_used: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_ten_digits() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
        assert_eq!(phone.e164(), "+919876543210");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let phone = PhoneNumber::parse("  9876543210\n").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(ValidationError::Missing));
        assert_eq!(PhoneNumber::parse("   "), Err(ValidationError::Missing));
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        // Mixed input reports the non-digit rule, not the length rule.
        assert_eq!(
            PhoneNumber::parse("98765abcde"),
            Err(ValidationError::NonNumeric {
                provided: "98765abcde".into()
            })
        );
        assert_eq!(
            PhoneNumber::parse("+919876543210"),
            Err(ValidationError::NonNumeric {
                provided: "+919876543210".into()
            })
        );
        assert_eq!(
            PhoneNumber::parse("98765 43210"),
            Err(ValidationError::NonNumeric {
                provided: "98765 43210".into()
            })
        );
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            PhoneNumber::parse("98765"),
            Err(ValidationError::WrongLength {
                provided: "98765".into()
            })
        );
        assert_eq!(
            PhoneNumber::parse("98765432100"),
            Err(ValidationError::WrongLength {
                provided: "98765432100".into()
            })
        );
    }

    #[test]
    fn test_validation_error_codes() {
        assert_eq!(ValidationError::Missing.code(), "MISSING_NUMBER");
        assert_eq!(
            ValidationError::NonNumeric {
                provided: "x".into()
            }
            .code(),
            "NON_NUMERIC"
        );
        assert_eq!(
            ValidationError::WrongLength {
                provided: "1".into()
            }
            .code(),
            "WRONG_LENGTH"
        );
        assert_eq!(ValidationError::Missing.provided(), None);
    }

    #[test]
    fn test_payload_shape() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        let payload = serde_json::to_value(ActionRequest::otp_for(&phone)).unwrap();

        assert_eq!(
            payload,
            serde_json::json!({
                "actionRequestContext": {
                    "type": "LOGIN_IDENTITY_VERIFY",
                    "loginIdPrefix": "+91",
                    "loginId": "9876543210",
                    "clientQueryParamMap": { "ret": "/" },
                    "loginType": "MOBILE",
                    "verificationType": "OTP",
                    "screenName": "LOGIN_V4_MOBILE",
                    "sourceContext": "DEFAULT"
                }
            })
        );
    }

    #[test]
    fn test_rejection_labels_and_messages() {
        assert_eq!(RejectionReason::RateLimited.label(), "RATE_LIMITED");
        assert_eq!(RejectionReason::RateLimited.message(), "Too many requests");
        assert_eq!(RejectionReason::UnexpectedStatus(503).label(), "HTTP_503");
        assert_eq!(
            RejectionReason::UnexpectedStatus(503).message(),
            "Unexpected status code: 503"
        );
        assert_eq!(
            RejectionReason::UpstreamError("account locked".into()).message(),
            "account locked"
        );
        assert_eq!(RejectionReason::Unclear.label(), "UNKNOWN");
    }

    #[test]
    fn test_outcome_helpers() {
        let delivered = DeliveryOutcome::Delivered {
            status: 200,
            response: serde_json::json!({"STATUS": "SUCCESS"}),
        };
        assert!(delivered.is_delivered());
        assert_eq!(delivered.label(), "SUCCESS");
        assert_eq!(delivered.upstream_status(), Some(200));

        assert!(!DeliveryOutcome::TimedOut.is_delivered());
        assert_eq!(DeliveryOutcome::TimedOut.label(), "TIMEOUT");
        assert_eq!(DeliveryOutcome::TimedOut.upstream_status(), None);
    }
}
