//! Client for Flipkart's mobile-login OTP trigger.
//!
//! One call, one request: [`FlipkartClient::send_otp`] issues a single POST
//! against the login-identity endpoint and classifies whatever comes back.
//! Repeating a call is always the caller's explicit decision; this crate
//! never retries on its own.

mod client;
mod headers;
mod types;

pub use client::{classify, FlipkartClient, DEFAULT_API_URL, DEFAULT_TIMEOUT, FORWARDED_HEADERS};
pub use headers::{browser_headers, FixedAddr, ForwardedAddr, NoAddr, RandomAddr};
pub use types::{
    ActionRequest, Delivery, DeliveryOutcome, PhoneNumber, RejectionReason, ValidationError,
    COUNTRY_PREFIX, EXCERPT_MAX_CHARS,
};
