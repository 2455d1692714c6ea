//! HTTP relay for Flipkart's mobile-login OTP trigger.
//!
//! A thin service over [`flipkart_client`]: validate the 10-digit number in
//! the query string, relay exactly one OTP trigger upstream, and report the
//! classified outcome as JSON. No queues, no persistence, no retries.

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ApiError;
