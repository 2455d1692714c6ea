//! Browser-impersonation headers and forwarded-address decoration.

use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER,
    USER_AGENT,
};

const UA: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/122.0.0.0 Mobile Safari/537.36";

/// The fixed header set the upstream expects from a mobile-browser login.
///
/// Part of the (opaque) upstream contract; nothing in classification depends
/// on these values.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("authority"),
        HeaderValue::from_static("2.rome.api.flipkart.com"),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-IN,en-GB;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.flipkart.com"));
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://www.flipkart.com/"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(
            "\"Chromium\";v=\"122\", \"Not(A:Brand\";v=\"24\", \"Google Chrome\";v=\"122\"",
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Android\""),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-site"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(UA));
    headers.insert(
        HeaderName::from_static("x-user-agent"),
        HeaderValue::from_static(
            "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/122.0.0.0 Mobile Safari/537.36 FKUA/msite/0.0.3/msite/Mobile",
        ),
    );
    headers
}

/// Strategy for the forwarded-address headers attached to each outbound call.
///
/// Purely cosmetic: the address changes how the request looks, never how the
/// outcome is classified. The client writes the produced value into both
/// forwarding headers (see [`FORWARDED_HEADERS`](crate::FORWARDED_HEADERS)).
pub trait ForwardedAddr: Send + Sync {
    /// The address to advertise on this call, or `None` to leave the headers
    /// untouched.
    fn next_addr(&self) -> Option<String>;
}

/// No decoration. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAddr;

impl ForwardedAddr for NoAddr {
    fn next_addr(&self) -> Option<String> {
        None
    }
}

/// A fresh random IPv4 per call, each octet in 1..=255.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAddr;

impl ForwardedAddr for RandomAddr {
    fn next_addr(&self) -> Option<String> {
        let mut rng = rand::thread_rng();
        Some(format!(
            "{}.{}.{}.{}",
            rng.gen_range(1..=255),
            rng.gen_range(1..=255),
            rng.gen_range(1..=255),
            rng.gen_range(1..=255),
        ))
    }
}

/// Always the same address. Lets tests pin decorated requests down.
#[derive(Debug, Clone)]
pub struct FixedAddr(pub String);

impl ForwardedAddr for FixedAddr {
    fn next_addr(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
