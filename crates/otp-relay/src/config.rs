//! Configuration for the relay, loaded from environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream (Flipkart) configuration
    #[serde(default)]
    pub flipkart: FlipkartConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlipkartConfig {
    /// Upstream base URL. Overridable so a stub can stand in during tests.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bound on each outbound call.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Attach a random forwarded address to each outbound request.
    #[serde(default)]
    pub random_client_ip: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for FlipkartConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            random_client_ip: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    5000
}

fn default_api_url() -> String {
    flipkart_client::DEFAULT_API_URL.into()
}

fn default_timeout() -> Duration {
    flipkart_client::DEFAULT_TIMEOUT
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Keep values as strings; numbers are coerced on
                    // deserialization where the target type asks for them.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Deploy platforms hand us a bare PORT; it wins over SERVER__PORT.
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port.parse().context("PORT must be a port number")?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.listen_addr, "0.0.0.0");
        assert_eq!(server.port, 5000);

        let flipkart = FlipkartConfig::default();
        assert_eq!(flipkart.api_url, flipkart_client::DEFAULT_API_URL);
        assert_eq!(flipkart.timeout, Duration::from_secs(10));
        assert!(!flipkart.random_client_ip);

        assert_eq!(LogConfig::default().level, "info");
    }
}
