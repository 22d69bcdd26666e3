//! HTTP server configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;
use std::time::Duration;

/// Port the inventory API listens on when nothing else is configured.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Bind settings for [`HttpServer`](crate::HttpServer).
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8080);
/// assert_eq!(config.http_addr().unwrap().port(), 8080);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port; 0 asks the OS for an ephemeral port
    pub http_port: u16,
    /// Upper bound on the time spent handling a single request
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, http_port: u16) -> Self {
        Self {
            host: host.into(),
            http_port,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replace the configured port, e.g. from a `--http` override.
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.http_port);
        raw.parse().map_err(|_| ServerError::InvalidAddress(raw))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_HTTP_PORT)
    }
}

impl From<&::config::HttpServerConfig> for ServerConfig {
    fn from(cfg: &::config::HttpServerConfig) -> Self {
        Self::new(cfg.host.clone(), cfg.http_port)
            .with_request_timeout(Duration::from_secs(cfg.request_timeout_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_new() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig::new("not a host", 8080);
        assert!(matches!(
            config.http_addr(),
            Err(ServerError::InvalidAddress(addr)) if addr == "not a host:8080"
        ));
    }

    #[test]
    fn test_from_market_config() {
        let cfg = ::config::HttpServerConfig {
            host: "127.0.0.1".to_string(),
            http_port: 8181,
            request_timeout_seconds: 5,
        };

        let server = ServerConfig::from(&cfg).with_http_port(8282);
        assert_eq!(server.http_port, 8282);
        assert_eq!(server.request_timeout, Duration::from_secs(5));
    }
}
