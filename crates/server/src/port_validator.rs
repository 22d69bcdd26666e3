//! Port validation utilities
//!
//! Checking a port before binding races with other processes; the bind in
//! [`HttpServer::run`](crate::HttpServer) remains the source of truth. These
//! checks exist for early, readable startup failures.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Fail fast when the configured HTTP port is already taken.
pub async fn validate_ports_available(config: &ServerConfig) -> Result<()> {
    validate_port_range(config.http_port)?;

    let addr = format!("{}:{}", config.host, config.http_port);
    debug!("Checking HTTP port {}", config.http_port);

    match TcpListener::bind(&addr).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(addr.clone(), e))?;
            drop(listener);

            info!("HTTP port {} is available ({})", config.http_port, local_addr);
            Ok(())
        }
        Err(e) => {
            error!("HTTP port {} is NOT available: {}", config.http_port, e);
            Err(ServerError::port_in_use(config.http_port, e.to_string()))
        }
    }
}

/// Reject port 0 for explicit binding and warn about privileged ports.
pub fn validate_port_range(port: u16) -> Result<()> {
    if port == 0 {
        return Err(ServerError::InvalidPort(port));
    }
    if port < 1024 {
        warn!(
            "Port {} is a privileged port (requires root/admin privileges)",
            port
        );
    }
    Ok(())
}
