//! Errors raised while binding or serving the HTTP listener

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("HTTP port {port} is taken: {reason}")]
    PortInUse { port: u16, reason: String },

    #[error("Could not bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("HTTP port {0} cannot be bound explicitly")]
    InvalidPort(u16),

    #[error("'{0}' is not a valid host:port address")]
    InvalidAddress(String),

    #[error("HTTP server stopped with an error: {0}")]
    Serve(#[source] io::Error),
}

impl ServerError {
    pub fn bind(address: impl Into<String>, source: io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn port_in_use(port: u16, reason: impl Into<String>) -> Self {
        Self::PortInUse {
            port,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_bind_error_keeps_source() {
        let err = ServerError::bind(
            "127.0.0.1:8080",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert_eq!(
            err.to_string(),
            "Could not bind 127.0.0.1:8080: address in use"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_port_messages() {
        assert_eq!(
            ServerError::port_in_use(8080, "refused").to_string(),
            "HTTP port 8080 is taken: refused"
        );
        assert_eq!(
            ServerError::InvalidPort(0).to_string(),
            "HTTP port 0 cannot be bound explicitly"
        );
    }
}
