//! HTTP server infrastructure for the Musical Market service
//!
//! [`HttpServer`] implements the [`Server`] trait and is stopped through a
//! `tokio_util::sync::CancellationToken`. [`ServerExt::run_with_ctrl_c`]
//! wires that token to SIGINT/SIGTERM.
//!
//! ```ignore
//! use server::{health_routes, HealthState, HttpServer, ServerConfig, ServerExt};
//!
//! let router = api_router.merge(health_routes(Arc::new(HealthState::new("market", "1.0.0"))));
//! HttpServer::new(ServerConfig::new("0.0.0.0", 8080), router)
//!     .run_with_ctrl_c()
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod port_validator;
pub mod shutdown;
pub mod traits;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{health_routes, HealthState, HealthStatus};
pub use http::HttpServer;
pub use port_validator::validate_ports_available;
pub use shutdown::signal_token;
pub use traits::{Server, ServerExt};
