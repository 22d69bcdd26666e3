//! Observability for Musical Market
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics
//! - HTTP request and inventory mutation metric helpers
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("musical-market", LogFormat::Pretty)?;
//!
//! // Optional
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, init_logging_with_level, LogFormat};
pub use metrics::{init_metrics, InventoryMetrics, MutationOutcome, ServerMetrics};
