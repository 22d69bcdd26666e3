//! # Inventory Crate
//!
//! Musical instrument inventory for Musical Market: what is in stock, and the
//! rules governing how stock may change.
//!
//! ## Key Components
//!
//! - **Domain Types**: `Instrument`, `NewInstrument`, `InstrumentType`, `InstrumentId`
//! - **Rules**: pure stock decisions (`evaluate_increment`, `evaluate_decrement`, field validation)
//! - **Service**: `InventoryService`, which re-reads, decides and writes
//! - **Storage**: `InstrumentStore` trait with in-memory and PostgreSQL implementations
//! - **API**: axum handlers for `/api/v1/instruments`
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ API (axum)          /api/v1/instruments      │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │ InventoryService     per-id serialization    │──► rules (pure)
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │ InstrumentStore                              │
//! │  InMemoryInstrumentStore │ PostgresInstrumentStore │
//! └──────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod rules;
pub mod service;
pub mod store;
pub mod types;

#[cfg(feature = "postgres")]
pub mod db;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for convenience
pub use error::{InstrumentRef, InventoryError, InventoryResult};
pub use rules::InventoryLimits;
pub use service::InventoryService;
pub use store::{InMemoryInstrumentStore, InstrumentStore};
pub use types::{Instrument, InstrumentId, InstrumentType, NewInstrument};

#[cfg(feature = "postgres")]
pub use db::PostgresInstrumentStore;

#[cfg(feature = "api")]
pub use api::inventory_routes;
