//! HTTP API for the instrument inventory.
//!
//! ## Modules
//!
//! - `handlers` - Axum handlers and the error-to-status mapping
//! - `routes` - Router for `/api/v1/instruments`
//! - `models` - Request/response types

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::InventoryApiState;
pub use routes::inventory_routes;
