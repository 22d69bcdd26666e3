//! Axum route definitions for the inventory API.

use crate::api::handlers::{self, InventoryApiState};
use crate::service::InventoryService;
use crate::store::InstrumentStore;
use axum::routing::{get, patch};
use axum::Router;
use std::sync::Arc;

/// Create all inventory routes.
///
/// # Routes
///
/// - `POST /api/v1/instruments` - Register an instrument (201)
/// - `GET /api/v1/instruments` - List every instrument
/// - `GET /api/v1/instruments/:name` - Get by name
/// - `DELETE /api/v1/instruments/:id` - Delete by id (204)
/// - `PATCH /api/v1/instruments/:id/increment` - Add stock
/// - `PATCH /api/v1/instruments/:id/decrement` - Remove stock
///
/// GET and DELETE share one path segment: it is read as a name for GET and
/// as an id for DELETE.
pub fn inventory_routes<S: InstrumentStore + ?Sized + 'static>(
    service: Arc<InventoryService<S>>,
) -> Router {
    let state = Arc::new(InventoryApiState::new(service));

    Router::new()
        .route(
            "/api/v1/instruments",
            get(handlers::list_instruments::<S>).post(handlers::create_instrument::<S>),
        )
        .route(
            "/api/v1/instruments/:key",
            get(handlers::get_instrument_by_name::<S>).delete(handlers::delete_instrument::<S>),
        )
        .route(
            "/api/v1/instruments/:key/increment",
            patch(handlers::increment_stock::<S>),
        )
        .route(
            "/api/v1/instruments/:key/decrement",
            patch(handlers::decrement_stock::<S>),
        )
        .with_state(state)
}
