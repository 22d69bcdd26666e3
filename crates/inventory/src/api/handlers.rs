//! HTTP request handlers for the inventory API.

use crate::api::models::*;
use crate::error::InventoryError;
use crate::rules;
use crate::service::InventoryService;
use crate::store::InstrumentStore;
use crate::types::{InstrumentId, NewInstrument};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::error;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared state for inventory API handlers.
pub struct InventoryApiState<S: InstrumentStore + ?Sized> {
    pub service: Arc<InventoryService<S>>,
}

impl<S: InstrumentStore + ?Sized> InventoryApiState<S> {
    pub fn new(service: Arc<InventoryService<S>>) -> Self {
        Self { service }
    }
}

/// HTTP status for an inventory error.
pub fn status_for(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
        InventoryError::AlreadyRegistered(_)
        | InventoryError::StockExceeded { .. }
        | InventoryError::NegativeStockExceeded { .. }
        | InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
        InventoryError::Storage(_) | InventoryError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Map an inventory error to a status code and JSON body.
pub fn error_response(err: InventoryError) -> ApiError {
    let status = status_for(&err);
    if status.is_server_error() {
        error!(error = %err, "Inventory request failed");
    }
    (status, Json(ErrorResponse::from(&err)))
}

fn bad_request(message: String) -> ApiError {
    error_response(InventoryError::Validation(message))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

fn id_param(id: Result<Path<i64>, PathRejection>) -> Result<InstrumentId, ApiError> {
    id.map(|Path(id)| InstrumentId::new(id))
        .map_err(|rejection| bad_request(rejection.body_text()))
}

/// POST /api/v1/instruments
pub async fn create_instrument<S: InstrumentStore + ?Sized + 'static>(
    State(state): State<Arc<InventoryApiState<S>>>,
    body: Result<Json<CreateInstrumentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = json_body(body)?;
    let candidate = NewInstrument::try_from(req).map_err(error_response)?;

    let created = state
        .service
        .create(candidate)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(InstrumentEnvelope::from(&created))))
}

/// GET /api/v1/instruments
pub async fn list_instruments<S: InstrumentStore + ?Sized + 'static>(
    State(state): State<Arc<InventoryApiState<S>>>,
) -> Result<Json<ListInstrumentsResponse>, ApiError> {
    let instruments = state.service.list_all().await.map_err(error_response)?;

    Ok(Json(ListInstrumentsResponse {
        success: true,
        total_count: instruments.len(),
        instruments: instruments.iter().map(InstrumentResponse::from).collect(),
    }))
}

/// GET /api/v1/instruments/{name}
pub async fn get_instrument_by_name<S: InstrumentStore + ?Sized + 'static>(
    State(state): State<Arc<InventoryApiState<S>>>,
    Path(name): Path<String>,
) -> Result<Json<InstrumentEnvelope>, ApiError> {
    let instrument = state
        .service
        .find_by_name(&name)
        .await
        .map_err(error_response)?;

    Ok(Json(InstrumentEnvelope::from(&instrument)))
}

/// DELETE /api/v1/instruments/{id}
pub async fn delete_instrument<S: InstrumentStore + ?Sized + 'static>(
    State(state): State<Arc<InventoryApiState<S>>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = id_param(id)?;
    state
        .service
        .delete_by_id(id)
        .await
        .map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/instruments/{id}/increment
pub async fn increment_stock<S: InstrumentStore + ?Sized + 'static>(
    State(state): State<Arc<InventoryApiState<S>>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> Result<Json<InstrumentEnvelope>, ApiError> {
    let id = id_param(id)?;
    let req = json_body(body)?;
    rules::validate_delta(req.quantity, state.service.limits()).map_err(error_response)?;

    let updated = state
        .service
        .increment(id, req.quantity)
        .await
        .map_err(error_response)?;

    Ok(Json(InstrumentEnvelope::from(&updated)))
}

/// PATCH /api/v1/instruments/{id}/decrement
pub async fn decrement_stock<S: InstrumentStore + ?Sized + 'static>(
    State(state): State<Arc<InventoryApiState<S>>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> Result<Json<InstrumentEnvelope>, ApiError> {
    let id = id_param(id)?;
    let req = json_body(body)?;
    rules::validate_delta(req.quantity, state.service.limits()).map_err(error_response)?;

    let updated = state
        .service
        .decrement(id, req.quantity)
        .await
        .map_err(error_response)?;

    Ok(Json(InstrumentEnvelope::from(&updated)))
}
