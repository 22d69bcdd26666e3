//! API request/response models.

use crate::error::{InventoryError, InventoryResult};
use crate::types::{Instrument, InstrumentType, NewInstrument};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/instruments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInstrumentRequest {
    pub name: String,
    pub brand: String,
    pub max: i32,
    pub min: i32,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub instrument_type: String,
}

impl TryFrom<CreateInstrumentRequest> for NewInstrument {
    type Error = InventoryError;

    fn try_from(req: CreateInstrumentRequest) -> InventoryResult<Self> {
        let instrument_type = InstrumentType::from_db_str(&req.instrument_type).ok_or_else(|| {
            InventoryError::Validation(format!("unknown instrument type: {}", req.instrument_type))
        })?;

        Ok(NewInstrument {
            name: req.name,
            brand: req.brand,
            max: req.max,
            min: req.min,
            quantity: req.quantity,
            instrument_type,
        })
    }
}

/// Body of the increment/decrement endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i32,
}

/// Single instrument in API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub max: i32,
    pub min: i32,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub instrument_type: String,
}

impl From<&Instrument> for InstrumentResponse {
    fn from(i: &Instrument) -> Self {
        Self {
            id: i.id.value(),
            name: i.name.clone(),
            brand: i.brand.clone(),
            max: i.max,
            min: i.min,
            quantity: i.quantity,
            instrument_type: i.instrument_type.as_db_str().to_string(),
        }
    }
}

/// Response wrapping one instrument.
#[derive(Debug, Serialize, Deserialize)]
pub struct InstrumentEnvelope {
    pub success: bool,
    pub instrument: InstrumentResponse,
}

impl From<&Instrument> for InstrumentEnvelope {
    fn from(i: &Instrument) -> Self {
        Self {
            success: true,
            instrument: i.into(),
        }
    }
}

/// Response for listing instruments.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListInstrumentsResponse {
    pub success: bool,
    pub total_count: usize,
    pub instruments: Vec<InstrumentResponse>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl From<&InventoryError> for ErrorResponse {
    fn from(err: &InventoryError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            code: err.kind().to_string(),
        }
    }
}
