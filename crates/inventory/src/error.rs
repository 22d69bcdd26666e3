//! Error types for the inventory crate.

use crate::types::InstrumentId;
use std::fmt;
use thiserror::Error;

/// Result type alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// How a missing instrument was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentRef {
    Name(String),
    Id(InstrumentId),
}

impl fmt::Display for InstrumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentRef::Name(name) => write!(f, "name {}", name),
            InstrumentRef::Id(id) => write!(f, "id {}", id),
        }
    }
}

/// Errors that can occur in inventory operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// An instrument with this name already exists.
    #[error("Instrument with name {0} already registered in the system.")]
    AlreadyRegistered(String),

    /// Instrument not found.
    #[error("Instrument with {0} not found in the system.")]
    NotFound(InstrumentRef),

    /// Increment would push quantity above max.
    #[error("Instruments with {id} ID to increment informed exceeds the max stock capacity: {delta}")]
    StockExceeded { id: InstrumentId, delta: i32 },

    /// Decrement would push quantity below min.
    #[error("Instruments with {id} ID to decrement informed exceeds the min stock capacity: {delta}")]
    NegativeStockExceeded { id: InstrumentId, delta: i32 },

    /// Candidate or request field failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InventoryError {
    /// Not found by name.
    pub fn name_not_found(name: impl Into<String>) -> Self {
        InventoryError::NotFound(InstrumentRef::Name(name.into()))
    }

    /// Not found by id.
    pub fn id_not_found(id: InstrumentId) -> Self {
        InventoryError::NotFound(InstrumentRef::Id(id))
    }

    /// Stable machine-readable code, used in API error bodies and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryError::AlreadyRegistered(_) => "already_registered",
            InventoryError::NotFound(_) => "not_found",
            InventoryError::StockExceeded { .. } => "stock_exceeded",
            InventoryError::NegativeStockExceeded { .. } => "negative_stock_exceeded",
            InventoryError::Validation(_) => "validation",
            InventoryError::Storage(_) => "storage",
            InventoryError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InventoryError::AlreadyRegistered("Slash Lespaul".to_string()).to_string(),
            "Instrument with name Slash Lespaul already registered in the system."
        );
        assert_eq!(
            InventoryError::id_not_found(InstrumentId::new(3)).to_string(),
            "Instrument with id 3 not found in the system."
        );
        assert_eq!(
            InventoryError::name_not_found("Fender").to_string(),
            "Instrument with name Fender not found in the system."
        );
        assert_eq!(
            InventoryError::StockExceeded {
                id: InstrumentId::new(3),
                delta: 45
            }
            .to_string(),
            "Instruments with 3 ID to increment informed exceeds the max stock capacity: 45"
        );
        assert_eq!(
            InventoryError::NegativeStockExceeded {
                id: InstrumentId::new(3),
                delta: 19
            }
            .to_string(),
            "Instruments with 3 ID to decrement informed exceeds the min stock capacity: 19"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(InventoryError::name_not_found("x").kind(), "not_found");
        assert_eq!(InventoryError::Storage("down".into()).kind(), "storage");
        assert_eq!(
            InventoryError::StockExceeded {
                id: InstrumentId::new(1),
                delta: 1
            }
            .kind(),
            "stock_exceeded"
        );
    }
}
