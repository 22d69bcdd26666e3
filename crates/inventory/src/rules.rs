//! Stock rules.
//!
//! Pure decision functions: they look at the current record and a requested
//! change and either return the new quantity or the reason the change is
//! illegal. Nothing here touches storage.

use crate::error::{InventoryError, InventoryResult};
use crate::types::{Instrument, InstrumentType, NewInstrument};

/// Field ceilings applied to new instruments and quantity requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLimits {
    pub name_max_length: usize,
    pub brand_max_length: usize,
    /// Highest `max` an instrument may declare.
    pub max_ceiling: i32,
    /// Highest quantity an instrument may be created with.
    pub initial_quantity_ceiling: i32,
    /// Largest single increment or decrement.
    pub max_delta: i32,
    /// Types accepted on creation.
    pub enabled_types: Vec<InstrumentType>,
}

impl Default for InventoryLimits {
    fn default() -> Self {
        Self {
            name_max_length: 200,
            brand_max_length: 200,
            max_ceiling: 500,
            initial_quantity_ceiling: 100,
            max_delta: 500,
            enabled_types: InstrumentType::ALL.to_vec(),
        }
    }
}

impl From<&config::InventoryConfig> for InventoryLimits {
    fn from(cfg: &config::InventoryConfig) -> Self {
        // Unknown names are reported by config validation; skip them here.
        let enabled_types = cfg
            .instrument_types
            .iter()
            .filter_map(|t| InstrumentType::from_db_str(t))
            .collect();

        Self {
            name_max_length: cfg.limits.name_max_length,
            brand_max_length: cfg.limits.brand_max_length,
            max_ceiling: cfg.limits.max_ceiling,
            initial_quantity_ceiling: cfg.limits.initial_quantity_ceiling,
            max_delta: cfg.limits.max_delta,
            enabled_types,
        }
    }
}

// A negative amount would move stock the other way past the checked bound.
fn ensure_non_negative(delta: i32) -> InventoryResult<()> {
    if delta < 0 {
        return Err(InventoryError::Validation(format!(
            "quantity must not be negative, got {}",
            delta
        )));
    }
    Ok(())
}

/// Decide the quantity after adding `delta` units.
///
/// Legal iff `quantity + delta <= max`; a zero delta leaves the quantity as is.
/// Overflow counts as exceeding.
pub fn evaluate_increment(current: &Instrument, delta: i32) -> InventoryResult<i32> {
    ensure_non_negative(delta)?;
    match current.quantity.checked_add(delta) {
        Some(candidate) if candidate <= current.max => Ok(candidate),
        _ => Err(InventoryError::StockExceeded {
            id: current.id,
            delta,
        }),
    }
}

/// Decide the quantity after removing `delta` units.
///
/// Legal iff `quantity - delta >= min`; a zero delta leaves the quantity as is.
/// Overflow counts as exceeding.
pub fn evaluate_decrement(current: &Instrument, delta: i32) -> InventoryResult<i32> {
    ensure_non_negative(delta)?;
    match current.quantity.checked_sub(delta) {
        Some(candidate) if candidate >= current.min => Ok(candidate),
        _ => Err(InventoryError::NegativeStockExceeded {
            id: current.id,
            delta,
        }),
    }
}

fn check_text(field: &str, value: &str, max_len: usize) -> InventoryResult<()> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(InventoryError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max_len {
        return Err(InventoryError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

/// Check the fields of a creation candidate.
pub fn validate_new(candidate: &NewInstrument, limits: &InventoryLimits) -> InventoryResult<()> {
    check_text("name", &candidate.name, limits.name_max_length)?;
    check_text("brand", &candidate.brand, limits.brand_max_length)?;

    if candidate.min < 0 {
        return Err(InventoryError::Validation(format!(
            "min must be at least 0, got {}",
            candidate.min
        )));
    }
    if candidate.max > limits.max_ceiling {
        return Err(InventoryError::Validation(format!(
            "max must be at most {}, got {}",
            limits.max_ceiling, candidate.max
        )));
    }
    if candidate.min > candidate.max {
        return Err(InventoryError::Validation(format!(
            "min ({}) must not exceed max ({})",
            candidate.min, candidate.max
        )));
    }
    if candidate.quantity > limits.initial_quantity_ceiling {
        return Err(InventoryError::Validation(format!(
            "quantity must be at most {}, got {}",
            limits.initial_quantity_ceiling, candidate.quantity
        )));
    }
    if candidate.quantity < candidate.min || candidate.quantity > candidate.max {
        return Err(InventoryError::Validation(format!(
            "quantity {} must lie within [{}, {}]",
            candidate.quantity, candidate.min, candidate.max
        )));
    }
    if !limits.enabled_types.contains(&candidate.instrument_type) {
        return Err(InventoryError::Validation(format!(
            "instrument type {} is not enabled",
            candidate.instrument_type
        )));
    }
    Ok(())
}

/// Check a requested increment/decrement amount: `1..=max_delta`.
pub fn validate_delta(delta: i32, limits: &InventoryLimits) -> InventoryResult<()> {
    if delta <= 0 {
        return Err(InventoryError::Validation(format!(
            "quantity must be positive, got {}",
            delta
        )));
    }
    if delta > limits.max_delta {
        return Err(InventoryError::Validation(format!(
            "quantity must be at most {}, got {}",
            limits.max_delta, delta
        )));
    }
    Ok(())
}
