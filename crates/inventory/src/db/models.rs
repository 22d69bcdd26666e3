//! Database row model for instruments.
//!
//! Maps the `instruments` table to and from the domain types in `crate::types`.

use crate::error::InventoryError;
use crate::types::{Instrument, InstrumentId, InstrumentType};
use sqlx::FromRow;

/// Column list shared by every SELECT and RETURNING clause.
pub const INSTRUMENT_COLUMNS: &str =
    "id, name, brand, max_stock, min_stock, quantity, instrument_type";

/// Database row for an instrument.
#[derive(Debug, Clone, FromRow)]
pub struct InstrumentRow {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub max_stock: i32,
    pub min_stock: i32,
    pub quantity: i32,
    pub instrument_type: String,
}

impl From<&Instrument> for InstrumentRow {
    fn from(instrument: &Instrument) -> Self {
        Self {
            id: instrument.id.value(),
            name: instrument.name.clone(),
            brand: instrument.brand.clone(),
            max_stock: instrument.max,
            min_stock: instrument.min,
            quantity: instrument.quantity,
            instrument_type: instrument.instrument_type.as_db_str().to_string(),
        }
    }
}

impl TryFrom<InstrumentRow> for Instrument {
    type Error = InventoryError;

    fn try_from(row: InstrumentRow) -> Result<Self, Self::Error> {
        let instrument_type = InstrumentType::from_db_str(&row.instrument_type).ok_or_else(|| {
            InventoryError::Storage(format!(
                "Unknown instrument type '{}' in row {}",
                row.instrument_type, row.id
            ))
        })?;

        Ok(Instrument {
            id: InstrumentId::new(row.id),
            name: row.name,
            brand: row.brand,
            max: row.max_stock,
            min: row.min_stock,
            quantity: row.quantity,
            instrument_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn row() -> InstrumentRow {
        InstrumentRow {
            id: 3,
            name: "Roland TD-17".to_string(),
            brand: "Roland".to_string(),
            max_stock: 20,
            min_stock: 2,
            quantity: 5,
            instrument_type: "DRUM".to_string(),
        }
    }

    #[test]
    fn test_row_to_domain() {
        let instrument = Instrument::try_from(row()).unwrap();
        assert_eq!(instrument.id, InstrumentId::new(3));
        assert_eq!(instrument.max, 20);
        assert_eq!(instrument.min, 2);
        assert_eq!(instrument.instrument_type, InstrumentType::Drum);

        let back = InstrumentRow::from(&instrument);
        assert_eq!(back.max_stock, 20);
        assert_eq!(back.instrument_type, "DRUM");
    }

    #[test]
    fn test_row_with_unknown_type() {
        let mut bad = row();
        bad.instrument_type = "KAZOO".to_string();
        assert_matches!(Instrument::try_from(bad), Err(InventoryError::Storage(_)));
    }
}
