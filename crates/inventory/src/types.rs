//! Core domain types for the instrument inventory.
//!
//! - `Instrument`: a persisted stock record
//! - `NewInstrument`: a creation candidate that has not been assigned an id yet
//! - `InstrumentType`: closed set of instrument categories
//! - `InstrumentId`: store-assigned identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an instrument.
///
/// Assigned by the store on insert and never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(i64);

impl InstrumentId {
    /// Create an instrument ID from its raw value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for InstrumentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Category of a musical instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentType {
    Guitar,
    Bass,
    Drum,
    Keyboard,
    Wind,
    String,
    Percussion,
}

impl InstrumentType {
    /// Every category, in declaration order.
    pub const ALL: [InstrumentType; 7] = [
        InstrumentType::Guitar,
        InstrumentType::Bass,
        InstrumentType::Drum,
        InstrumentType::Keyboard,
        InstrumentType::Wind,
        InstrumentType::String,
        InstrumentType::Percussion,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            InstrumentType::Guitar => "GUITAR",
            InstrumentType::Bass => "BASS",
            InstrumentType::Drum => "DRUM",
            InstrumentType::Keyboard => "KEYBOARD",
            InstrumentType::Wind => "WIND",
            InstrumentType::String => "STRING",
            InstrumentType::Percussion => "PERCUSSION",
        }
    }

    /// Parse from database string representation (case-insensitive).
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GUITAR" => Some(InstrumentType::Guitar),
            "BASS" => Some(InstrumentType::Bass),
            "DRUM" => Some(InstrumentType::Drum),
            "KEYBOARD" => Some(InstrumentType::Keyboard),
            "WIND" => Some(InstrumentType::Wind),
            "STRING" => Some(InstrumentType::String),
            "PERCUSSION" => Some(InstrumentType::Percussion),
            _ => None,
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Instrument that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstrument {
    pub name: String,
    pub brand: String,
    /// Stock ceiling.
    pub max: i32,
    /// Stock floor.
    pub min: i32,
    /// Initial stock level.
    pub quantity: i32,
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
}

impl NewInstrument {
    /// Attach a store-assigned id, producing the persisted form.
    pub fn with_id(self, id: InstrumentId) -> Instrument {
        Instrument {
            id,
            name: self.name,
            brand: self.brand,
            max: self.max,
            min: self.min,
            quantity: self.quantity,
            instrument_type: self.instrument_type,
        }
    }
}

/// A persisted instrument stock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Store-assigned identifier.
    pub id: InstrumentId,
    /// Unique display name (e.g. "Slash Lespaul").
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Stock ceiling; quantity never rises above it.
    pub max: i32,
    /// Stock floor; quantity never falls below it.
    pub min: i32,
    /// Current stock level.
    pub quantity: i32,
    /// Category.
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
}

impl Instrument {
    /// Whether the current quantity sits inside `[min, max]`.
    pub fn is_within_bounds(&self) -> bool {
        self.min <= self.quantity && self.quantity <= self.max
    }

    /// Copy of this record with a different quantity.
    pub fn with_quantity(&self, quantity: i32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
