//! Single mapping entries and their direction.

use ebcdic_dbcs_core::EncodedUnit;

/// Which directions a mapping applies to, as given by a UCM precision
/// indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// `|0`: both directions.
    RoundTrip,
    /// `|1`: Unicode to bytes only.
    Fallback,
    /// `|2`: Unicode to the single-byte substitute.
    SubChar1,
    /// `|3`: bytes to Unicode only.
    ReverseFallback,
}

impl Precision {
    pub fn from_indicator(indicator: u8) -> Option<Self> {
        match indicator {
            0 => Some(Precision::RoundTrip),
            1 => Some(Precision::Fallback),
            2 => Some(Precision::SubChar1),
            3 => Some(Precision::ReverseFallback),
            _ => None,
        }
    }

    pub fn indicator(self) -> u8 {
        match self {
            Precision::RoundTrip => 0,
            Precision::Fallback => 1,
            Precision::SubChar1 => 2,
            Precision::ReverseFallback => 3,
        }
    }

    /// Whether the mapping enters the decode table.
    pub fn decodes(self) -> bool {
        matches!(self, Precision::RoundTrip | Precision::ReverseFallback)
    }

    /// Whether the mapping enters the encode table.
    pub fn encodes(self) -> bool {
        matches!(self, Precision::RoundTrip | Precision::Fallback)
    }
}

/// One character <-> byte unit mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mapping {
    pub ch: char,
    pub unit: EncodedUnit,
    pub precision: Precision,
}

impl Mapping {
    pub fn round_trip(ch: char, unit: EncodedUnit) -> Self {
        Self {
            ch,
            unit,
            precision: Precision::RoundTrip,
        }
    }

    pub fn fallback(ch: char, unit: EncodedUnit) -> Self {
        Self {
            ch,
            unit,
            precision: Precision::Fallback,
        }
    }

    pub fn reverse_fallback(ch: char, unit: EncodedUnit) -> Self {
        Self {
            ch,
            unit,
            precision: Precision::ReverseFallback,
        }
    }
}
