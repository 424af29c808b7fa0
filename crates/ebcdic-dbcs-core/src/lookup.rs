//! The decode and encode lookup engine.
//!
//! Both directions are pure functions over validated tables. Decoding is
//! total and signals "no mapping" with U+FFFD; encoding returns `None`.

use crate::table::{DecodeTable, EncodeTable, NOT_FOUND};

/// Unicode replacement character, the decode-side "unmapped" sentinel.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// An encoded character: one SBCS byte or one DBCS lead/trail pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodedUnit {
    /// A single-byte code, written outside SO/SI brackets.
    Single(u8),
    /// A lead and trail byte, written between SO and SI.
    Double(u8, u8),
}

impl EncodedUnit {
    /// Unpack a 16-bit table value. A zero high byte means SBCS.
    pub const fn from_packed(packed: u16) -> Self {
        let [lead, trail] = packed.to_be_bytes();
        if lead == 0 {
            EncodedUnit::Single(trail)
        } else {
            EncodedUnit::Double(lead, trail)
        }
    }

    /// The 16-bit key this unit has in a decode table.
    pub const fn packed(self) -> u16 {
        match self {
            EncodedUnit::Single(b) => b as u16,
            EncodedUnit::Double(lead, trail) => u16::from_be_bytes([lead, trail]),
        }
    }

    /// Whether this is a DBCS pair.
    pub const fn is_double(self) -> bool {
        matches!(self, EncodedUnit::Double(..))
    }

    /// Number of bytes the unit occupies, not counting shift bytes.
    pub const fn byte_len(self) -> usize {
        match self {
            EncodedUnit::Single(_) => 1,
            EncodedUnit::Double(..) => 2,
        }
    }
}

/// Decode a 16-bit unit. Unmapped units yield [`REPLACEMENT_CHAR`].
#[inline]
pub fn decode_unit(table: &DecodeTable, unit: u16) -> char {
    // Table construction rejects surrogates, so conversion cannot fail.
    char::from_u32(u32::from(table.entry(unit))).unwrap_or(REPLACEMENT_CHAR)
}

/// Decode a single SBCS byte.
#[inline]
pub fn decode_single(table: &DecodeTable, byte: u8) -> char {
    decode_unit(table, u16::from(byte))
}

/// Decode a DBCS lead/trail pair.
#[inline]
pub fn decode_double(table: &DecodeTable, lead: u8, trail: u8) -> char {
    decode_unit(table, u16::from_be_bytes([lead, trail]))
}

/// Encode a character, or `None` if the encoding has no mapping for it.
///
/// The table's "not found" value is `0x0000`, which is also the legitimate
/// encoding of U+0000. A zero entry is a mapping only for U+0000 in a table
/// that [maps NUL](EncodeTable::maps_nul). Characters outside the BMP and the noncharacters U+FFFE/U+FFFF are
/// never encodable.
#[inline]
pub fn encode_char(table: &EncodeTable, ch: char) -> Option<EncodedUnit> {
    let code = u32::from(ch);
    if code >= 0xFFFE {
        return None;
    }
    let packed = table.entry(code as u16)?;
    if packed == NOT_FOUND && !(ch == '\0' && table.maps_nul()) {
        return None;
    }
    Some(EncodedUnit::from_packed(packed))
}

/// Whether `ch` has a mapping.
#[inline]
pub fn can_encode(table: &EncodeTable, ch: char) -> bool {
    encode_char(table, ch).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CodecParams;
    use crate::table::REPLACEMENT;

    /// Decode table with NUL, 'A' at 0xC1 and U+3000 at 0x4040.
    fn decode_table() -> DecodeTable {
        let params = CodecParams::DBCS_DECODE;
        // block 0: unmapped, block 1: 0x0000.., block 2: 0x00C0.., block 3: 0x4040..
        let mut index2 = vec![REPLACEMENT; 64 * 4];
        index2[64] = 0x0000;
        index2[128 + 0x01] = 0x0041;
        index2[192] = 0x3000;
        let mut index1 = vec![0u16; params.index1_len()];
        index1[params.slot(0x0000)] = 64;
        index1[params.slot(0x00C1)] = 128;
        index1[params.slot(0x4040)] = 192;
        DecodeTable::new(params, index1, index2).unwrap()
    }

    fn encode_table() -> EncodeTable {
        let params = CodecParams::DBCS_ENCODE;
        let mut index2 = vec![NOT_FOUND; 32 * 4];
        // block 1: U+0000.. (NUL maps to 0x0000, a legitimate value)
        index2[32] = 0x0000;
        // block 2: U+0040.., 'A' -> 0x00C1
        index2[64 + 0x01] = 0x00C1;
        // block 3: U+3000.. -> 0x4040
        index2[96] = 0x4040;
        let mut index1 = vec![0u16; params.index1_len()];
        index1[params.slot(0x0000)] = 32;
        index1[params.slot(0x0041)] = 64;
        index1[params.slot(0x3000)] = 96;
        EncodeTable::new(params, index1, index2, Vec::new())
            .unwrap()
            .with_nul_mapped(true)
    }

    #[test]
    fn nul_unit_decodes_to_nul() {
        assert_eq!(decode_unit(&decode_table(), 0x0000), '\0');
    }

    #[test]
    fn single_and_double_helpers_build_units() {
        let table = decode_table();
        assert_eq!(decode_single(&table, 0xC1), 'A');
        assert_eq!(decode_double(&table, 0x40, 0x40), '\u{3000}');
    }

    #[test]
    fn unassigned_slot_decodes_uniformly_to_replacement() {
        let table = decode_table();
        let params = table.params();
        for slot in 0x41..=0x49usize {
            let first = (slot << params.shift) as u16;
            for unit in first..first + 64 {
                assert_eq!(decode_unit(&table, unit), REPLACEMENT_CHAR);
            }
        }
    }

    #[test]
    fn decode_is_total() {
        let table = decode_table();
        for unit in 0..=u16::MAX {
            let _ = decode_unit(&table, unit);
        }
    }

    #[test]
    fn encode_nul_is_a_mapping_not_a_sentinel() {
        assert_eq!(
            encode_char(&encode_table(), '\0'),
            Some(EncodedUnit::Single(0))
        );
    }

    #[test]
    fn encode_nul_without_mapping_is_unmappable() {
        let table = encode_table().with_nul_mapped(false);
        assert_eq!(encode_char(&table, '\0'), None);
        assert!(!can_encode(&table, '\0'));
        assert_eq!(encode_char(&table, 'A'), Some(EncodedUnit::Single(0xC1)));
    }

    #[test]
    fn encode_zero_entry_for_other_char_is_unmappable() {
        let table = encode_table();
        assert_eq!(encode_char(&table, '\u{0001}'), None);
        assert_eq!(encode_char(&table, 'B'), None);
        assert!(!can_encode(&table, '\u{4E00}'));
    }

    #[test]
    fn encode_a_round_trips_through_decode() {
        let unit = encode_char(&encode_table(), 'A').unwrap();
        assert_eq!(unit, EncodedUnit::Single(0xC1));
        assert_eq!(decode_unit(&decode_table(), unit.packed()), 'A');
    }

    #[test]
    fn encode_double_byte() {
        let unit = encode_char(&encode_table(), '\u{3000}').unwrap();
        assert_eq!(unit, EncodedUnit::Double(0x40, 0x40));
        assert!(unit.is_double());
        assert_eq!(unit.byte_len(), 2);
    }

    #[test]
    fn encode_rejects_noncharacters_and_astral() {
        let table = encode_table();
        assert_eq!(encode_char(&table, '\u{FFFE}'), None);
        assert_eq!(encode_char(&table, '\u{FFFF}'), None);
        assert_eq!(encode_char(&table, '\u{1F600}'), None);
    }

    #[test]
    fn encode_is_total_over_bmp() {
        let table = encode_table();
        for code in 0..=0xFFFFu32 {
            if let Some(ch) = char::from_u32(code) {
                let _ = encode_char(&table, ch);
            }
        }
    }

    #[test]
    fn lookups_are_idempotent() {
        let dec = decode_table();
        let enc = encode_table();
        for _ in 0..3 {
            assert_eq!(decode_unit(&dec, 0x4040), '\u{3000}');
            assert_eq!(encode_char(&enc, 'A'), Some(EncodedUnit::Single(0xC1)));
        }
    }

    #[test]
    fn packed_round_trip() {
        assert_eq!(EncodedUnit::from_packed(0x00C1), EncodedUnit::Single(0xC1));
        assert_eq!(EncodedUnit::from_packed(0x4E41), EncodedUnit::Double(0x4E, 0x41));
        assert_eq!(EncodedUnit::Double(0x4E, 0x41).packed(), 0x4E41);
    }
}
