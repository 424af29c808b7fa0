//! Summary counts for a pair of tables.

use std::collections::BTreeSet;

use crate::lookup::{REPLACEMENT_CHAR, decode_unit, encode_char};
use crate::table::{DecodeTable, EncodeTable};

/// Mapping counts and storage sizes of a codec's tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableStats {
    /// SBCS bytes with a Unicode mapping.
    pub sbcs_mapped: usize,
    /// DBCS units with a Unicode mapping.
    pub dbcs_mapped: usize,
    /// BMP characters with an encoding.
    pub encodable: usize,
    pub decode_index1_len: usize,
    pub decode_index2_len: usize,
    /// Distinct blocks referenced from the decode `index1`.
    pub decode_blocks: usize,
    pub encode_index1_len: usize,
    pub encode_index2_len: usize,
    pub encode_index2a_len: usize,
    /// Distinct blocks referenced from the encode `index1`.
    pub encode_blocks: usize,
}

impl TableStats {
    /// Walk both tables over their full key space.
    pub fn collect(decode: &DecodeTable, encode: &EncodeTable) -> Self {
        let mut stats = TableStats {
            decode_index1_len: decode.index1().len(),
            decode_index2_len: decode.index2().len(),
            decode_blocks: distinct(decode.index1()),
            encode_index1_len: encode.index1().len(),
            encode_index2_len: encode.index2().len(),
            encode_index2a_len: encode.index2a().len(),
            encode_blocks: distinct(encode.index1()),
            ..TableStats::default()
        };

        for unit in 0..=u16::MAX {
            if decode_unit(decode, unit) != REPLACEMENT_CHAR {
                if unit <= 0xFF {
                    stats.sbcs_mapped += 1;
                } else {
                    stats.dbcs_mapped += 1;
                }
            }
        }

        stats.encodable = (0..=0xFFFFu32)
            .filter_map(char::from_u32)
            .filter(|&ch| encode_char(encode, ch).is_some())
            .count();

        stats
    }
}

fn distinct(index1: &[u16]) -> usize {
    index1.iter().collect::<BTreeSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CodecParams;

    #[test]
    fn unmapped_tables_count_nothing() {
        let stats = TableStats::collect(
            &DecodeTable::unmapped(CodecParams::DBCS_DECODE),
            &EncodeTable::unmapped(CodecParams::DBCS_ENCODE),
        );
        assert_eq!(stats.sbcs_mapped, 0);
        assert_eq!(stats.dbcs_mapped, 0);
        assert_eq!(stats.encodable, 0);
        assert_eq!(stats.decode_index1_len, 1024);
        assert_eq!(stats.decode_blocks, 1);
        assert_eq!(stats.encode_index1_len, 2048);
        assert_eq!(stats.encode_index2a_len, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn stats_serialize_to_json() {
        let stats = TableStats {
            sbcs_mapped: 3,
            ..TableStats::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"sbcs_mapped\":3"));
        let back: TableStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
