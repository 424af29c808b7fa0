//! Packs mappings into two-level decode and encode tables.
//!
//! Each direction is first laid out as a dense 65536-entry array, then cut
//! into blocks of `1 << shift` entries. Identical blocks are stored once, so
//! the large unmapped regions of a DBCS codepage share a single block.

use std::collections::{BTreeMap, HashMap};

use ebcdic_dbcs_core::{
    CodecParams, DecodeTable, EncodeTable, EncodedUnit, NOT_FOUND, REPLACEMENT, SI, SO,
    is_valid_pair,
};

use crate::error::{BuildResult, BuildWarning, BuildWarningCode, TableError};
use crate::mapping::{Mapping, Precision};
use crate::ucm::UcmFile;

/// Layout choices for [`TableBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Decode-direction constants (default: 64-entry blocks).
    pub decode_params: CodecParams,
    /// Encode-direction constants (default: 32-entry blocks).
    pub encode_params: CodecParams,
    /// Whether `|1` fallback mappings enter the encode table (default: true).
    pub include_fallbacks: bool,
    /// Move encode entries past this combined index into the overflow
    /// segment (default: None = single segment).
    pub overflow_split: Option<usize>,
    /// When true, any collected warning fails the build (default: false).
    pub strict: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            decode_params: CodecParams::DBCS_DECODE,
            encode_params: CodecParams::DBCS_ENCODE,
            include_fallbacks: true,
            overflow_split: None,
            strict: false,
        }
    }
}

impl BuildOptions {
    /// The segment split used by legacy generated encoder tables.
    pub const LEGACY_OVERFLOW_SPLIT: usize = 15000;

    /// Options matching the layout of legacy generated tables.
    pub fn legacy() -> Self {
        Self {
            overflow_split: Some(Self::LEGACY_OVERFLOW_SPLIT),
            ..Self::default()
        }
    }
}

/// The two tables of one codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTables {
    pub decode: DecodeTable,
    pub encode: EncodeTable,
}

/// Accumulates mappings and checks them for conflicts.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    decode: BTreeMap<u16, (char, Precision)>,
    encode: BTreeMap<char, (EncodedUnit, Precision)>,
    warnings: Vec<BuildWarning>,
    skipped_subchar1: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder seeded with every mapping of a parsed UCM file, carrying
    /// over the parse warnings.
    pub fn from_ucm(parsed: BuildResult<UcmFile>) -> Result<Self, TableError> {
        let mut builder = Self::new();
        builder.warnings = parsed.warnings;
        builder.extend(parsed.value.mappings)?;
        Ok(builder)
    }

    /// Add one mapping.
    ///
    /// Fails when two decode mappings claim the same bytes for different
    /// characters, when two round-trip mappings claim the same character,
    /// when a character other than U+0000 would encode to `0x00`, or when
    /// the bytes cannot be carried in an SO/SI stream (the shift bytes
    /// themselves, or a pair outside the DBCS byte ranges).
    pub fn add(&mut self, mapping: Mapping) -> Result<(), TableError> {
        let Mapping {
            ch,
            unit,
            precision,
        } = mapping;

        match unit {
            EncodedUnit::Double(0, trail) => {
                return Err(TableError::Unrepresentable(format!(
                    "U+{:04X} maps to 0x00{trail:02X}, which is indistinguishable from a single byte",
                    u32::from(ch)
                )));
            }
            EncodedUnit::Double(lead, trail) if !is_valid_pair(lead, trail) => {
                return Err(TableError::Unrepresentable(format!(
                    "U+{:04X} maps to 0x{lead:02X}{trail:02X}, outside the double-byte ranges",
                    u32::from(ch)
                )));
            }
            EncodedUnit::Single(b) if b == SO || b == SI => {
                return Err(TableError::Unrepresentable(format!(
                    "U+{:04X} maps to the shift byte 0x{b:02X}",
                    u32::from(ch)
                )));
            }
            _ => {}
        }
        if u32::from(ch) > 0xFFFF {
            return Err(TableError::Unrepresentable(format!(
                "U+{:04X} is outside the BMP",
                u32::from(ch)
            )));
        }

        if precision == Precision::SubChar1 {
            self.skipped_subchar1 += 1;
            return Ok(());
        }

        if precision.decodes() {
            self.add_decode(ch, unit, precision)?;
        }
        if precision.encodes() {
            self.add_encode(ch, unit, precision)?;
        }
        Ok(())
    }

    pub fn extend(&mut self, mappings: impl IntoIterator<Item = Mapping>) -> Result<(), TableError> {
        mappings.into_iter().try_for_each(|m| self.add(m))
    }

    /// Number of distinct byte units with a decode mapping.
    pub fn decode_len(&self) -> usize {
        self.decode.len()
    }

    /// Number of distinct characters with an encode mapping.
    pub fn encode_len(&self) -> usize {
        self.encode.len()
    }

    /// Number of `|2` mappings dropped so far.
    pub fn skipped_subchar1(&self) -> usize {
        self.skipped_subchar1
    }

    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    fn add_decode(&mut self, ch: char, unit: EncodedUnit, precision: Precision) -> Result<(), TableError> {
        if ch == '\u{FFFD}' {
            self.warnings.push(BuildWarning::new(
                BuildWarningCode::ReservedCodePoint,
                format!(
                    "{:#06x} decodes to U+FFFD, which reads as unmapped",
                    unit.packed()
                ),
            ));
            return Ok(());
        }
        let key = unit.packed();
        match self.decode.get(&key) {
            Some(&(existing, _)) if existing != ch => Err(TableError::Conflict(format!(
                "{key:#06x} decodes to both U+{:04X} and U+{:04X}",
                u32::from(existing),
                u32::from(ch)
            ))),
            Some(_) => Ok(()),
            None => {
                self.decode.insert(key, (ch, precision));
                Ok(())
            }
        }
    }

    fn add_encode(&mut self, ch: char, unit: EncodedUnit, precision: Precision) -> Result<(), TableError> {
        if unit.packed() == NOT_FOUND && ch != '\0' {
            return Err(TableError::Unrepresentable(format!(
                "U+{:04X} encodes to 0x00, which is reserved for U+0000",
                u32::from(ch)
            )));
        }
        match self.encode.get(&ch) {
            None => {
                self.encode.insert(ch, (unit, precision));
                Ok(())
            }
            Some(&(existing, _)) if existing == unit => Ok(()),
            Some(&(existing, Precision::RoundTrip)) if precision == Precision::RoundTrip => {
                Err(TableError::Conflict(format!(
                    "U+{:04X} has round-trip mappings to both {:#06x} and {:#06x}",
                    u32::from(ch),
                    existing.packed(),
                    unit.packed()
                )))
            }
            // A round-trip mapping replaces an earlier fallback.
            Some(&(_, Precision::Fallback)) if precision == Precision::RoundTrip => {
                self.encode.insert(ch, (unit, precision));
                Ok(())
            }
            // Otherwise the first mapping wins.
            Some(_) => Ok(()),
        }
    }

    /// Pack the collected mappings.
    pub fn build(&self, options: &BuildOptions) -> Result<BuildResult<BuiltTables>, TableError> {
        if options.strict {
            if let Some(warning) = self.warnings.first() {
                return Err(TableError::Strict(warning.clone()));
            }
        }

        let mut dense = vec![REPLACEMENT; 1 << 16];
        for (&unit, &(ch, _)) in &self.decode {
            dense[unit as usize] = u32::from(ch) as u16;
        }
        let (index1, index2) = pack(&dense, &options.decode_params, REPLACEMENT)?;
        let decode = DecodeTable::new(options.decode_params, index1, index2)?;

        let mut dense = vec![NOT_FOUND; 1 << 16];
        let mut maps_nul = false;
        for (&ch, &(unit, precision)) in &self.encode {
            if precision == Precision::Fallback && !options.include_fallbacks {
                continue;
            }
            maps_nul |= ch == '\0';
            dense[u32::from(ch) as usize] = unit.packed();
        }
        let (index1, mut index2) = pack(&dense, &options.encode_params, NOT_FOUND)?;
        let index2a = match options.overflow_split {
            Some(split) if split < index2.len() => index2.split_off(split),
            _ => Vec::new(),
        };
        let encode =
            EncodeTable::new(options.encode_params, index1, index2, index2a)?.with_nul_mapped(maps_nul);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            decode_mappings = self.decode.len(),
            encode_mappings = self.encode.len(),
            decode_entries = decode.index2().len(),
            encode_entries = encode.len(),
            skipped_subchar1 = self.skipped_subchar1,
            "built two-level tables"
        );

        Ok(BuildResult::with_warnings(
            BuiltTables { decode, encode },
            self.warnings.clone(),
        ))
    }
}

/// Cut `dense` into blocks and store each distinct block once.
///
/// The block made entirely of `empty` is always placed first so unmapped
/// slots point at offset 0.
fn pack(dense: &[u16], params: &CodecParams, empty: u16) -> Result<(Vec<u16>, Vec<u16>), TableError> {
    let block_size = params.block_size();
    let mut index1 = Vec::with_capacity(params.index1_len());
    let empty_block = vec![empty; block_size];
    let mut index2 = empty_block.clone();
    let mut seen: HashMap<&[u16], u16> = HashMap::new();

    for block in dense.chunks(block_size) {
        let offset = if block == empty_block.as_slice() {
            0
        } else if let Some(&offset) = seen.get(block) {
            offset
        } else {
            let offset = u16::try_from(index2.len()).map_err(|_| {
                TableError::Unrepresentable(format!(
                    "table needs more than {} entries",
                    u16::MAX
                ))
            })?;
            index2.extend_from_slice(block);
            seen.insert(block, offset);
            offset
        };
        index1.push(offset);
    }
    Ok((index1, index2))
}
