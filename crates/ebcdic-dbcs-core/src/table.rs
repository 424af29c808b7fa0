//! Immutable two-level lookup tables for both conversion directions.
//!
//! Table data is held as `Cow<'static, [u16]>` so generated `static` arrays
//! and tables built at runtime share one representation. Every constructor
//! validates the structural invariants once; the lookup functions in
//! [`crate::lookup`] rely on them and never index out of bounds.

use std::borrow::Cow;

use crate::error::CodecError;
use crate::params::CodecParams;

/// Packed decode value for a unit with no Unicode mapping.
pub const REPLACEMENT: u16 = 0xFFFD;

/// Packed encode value for a code point with no mapping (except U+0000).
pub const NOT_FOUND: u16 = 0x0000;

/// Byte unit -> code point table.
///
/// Units are 16-bit keys: SBCS byte `b` is `0x00bb`, a DBCS pair is
/// `lead << 8 | trail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    params: CodecParams,
    index1: Cow<'static, [u16]>,
    index2: Cow<'static, [u16]>,
}

impl DecodeTable {
    /// Create a decode table, validating that every `index1` offset addresses
    /// a full block in `index2` and every entry is a BMP scalar value.
    pub fn new(
        params: CodecParams,
        index1: impl Into<Cow<'static, [u16]>>,
        index2: impl Into<Cow<'static, [u16]>>,
    ) -> Result<Self, CodecError> {
        let index1 = index1.into();
        let index2 = index2.into();
        check_index1(&params, &index1, index2.len())?;
        if let Some(pos) = index2.iter().position(|&v| is_surrogate(v)) {
            return Err(CodecError::InvalidTable(format!(
                "index2 entry {pos} holds surrogate {:#06x}",
                index2[pos]
            )));
        }
        Ok(Self {
            params,
            index1,
            index2,
        })
    }

    /// A table where every unit decodes to U+FFFD.
    pub fn unmapped(params: CodecParams) -> Self {
        Self {
            params,
            index1: Cow::Owned(vec![0; params.index1_len()]),
            index2: Cow::Owned(vec![REPLACEMENT; params.block_size()]),
        }
    }

    pub fn params(&self) -> CodecParams {
        self.params
    }

    pub fn index1(&self) -> &[u16] {
        &self.index1
    }

    pub fn index2(&self) -> &[u16] {
        &self.index2
    }

    /// The packed entry for `unit`.
    #[inline]
    pub(crate) fn entry(&self, unit: u16) -> u16 {
        let base = self.index1[self.params.slot(unit)] as usize;
        self.index2
            .get(base + self.params.offset(unit))
            .copied()
            .unwrap_or(REPLACEMENT)
    }
}

/// Code point -> packed byte unit table.
///
/// The entry array is stored in two segments. A combined index below
/// `index2.len()` reads the primary segment; anything past it reads the
/// overflow segment `index2a` at `index - index2.len()`. Legacy generated
/// tables split at 15000 entries.
///
/// A packed `0x0000` entry means "not found", except for U+0000 when
/// [`maps_nul`](Self::maps_nul) is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeTable {
    params: CodecParams,
    index1: Cow<'static, [u16]>,
    index2: Cow<'static, [u16]>,
    index2a: Cow<'static, [u16]>,
    maps_nul: bool,
}

impl EncodeTable {
    /// Create an encode table, validating every `index1` offset against the
    /// combined length of both segments.
    ///
    /// The table starts out without a NUL mapping; see
    /// [`with_nul_mapped`](Self::with_nul_mapped).
    pub fn new(
        params: CodecParams,
        index1: impl Into<Cow<'static, [u16]>>,
        index2: impl Into<Cow<'static, [u16]>>,
        index2a: impl Into<Cow<'static, [u16]>>,
    ) -> Result<Self, CodecError> {
        let index1 = index1.into();
        let index2 = index2.into();
        let index2a = index2a.into();
        check_index1(&params, &index1, index2.len() + index2a.len())?;
        Ok(Self {
            params,
            index1,
            index2,
            index2a,
            maps_nul: false,
        })
    }

    /// Set whether U+0000 has a mapping. Its entry is then read as a real
    /// value even when it is `0x0000`.
    pub fn with_nul_mapped(mut self, mapped: bool) -> Self {
        self.maps_nul = mapped;
        self
    }

    /// A table where nothing is encodable.
    pub fn unmapped(params: CodecParams) -> Self {
        Self {
            params,
            index1: Cow::Owned(vec![0; params.index1_len()]),
            index2: Cow::Owned(vec![NOT_FOUND; params.block_size()]),
            index2a: Cow::Borrowed(&[]),
            maps_nul: false,
        }
    }

    /// Whether U+0000 is encodable.
    pub fn maps_nul(&self) -> bool {
        self.maps_nul
    }

    pub fn params(&self) -> CodecParams {
        self.params
    }

    pub fn index1(&self) -> &[u16] {
        &self.index1
    }

    /// The primary entry segment.
    pub fn index2(&self) -> &[u16] {
        &self.index2
    }

    /// The overflow entry segment.
    pub fn index2a(&self) -> &[u16] {
        &self.index2a
    }

    /// Combined index at which the overflow segment starts.
    pub fn split(&self) -> usize {
        self.index2.len()
    }

    /// Total number of entries across both segments.
    pub fn len(&self) -> usize {
        self.index2.len() + self.index2a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The packed entry for `key`, or `None` if the combined index falls
    /// outside both segments.
    #[inline]
    pub(crate) fn entry(&self, key: u16) -> Option<u16> {
        let index = self.index1[self.params.slot(key)] as usize + self.params.offset(key);
        self.combined(index)
    }

    #[inline]
    pub(crate) fn combined(&self, index: usize) -> Option<u16> {
        match index.checked_sub(self.index2.len()) {
            None => Some(self.index2[index]),
            Some(overflow) => self.index2a.get(overflow).copied(),
        }
    }
}

fn is_surrogate(v: u16) -> bool {
    (0xD800..=0xDFFF).contains(&v)
}

fn check_index1(params: &CodecParams, index1: &[u16], entries: usize) -> Result<(), CodecError> {
    if index1.len() != params.index1_len() {
        return Err(CodecError::InvalidTable(format!(
            "index1 has {} slots, shift {} requires {}",
            index1.len(),
            params.shift,
            params.index1_len()
        )));
    }
    let block = params.block_size();
    for (slot, &offset) in index1.iter().enumerate() {
        if offset as usize + block > entries {
            return Err(CodecError::InvalidTable(format!(
                "index1 slot {slot} points at offset {offset}, past the {entries} available entries"
            )));
        }
    }
    Ok(())
}
