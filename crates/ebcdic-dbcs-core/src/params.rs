//! Mask and shift constants that parameterise a two-level table.
//!
//! A 16-bit key is split into a block selector (`(key & mask1) >> shift`)
//! and an offset within the block (`key & mask2`). The two masks are always
//! complementary, so the only free parameter is `shift`.

use crate::error::CodecError;

/// The per-direction constants of a two-level lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecParams {
    /// Selects the block bits of a key.
    pub mask1: u16,
    /// Selects the in-block offset bits of a key.
    pub mask2: u16,
    /// Number of low bits addressing an entry within a block.
    pub shift: u8,
}

impl CodecParams {
    /// Decode-direction constants used by the IBM935 tables (64 entry blocks).
    pub const DBCS_DECODE: CodecParams = CodecParams::new(6);

    /// Encode-direction constants used by the IBM935 tables (32 entry blocks).
    pub const DBCS_ENCODE: CodecParams = CodecParams::new(5);

    /// Derive both masks from `shift`.
    ///
    /// `shift` must be in `1..=15`; this is checked at compile time when used
    /// in a `const` context and panics otherwise.
    pub const fn new(shift: u8) -> Self {
        assert!(shift >= 1 && shift <= 15, "shift must be in 1..=15");
        let mask2 = ((1u32 << shift) - 1) as u16;
        Self {
            mask1: !mask2,
            mask2,
            shift,
        }
    }

    /// Build params from explicit masks, as found in generated codec sources.
    ///
    /// Rejects combinations where the masks are not complementary or do not
    /// agree with `shift`.
    pub fn from_masks(mask1: u16, mask2: u16, shift: u8) -> Result<Self, CodecError> {
        if !(1..=15).contains(&shift) {
            return Err(CodecError::InvalidParams(format!(
                "shift {shift} is outside 1..=15"
            )));
        }
        let expected = Self::new(shift);
        if mask2 != expected.mask2 || mask1 != expected.mask1 {
            return Err(CodecError::InvalidParams(format!(
                "masks {mask1:#06x}/{mask2:#06x} do not match shift {shift} \
                 (expected {:#06x}/{:#06x})",
                expected.mask1, expected.mask2
            )));
        }
        Ok(expected)
    }

    /// Entries per block.
    pub const fn block_size(&self) -> usize {
        1 << self.shift
    }

    /// Number of `index1` slots needed to cover the whole 16-bit key space.
    pub const fn index1_len(&self) -> usize {
        1 << (16 - self.shift as u32)
    }

    /// The `index1` slot a key falls into.
    #[inline]
    pub const fn slot(&self, key: u16) -> usize {
        ((key & self.mask1) >> self.shift) as usize
    }

    /// The offset of a key within its block.
    #[inline]
    pub const fn offset(&self, key: u16) -> usize {
        (key & self.mask2) as usize
    }
}
