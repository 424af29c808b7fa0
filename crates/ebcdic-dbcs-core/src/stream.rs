//! Stateful SO/SI framing over the lookup engine.
//!
//! Mixed EBCDIC text starts in single-byte mode. Shift Out (`0x0E`) switches
//! to double-byte mode and Shift In (`0x0F`) switches back. The [`Decoder`]
//! and [`Encoder`] track that state across calls, so input may arrive in
//! arbitrary chunks.

use crate::error::{CodecError, ErrorMode};
use crate::lookup::{EncodedUnit, REPLACEMENT_CHAR, decode_double, decode_single, encode_char};
use crate::table::{DecodeTable, EncodeTable};

/// Shift Out: enter double-byte mode.
pub const SO: u8 = 0x0E;
/// Shift In: return to single-byte mode.
pub const SI: u8 = 0x0F;

/// Current shift state of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftState {
    #[default]
    Sbcs,
    Dbcs,
}

/// Outcome of one [`Decoder::decode_to_string`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderResult {
    /// All input was consumed (a trailing lead byte may be pending).
    InputEmpty,
    /// The last `len` consumed bytes are not a valid sequence.
    Malformed { len: usize },
    /// The last `len` consumed bytes are valid but have no mapping.
    Unmappable { len: usize },
}

/// Outcome of one [`Encoder::encode_to_vec`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderResult {
    /// All input was consumed.
    InputEmpty,
    /// The last consumed character has no mapping.
    Unmappable(char),
}

/// Bytes written in place of an unmappable character.
///
/// The single-byte substitute is preferred when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Substitution {
    pub sbcs: Option<u8>,
    pub dbcs: Option<[u8; 2]>,
}

impl Default for Substitution {
    /// EBCDIC `?` (`0x6F`) and the conventional DBCS substitute `0xFEFE`.
    fn default() -> Self {
        Self {
            sbcs: Some(0x6F),
            dbcs: Some([0xFE, 0xFE]),
        }
    }
}

impl Substitution {
    /// No substitution; every unmappable character is an error.
    pub const NONE: Substitution = Substitution {
        sbcs: None,
        dbcs: None,
    };

    pub fn unit(&self) -> Option<EncodedUnit> {
        match (self.sbcs, self.dbcs) {
            (Some(b), _) => Some(EncodedUnit::Single(b)),
            (None, Some([lead, trail])) => Some(EncodedUnit::Double(lead, trail)),
            (None, None) => None,
        }
    }
}

/// Whether a DBCS pair is structurally valid: the double-byte space
/// `0x40 0x40`, or a pair whose lead and trail bytes are both in
/// `0x41..=0xFE`.
pub fn is_valid_pair(lead: u8, trail: u8) -> bool {
    const DBCS_BYTE: std::ops::RangeInclusive<u8> = 0x41..=0xFE;
    (lead, trail) == (0x40, 0x40) || (DBCS_BYTE.contains(&lead) && DBCS_BYTE.contains(&trail))
}

/// Incremental bytes -> text converter.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    table: &'t DecodeTable,
    state: ShiftState,
    pending: Option<u8>,
}

impl<'t> Decoder<'t> {
    pub fn new(table: &'t DecodeTable) -> Self {
        Self {
            table,
            state: ShiftState::Sbcs,
            pending: None,
        }
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    /// Whether a lead byte from a previous chunk is waiting for its trail.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Return to single-byte mode and drop any pending byte.
    pub fn reset(&mut self) {
        self.state = ShiftState::Sbcs;
        self.pending = None;
    }

    /// Decode `src`, appending to `dst`.
    ///
    /// Returns the result and the number of bytes of `src` consumed. On
    /// `Malformed` or `Unmappable` the offending bytes are counted as
    /// consumed, so the caller may substitute and call again with the rest.
    /// When `last` is false a lead byte at the end of `src` is held until the
    /// next call.
    pub fn decode_to_string(
        &mut self,
        src: &[u8],
        dst: &mut String,
        last: bool,
    ) -> (DecoderResult, usize) {
        let mut pos = 0;

        if let Some(lead) = self.pending.take() {
            match src.first() {
                Some(&trail) => {
                    pos = 1;
                    if let Err(result) = self.push_pair(lead, trail, dst) {
                        return (result, pos);
                    }
                }
                None if last => return (DecoderResult::Malformed { len: 1 }, 0),
                None => {
                    self.pending = Some(lead);
                    return (DecoderResult::InputEmpty, 0);
                }
            }
        }

        while pos < src.len() {
            let byte = src[pos];
            match (byte, self.state) {
                (SO, ShiftState::Sbcs) => {
                    self.state = ShiftState::Dbcs;
                    pos += 1;
                }
                (SI, ShiftState::Dbcs) => {
                    self.state = ShiftState::Sbcs;
                    pos += 1;
                }
                (SO, ShiftState::Dbcs) | (SI, ShiftState::Sbcs) => {
                    return (DecoderResult::Malformed { len: 1 }, pos + 1);
                }
                (_, ShiftState::Sbcs) => {
                    pos += 1;
                    let ch = decode_single(self.table, byte);
                    if ch == REPLACEMENT_CHAR {
                        return (DecoderResult::Unmappable { len: 1 }, pos);
                    }
                    dst.push(ch);
                }
                (_, ShiftState::Dbcs) => {
                    let Some(&trail) = src.get(pos + 1) else {
                        if last {
                            return (DecoderResult::Malformed { len: 1 }, src.len());
                        }
                        self.pending = Some(byte);
                        return (DecoderResult::InputEmpty, src.len());
                    };
                    pos += 2;
                    if let Err(result) = self.push_pair(byte, trail, dst) {
                        return (result, pos);
                    }
                }
            }
        }

        (DecoderResult::InputEmpty, pos)
    }

    fn push_pair(&self, lead: u8, trail: u8, dst: &mut String) -> Result<(), DecoderResult> {
        if !is_valid_pair(lead, trail) {
            return Err(DecoderResult::Malformed { len: 2 });
        }
        let ch = decode_double(self.table, lead, trail);
        if ch == REPLACEMENT_CHAR {
            return Err(DecoderResult::Unmappable { len: 2 });
        }
        dst.push(ch);
        Ok(())
    }
}

/// Incremental text -> bytes converter.
#[derive(Debug, Clone)]
pub struct Encoder<'t> {
    table: &'t EncodeTable,
    state: ShiftState,
}

impl<'t> Encoder<'t> {
    pub fn new(table: &'t EncodeTable) -> Self {
        Self {
            table,
            state: ShiftState::Sbcs,
        }
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ShiftState::Sbcs;
    }

    /// Encode `src`, appending to `dst`.
    ///
    /// Returns the result and the number of bytes of `src` consumed,
    /// including an unmappable character when one is reported.
    pub fn encode_to_vec(&mut self, src: &str, dst: &mut Vec<u8>) -> (EncoderResult, usize) {
        for (i, ch) in src.char_indices() {
            match encode_char(self.table, ch) {
                Some(unit) => self.write_unit(unit, dst),
                None => return (EncoderResult::Unmappable(ch), i + ch.len_utf8()),
            }
        }
        (EncoderResult::InputEmpty, src.len())
    }

    /// Write one unit, emitting SO or SI first when the width changes.
    pub fn write_unit(&mut self, unit: EncodedUnit, dst: &mut Vec<u8>) {
        match unit {
            EncodedUnit::Single(b) => {
                if self.state == ShiftState::Dbcs {
                    dst.push(SI);
                    self.state = ShiftState::Sbcs;
                }
                dst.push(b);
            }
            EncodedUnit::Double(lead, trail) => {
                if self.state == ShiftState::Sbcs {
                    dst.push(SO);
                    self.state = ShiftState::Dbcs;
                }
                dst.extend_from_slice(&[lead, trail]);
            }
        }
    }

    /// Close an open double-byte run and return to single-byte mode.
    pub fn finish(&mut self, dst: &mut Vec<u8>) {
        if self.state == ShiftState::Dbcs {
            dst.push(SI);
        }
        self.state = ShiftState::Sbcs;
    }
}

/// Decode a complete byte string.
pub fn decode_all(table: &DecodeTable, src: &[u8], mode: ErrorMode) -> Result<String, CodecError> {
    let mut decoder = Decoder::new(table);
    let mut out = String::with_capacity(src.len());
    let mut read = 0;
    loop {
        let (result, consumed) = decoder.decode_to_string(&src[read..], &mut out, true);
        read += consumed;
        let err = match result {
            DecoderResult::InputEmpty => return Ok(out),
            DecoderResult::Malformed { len } => CodecError::Malformed {
                offset: read.saturating_sub(len),
                len,
            },
            DecoderResult::Unmappable { len } => CodecError::Unmappable {
                offset: read.saturating_sub(len),
                len,
            },
        };
        match mode {
            ErrorMode::Replace => out.push(REPLACEMENT_CHAR),
            ErrorMode::Strict => return Err(err),
        }
    }
}

/// Encode a complete string, closing any open double-byte run.
///
/// In [`ErrorMode::Replace`] unmappable characters are written as
/// `substitution`; with no substitute available they are errors in either
/// mode.
pub fn encode_all(
    table: &EncodeTable,
    src: &str,
    mode: ErrorMode,
    substitution: &Substitution,
) -> Result<Vec<u8>, CodecError> {
    let mut encoder = Encoder::new(table);
    let mut out = Vec::with_capacity(src.len());
    let mut read = 0;
    loop {
        let (result, consumed) = encoder.encode_to_vec(&src[read..], &mut out);
        read += consumed;
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::Unmappable(ch) => match (mode, substitution.unit()) {
                (ErrorMode::Replace, Some(unit)) => encoder.write_unit(unit, &mut out),
                _ => {
                    return Err(CodecError::UnmappableChar {
                        offset: read - ch.len_utf8(),
                        ch,
                    });
                }
            },
        }
    }
    encoder.finish(&mut out);
    Ok(out)
}
