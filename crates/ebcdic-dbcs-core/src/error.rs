//! Error types for table construction and stream conversion.
//!
//! Provides [`CodecError`] for failures that stop a conversion or reject a
//! table, and [`ErrorMode`] for choosing between substitution and strict
//! reporting of malformed or unmappable input.

use std::fmt;

/// Fatal error types for codec tables and conversions.
///
/// Lookup functions never return these; unmappable input is a sentinel at
/// that layer. Errors arise when tables are constructed from untrusted data
/// or when a strict conversion meets input it cannot convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Mask/shift constants that do not describe a two-level table.
    InvalidParams(String),
    /// Table data that violates a structural invariant.
    InvalidTable(String),
    /// Input bytes that are not well-formed in the encoding.
    Malformed {
        /// Byte offset of the first offending byte.
        offset: usize,
        /// Number of bytes in the offending sequence.
        len: usize,
    },
    /// A well-formed byte sequence with no Unicode mapping.
    Unmappable {
        /// Byte offset of the sequence.
        offset: usize,
        /// Number of bytes in the sequence.
        len: usize,
    },
    /// A character with no mapping in the encoding.
    UnmappableChar {
        /// Byte offset of the character in the UTF-8 input.
        offset: usize,
        /// The character that could not be encoded.
        ch: char,
    },
    /// I/O error reading or writing table or text data.
    IoError(String),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidParams(msg) => write!(f, "invalid codec parameters: {msg}"),
            CodecError::InvalidTable(msg) => write!(f, "invalid table: {msg}"),
            CodecError::Malformed { offset, len } => {
                write!(f, "malformed input: {len} byte(s) at offset {offset}")
            }
            CodecError::Unmappable { offset, len } => {
                write!(f, "unmappable input: {len} byte(s) at offset {offset}")
            }
            CodecError::UnmappableChar { offset, ch } => write!(
                f,
                "unmappable character U+{:04X} at offset {offset}",
                u32::from(*ch)
            ),
            CodecError::IoError(msg) => write!(f, "I/O error: {msg}"),
            CodecError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IoError(err.to_string())
    }
}

/// How a conversion treats malformed or unmappable input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorMode {
    /// Substitute U+FFFD when decoding and the codec's substitution bytes
    /// when encoding, then continue.
    #[default]
    Replace,
    /// Stop at the first problem and report its position.
    Strict,
}
