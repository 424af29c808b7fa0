//! ebcdic-dbcs-core: lookup tables and conversion primitives.
//!
//! This crate provides the immutable two-level tables ([`DecodeTable`],
//! [`EncodeTable`]), the per-direction constants that index them
//! ([`CodecParams`]), the pure lookup engine, and a stateful SO/SI stream
//! layer on top. It carries no mapping data of its own.

pub mod error;
pub mod lookup;
pub mod params;
pub mod stats;
pub mod stream;
pub mod table;

pub use error::{CodecError, ErrorMode};
pub use lookup::{
    EncodedUnit, REPLACEMENT_CHAR, can_encode, decode_double, decode_single, decode_unit,
    encode_char,
};
pub use params::CodecParams;
pub use stats::TableStats;
pub use stream::{
    Decoder, DecoderResult, Encoder, EncoderResult, SI, SO, ShiftState, Substitution, decode_all,
    encode_all, is_valid_pair,
};
pub use table::{DecodeTable, EncodeTable, NOT_FOUND, REPLACEMENT};
