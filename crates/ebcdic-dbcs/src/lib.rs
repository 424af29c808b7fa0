//! ebcdic-dbcs: table-driven codecs for IBM EBCDIC double-byte code pages.
//!
//! This is the public API facade. It re-exports the lookup engine from
//! ebcdic-dbcs-core and uses ebcdic-dbcs-tables to build codecs from UCM
//! mapping files or compiled blobs.
//!
//! # Architecture
//!
//! - **ebcdic-dbcs-core**: two-level tables, pure lookups, SO/SI stream codec
//! - **ebcdic-dbcs-tables**: UCM parser, table builder, binary blob format
//! - **ebcdic-dbcs** (this crate): [`Codec`], [`LazyCodec`], verification and
//!   external-encoding transcoding
//!
//! # Example
//!
//! ```ignore
//! use ebcdic_dbcs::{BuildOptions, Codec, ErrorMode};
//!
//! let codec = Codec::open_file("ibm-935_P110-1999.ucm", &BuildOptions::default())?.value;
//! let bytes = codec.encode("中文", ErrorMode::Strict)?;
//! assert_eq!(codec.decode(&bytes, ErrorMode::Strict)?, "中文");
//! ```

mod codec;
mod lazy;
pub mod transcode;
pub mod verify;

pub use codec::Codec;
pub use lazy::LazyCodec;
pub use verify::{Asymmetry, AsymmetryKind, VerifyReport};

pub use ebcdic_dbcs_core;
pub use ebcdic_dbcs_core::{
    CodecError, CodecParams, DecodeTable, Decoder, DecoderResult, EncodeTable, EncodedUnit,
    Encoder, EncoderResult, ErrorMode, REPLACEMENT_CHAR, SI, SO, ShiftState, Substitution,
    TableStats,
};
pub use ebcdic_dbcs_tables;
pub use ebcdic_dbcs_tables::{
    BuildOptions, BuildResult, BuildWarning, BuildWarningCode, Mapping, Precision, TableBlob,
    TableBuilder, TableError, UcmFile,
};
