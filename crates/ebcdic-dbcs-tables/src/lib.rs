//! ebcdic-dbcs-tables: where codec tables come from.
//!
//! Parses IBM/ICU UCM mapping files ([`UcmFile`]), packs mappings into the
//! two-level tables of `ebcdic-dbcs-core` ([`TableBuilder`]), and stores
//! the result in a compact binary form ([`TableBlob`]).

pub mod blob;
pub mod builder;
pub mod error;
pub mod mapping;
pub mod ucm;

pub use blob::TableBlob;
pub use builder::{BuildOptions, BuiltTables, TableBuilder};
pub use error::{BuildResult, BuildWarning, BuildWarningCode, TableError};
pub use mapping::{Mapping, Precision};
pub use ucm::{UcmFile, UcmHeader, parse_byte_string};
