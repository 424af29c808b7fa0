//! One-time codec initialisation for `static` items.

use std::sync::OnceLock;

use ebcdic_dbcs_core::CodecError;
use ebcdic_dbcs_tables::BuildOptions;

use crate::codec::Codec;

#[derive(Debug, Clone, Copy)]
enum Source {
    Blob(&'static [u8]),
    Ucm(&'static str),
}

/// A codec built from embedded data on first use.
///
/// ```ignore
/// static IBM935: LazyCodec = LazyCodec::from_blob(include_bytes!("ibm935.edbt"));
///
/// let text = IBM935.get()?.decode(bytes, ErrorMode::Replace)?;
/// ```
///
/// The outcome of the first build, success or error, is kept for every
/// later call.
#[derive(Debug)]
pub struct LazyCodec {
    source: Source,
    cell: OnceLock<Result<Codec, CodecError>>,
}

impl LazyCodec {
    /// A codec loaded from a compiled table blob.
    pub const fn from_blob(bytes: &'static [u8]) -> Self {
        Self {
            source: Source::Blob(bytes),
            cell: OnceLock::new(),
        }
    }

    /// A codec built from UCM text with default [`BuildOptions`].
    pub const fn from_ucm(text: &'static str) -> Self {
        Self {
            source: Source::Ucm(text),
            cell: OnceLock::new(),
        }
    }

    /// The codec, building it if this is the first call.
    ///
    /// # Errors
    ///
    /// Returns the error the first build produced.
    pub fn get(&self) -> Result<&Codec, CodecError> {
        self.cell
            .get_or_init(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!(source = ?self.source_kind(), "initialising lazy codec");

                match self.source {
                    Source::Blob(bytes) => Codec::from_blob(bytes),
                    Source::Ucm(text) => {
                        Codec::from_ucm_str(text, &BuildOptions::default()).map(|r| r.value)
                    }
                }
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether the first build has already run.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    #[cfg(feature = "tracing")]
    fn source_kind(&self) -> &'static str {
        match self.source {
            Source::Blob(_) => "blob",
            Source::Ucm(_) => "ucm",
        }
    }
}
