//! The [`Codec`] type: one EBCDIC code page, ready to convert.

use ebcdic_dbcs_core::{
    CodecError, DecodeTable, Decoder, EncodeTable, EncodedUnit, Encoder, ErrorMode, Substitution,
    TableStats, decode_all, encode_all, lookup,
};
use ebcdic_dbcs_tables::{
    BuildOptions, BuildResult, BuildWarning, BuildWarningCode, TableBlob, TableBuilder, TableError,
    UcmFile,
};

use crate::verify::{self, VerifyReport};

/// Name used when a mapping source does not declare one.
const UNNAMED: &str = "unnamed";

/// A code page: its identity, substitution bytes and both lookup tables.
///
/// Immutable once built. Share it by reference, in an `Arc`, or through a
/// [`LazyCodec`](crate::LazyCodec) static.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    name: String,
    ccsid: Option<u32>,
    substitution: Substitution,
    decode: DecodeTable,
    encode: EncodeTable,
}

impl Codec {
    pub fn new(
        name: impl Into<String>,
        ccsid: Option<u32>,
        substitution: Substitution,
        decode: DecodeTable,
        encode: EncodeTable,
    ) -> Self {
        Self {
            name: name.into(),
            ccsid,
            substitution,
            decode,
            encode,
        }
    }

    /// Build a codec from UCM mapping-file text.
    ///
    /// Name, CCSID and substitution bytes come from the file header. Skipped
    /// lines are reported as warnings on the result; with
    /// [`BuildOptions::strict`] they are errors.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the file is malformed or its mappings
    /// conflict.
    pub fn from_ucm_str(text: &str, options: &BuildOptions) -> Result<BuildResult<Self>, CodecError> {
        let parsed = UcmFile::parse(text)?;
        let header = parsed.value.header.clone();
        let built = TableBuilder::from_ucm(parsed)?.build(options)?;

        let codec = built.map(|tables| Self {
            name: header
                .code_set_name
                .clone()
                .unwrap_or_else(|| UNNAMED.to_string()),
            ccsid: header.ccsid(),
            substitution: header.substitution(),
            decode: tables.decode,
            encode: tables.encode,
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = %codec.value.name,
            ccsid = ?codec.value.ccsid,
            warnings = codec.warnings.len(),
            "built codec from UCM"
        );

        Ok(codec)
    }

    /// Load a codec from a file holding either a compiled table blob or UCM
    /// text. Blobs are recognised by their magic bytes.
    ///
    /// A blob is already laid out, so non-default layout options produce an
    /// [`BuildWarningCode::IgnoredOptions`] warning when loading one.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IoError`] if the file cannot be read, any
    /// error of [`Codec::from_blob`] / [`Codec::from_ucm_str`], or the
    /// ignored-options warning as an error when `options.strict` is set.
    #[cfg(feature = "std")]
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: &BuildOptions,
    ) -> Result<BuildResult<Self>, CodecError> {
        let bytes = std::fs::read(path.as_ref())?;
        if TableBlob::looks_like_blob(&bytes) {
            let codec = Self::from_blob(&bytes)?;
            let layout = BuildOptions {
                strict: false,
                ..options.clone()
            };
            if layout == BuildOptions::default() {
                return Ok(BuildResult::ok(codec));
            }
            let warning = BuildWarning::new(
                BuildWarningCode::IgnoredOptions,
                "build options have no effect on a compiled table blob",
            );
            if options.strict {
                return Err(TableError::Strict(warning).into());
            }
            return Ok(BuildResult::with_warnings(codec, vec![warning]));
        }
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| CodecError::Other(format!("mapping file is not UTF-8: {e}")))?;
        Self::from_ucm_str(text, options)
    }

    /// Load a codec from a compiled table blob.
    pub fn from_blob(bytes: &[u8]) -> Result<Self, CodecError> {
        let blob = TableBlob::from_bytes(bytes)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(name = %blob.name, bytes = bytes.len(), "loaded codec blob");

        Ok(Self {
            name: blob.name,
            ccsid: blob.ccsid,
            substitution: blob.substitution,
            decode: blob.decode,
            encode: blob.encode,
        })
    }

    /// Serialize the codec into a table blob.
    pub fn to_blob(&self) -> Result<Vec<u8>, CodecError> {
        let blob = TableBlob {
            name: self.name.clone(),
            ccsid: self.ccsid,
            substitution: self.substitution,
            decode: self.decode.clone(),
            encode: self.encode.clone(),
        };
        Ok(blob.to_bytes()?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ccsid(&self) -> Option<u32> {
        self.ccsid
    }

    pub fn substitution(&self) -> &Substitution {
        &self.substitution
    }

    /// Replace the bytes written for unmappable characters.
    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    pub fn decode_table(&self) -> &DecodeTable {
        &self.decode
    }

    pub fn encode_table(&self) -> &EncodeTable {
        &self.encode
    }

    /// Decode one 16-bit unit; U+FFFD when unmapped.
    #[inline]
    pub fn decode_unit(&self, unit: u16) -> char {
        lookup::decode_unit(&self.decode, unit)
    }

    #[inline]
    pub fn decode_single(&self, byte: u8) -> char {
        lookup::decode_single(&self.decode, byte)
    }

    #[inline]
    pub fn decode_double(&self, lead: u8, trail: u8) -> char {
        lookup::decode_double(&self.decode, lead, trail)
    }

    /// Encode one character; `None` when unmapped.
    #[inline]
    pub fn encode_char(&self, ch: char) -> Option<EncodedUnit> {
        lookup::encode_char(&self.encode, ch)
    }

    #[inline]
    pub fn can_encode(&self, ch: char) -> bool {
        lookup::can_encode(&self.encode, ch)
    }

    /// An incremental SO/SI stream decoder.
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.decode)
    }

    /// An incremental SO/SI stream encoder.
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.encode)
    }

    /// Decode a complete SO/SI framed byte string.
    ///
    /// # Errors
    ///
    /// In [`ErrorMode::Strict`], returns the position of the first malformed
    /// or unmappable sequence.
    pub fn decode(&self, bytes: &[u8], mode: ErrorMode) -> Result<String, CodecError> {
        decode_all(&self.decode, bytes, mode)
    }

    /// Encode a string as SO/SI framed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnmappableChar`] in [`ErrorMode::Strict`], or in
    /// either mode when the codec has no substitution bytes.
    pub fn encode(&self, text: &str, mode: ErrorMode) -> Result<Vec<u8>, CodecError> {
        encode_all(&self.encode, text, mode, &self.substitution)
    }

    pub fn stats(&self) -> TableStats {
        TableStats::collect(&self.decode, &self.encode)
    }

    /// Check both tables over their full key space.
    pub fn verify(&self) -> VerifyReport {
        verify::verify(&self.decode, &self.encode)
    }
}
