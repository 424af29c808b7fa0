//! Error and warning types for table sources.
//!
//! Uses [`thiserror`] for [`TableError`], which converts into the core
//! [`CodecError`]. Non-fatal issues found while reading a mapping file are
//! collected as [`BuildWarning`]s alongside the result.

use std::fmt;

use ebcdic_dbcs_core::CodecError;
use thiserror::Error;

/// Error type for mapping-file parsing, table building and blob loading.
#[derive(Debug, Error)]
pub enum TableError {
    /// A mapping-file line that cannot be parsed.
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Two mappings that cannot both hold.
    #[error("mapping conflict: {0}")]
    Conflict(String),

    /// A mapping the table layout cannot express.
    #[error("unrepresentable mapping: {0}")]
    Unrepresentable(String),

    /// A truncated or corrupt binary blob.
    #[error("table blob error: {0}")]
    Blob(String),

    /// A warning escalated by strict building.
    #[error("strict mode: {0}")]
    Strict(BuildWarning),

    /// Error reading table data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A core table invariant failed.
    #[error(transparent)]
    Core(#[from] CodecError),
}

impl From<TableError> for CodecError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Io(e) => CodecError::IoError(e.to_string()),
            TableError::Core(e) => e,
            TableError::Blob(msg) => CodecError::InvalidTable(msg),
            other => CodecError::Other(other.to_string()),
        }
    }
}

/// Machine-readable category of a [`BuildWarning`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildWarningCode {
    /// A mapping to a sequence of several code points.
    MultiCodePoint,
    /// A mapping for a code point above U+FFFF.
    Supplementary,
    /// A byte sequence longer than two bytes.
    UnsupportedLength,
    /// A precision indicator this table layout does not use (`|2`, `|4`).
    UnsupportedPrecision,
    /// A header key that is not recognised.
    UnknownHeader,
    /// A decode mapping to U+FFFD, which the table reserves for "unmapped".
    ReservedCodePoint,
    /// Build options given for a source that is already built.
    IgnoredOptions,
}

impl BuildWarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildWarningCode::MultiCodePoint => "MULTI_CODE_POINT",
            BuildWarningCode::Supplementary => "SUPPLEMENTARY",
            BuildWarningCode::UnsupportedLength => "UNSUPPORTED_LENGTH",
            BuildWarningCode::UnsupportedPrecision => "UNSUPPORTED_PRECISION",
            BuildWarningCode::UnknownHeader => "UNKNOWN_HEADER",
            BuildWarningCode::ReservedCodePoint => "RESERVED_CODE_POINT",
            BuildWarningCode::IgnoredOptions => "IGNORED_OPTIONS",
        }
    }
}

impl fmt::Display for BuildWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue met while reading a mapping source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildWarning {
    pub code: BuildWarningCode,
    pub description: String,
    /// 1-based source line, when the warning comes from a file.
    pub line: Option<usize>,
}

impl BuildWarning {
    pub fn new(code: BuildWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            line: None,
        }
    }

    pub fn on_line(code: BuildWarningCode, description: impl Into<String>, line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::new(code, description)
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

/// A value paired with the warnings collected while producing it.
#[derive(Debug, Clone)]
pub struct BuildResult<T> {
    pub value: T,
    pub warnings: Vec<BuildWarning>,
}

impl<T> BuildResult<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<BuildWarning>) -> Self {
        Self { value, warnings }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BuildResult<U> {
        BuildResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
