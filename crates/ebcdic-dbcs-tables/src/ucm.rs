//! Parser for UCM mapping files.
//!
//! UCM is the text format IBM and ICU publish codepage mappings in. A file
//! has a header of `<key> value` lines, then a `CHARMAP` ... `END CHARMAP`
//! section with one mapping per line:
//!
//! ```text
//! <code_set_name>  "ibm-935_P110-1999"
//! <uconv_class>    "EBCDIC_STATEFUL"
//! <subchar>        \xFE\xFE
//! <subchar1>       \x3F
//! CHARMAP
//! <U0041>  \xC1      |0
//! <U3000>  \x40\x40  |0
//! END CHARMAP
//! ```
//!
//! Only what a two-level BMP table can hold is kept; other lines are
//! skipped with a [`BuildWarning`].

use std::sync::LazyLock;

use ebcdic_dbcs_core::{EncodedUnit, Substitution};
use regex::Regex;

use crate::error::{BuildResult, BuildWarning, BuildWarningCode, TableError};
use crate::mapping::{Mapping, Precision};

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^>\s]+)>\s+(.*)$").expect("valid header regex"));

static MAPPING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<U([0-9A-Fa-f]{4,6})>((?:\+?<U[0-9A-Fa-f]{4,6}>)*)\s+((?:\\x[0-9A-Fa-f]{2})+)(?:\s*\|(\d))?\s*$",
    )
    .expect("valid mapping regex")
});

static CCSID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ibm-?(\d+)").expect("valid ccsid regex"));

const KNOWN_HEADERS: &[&str] = &[
    "code_set_name",
    "char_name_mask",
    "mb_cur_max",
    "mb_cur_min",
    "uconv_class",
    "subchar",
    "subchar1",
    "icu:charsetFamily",
    "icu:state",
    "icu:base",
    "icu:alias",
];

/// Header values of a UCM file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UcmHeader {
    pub code_set_name: Option<String>,
    pub uconv_class: Option<String>,
    pub mb_cur_max: Option<u8>,
    pub mb_cur_min: Option<u8>,
    pub subchar: Option<Vec<u8>>,
    pub subchar1: Option<u8>,
    pub charset_family: Option<String>,
}

impl UcmHeader {
    /// The IBM CCSID encoded in a code set name such as `ibm-935_P110-1999`.
    pub fn ccsid(&self) -> Option<u32> {
        let name = self.code_set_name.as_deref()?;
        CCSID.captures(name)?.get(1)?.as_str().parse().ok()
    }

    /// Whether the file describes an SO/SI stateful EBCDIC codepage.
    pub fn is_stateful(&self) -> bool {
        self.uconv_class.as_deref() == Some("EBCDIC_STATEFUL")
    }

    /// Substitution bytes from `<subchar>` and `<subchar1>`, or the
    /// conventional defaults when neither is declared.
    pub fn substitution(&self) -> Substitution {
        if self.subchar.is_none() && self.subchar1.is_none() {
            return Substitution::default();
        }
        let sub = self.subchar.as_deref();
        Substitution {
            sbcs: self.subchar1.or(match sub {
                Some(&[b]) => Some(b),
                _ => None,
            }),
            dbcs: match sub {
                Some(&[lead, trail]) => Some([lead, trail]),
                _ => None,
            },
        }
    }
}

/// A parsed UCM file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UcmFile {
    pub header: UcmHeader,
    pub mappings: Vec<Mapping>,
}

enum Section {
    Header,
    Charmap,
    Done,
}

impl UcmFile {
    /// Parse UCM text, collecting warnings for lines that are skipped.
    pub fn parse(text: &str) -> Result<BuildResult<UcmFile>, TableError> {
        let mut file = UcmFile::default();
        let mut warnings = Vec::new();
        let mut section = Section::Header;
        let mut last_line = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            match section {
                Section::Header => {
                    if line == "CHARMAP" {
                        section = Section::Charmap;
                    } else {
                        parse_header_line(line, line_no, &mut file.header, &mut warnings)?;
                    }
                }
                Section::Charmap => {
                    if line == "END CHARMAP" {
                        section = Section::Done;
                    } else if let Some(mapping) = parse_mapping_line(line, line_no, &mut warnings)? {
                        file.mappings.push(mapping);
                    }
                }
                // Anything after the charmap (extension tables) is ignored.
                Section::Done => {}
            }
        }

        match section {
            Section::Header => Err(TableError::Syntax {
                line: last_line,
                message: "missing CHARMAP section".to_string(),
            }),
            Section::Charmap => Err(TableError::Syntax {
                line: last_line,
                message: "unterminated CHARMAP section".to_string(),
            }),
            Section::Done => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    mappings = file.mappings.len(),
                    warnings = warnings.len(),
                    "parsed UCM file"
                );
                Ok(BuildResult::with_warnings(file, warnings))
            }
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse a `\xHH\xHH...` byte string.
pub fn parse_byte_string(s: &str) -> Option<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let hex = rest
            .strip_prefix("\\x")
            .or_else(|| rest.strip_prefix("\\X"))?;
        let (digits, tail) = hex.split_at_checked(2)?;
        bytes.push(u8::from_str_radix(digits, 16).ok()?);
        rest = tail;
    }
    if bytes.is_empty() { None } else { Some(bytes) }
}

fn parse_header_line(
    line: &str,
    line_no: usize,
    header: &mut UcmHeader,
    warnings: &mut Vec<BuildWarning>,
) -> Result<(), TableError> {
    let caps = HEADER_LINE.captures(line).ok_or_else(|| TableError::Syntax {
        line: line_no,
        message: format!("expected a <key> value header line, found '{line}'"),
    })?;
    let key = &caps[1];
    let value = unquote(&caps[2]);

    let bad_value = |what: &str| TableError::Syntax {
        line: line_no,
        message: format!("invalid {what} value '{value}'"),
    };

    match key {
        "code_set_name" => header.code_set_name = Some(value.to_string()),
        "uconv_class" => header.uconv_class = Some(value.to_string()),
        "icu:charsetFamily" => header.charset_family = Some(value.to_string()),
        "mb_cur_max" => header.mb_cur_max = Some(value.parse().map_err(|_| bad_value(key))?),
        "mb_cur_min" => header.mb_cur_min = Some(value.parse().map_err(|_| bad_value(key))?),
        "subchar" => header.subchar = Some(parse_byte_string(value).ok_or_else(|| bad_value(key))?),
        "subchar1" => {
            let bytes = parse_byte_string(value).ok_or_else(|| bad_value(key))?;
            match bytes.as_slice() {
                [b] => header.subchar1 = Some(*b),
                _ => return Err(bad_value(key)),
            }
        }
        k if KNOWN_HEADERS.contains(&k) => {}
        other => warnings.push(BuildWarning::on_line(
            BuildWarningCode::UnknownHeader,
            format!("unknown header <{other}> ignored"),
            line_no,
        )),
    }
    Ok(())
}

fn parse_mapping_line(
    line: &str,
    line_no: usize,
    warnings: &mut Vec<BuildWarning>,
) -> Result<Option<Mapping>, TableError> {
    let syntax = |message: String| TableError::Syntax {
        line: line_no,
        message,
    };

    let caps = MAPPING_LINE
        .captures(line)
        .ok_or_else(|| syntax(format!("expected '<UXXXX> \\xHH |n', found '{line}'")))?;

    let code = u32::from_str_radix(&caps[1], 16)
        .map_err(|_| syntax(format!("invalid code point '{}'", &caps[1])))?;

    if !caps[2].is_empty() {
        warnings.push(BuildWarning::on_line(
            BuildWarningCode::MultiCodePoint,
            format!("U+{code:04X} is part of a multi-code-point mapping, skipped"),
            line_no,
        ));
        return Ok(None);
    }

    let ch = char::from_u32(code)
        .ok_or_else(|| syntax(format!("U+{code:04X} is not a Unicode scalar value")))?;
    if code > 0xFFFF {
        warnings.push(BuildWarning::on_line(
            BuildWarningCode::Supplementary,
            format!("U+{code:04X} is outside the BMP, skipped"),
            line_no,
        ));
        return Ok(None);
    }

    let precision = match caps.get(4) {
        None => Precision::RoundTrip,
        Some(m) => {
            let indicator: u8 = m.as_str().parse().unwrap_or(u8::MAX);
            match Precision::from_indicator(indicator) {
                Some(p) => p,
                None => {
                    warnings.push(BuildWarning::on_line(
                        BuildWarningCode::UnsupportedPrecision,
                        format!("precision |{} for U+{code:04X} is not supported, skipped", m.as_str()),
                        line_no,
                    ));
                    return Ok(None);
                }
            }
        }
    };

    let bytes = parse_byte_string(&caps[3])
        .ok_or_else(|| syntax(format!("invalid byte sequence '{}'", &caps[3])))?;
    let unit = match bytes.as_slice() {
        [b] => EncodedUnit::Single(*b),
        [0, _] => {
            return Err(syntax(format!(
                "double-byte sequence for U+{code:04X} has a zero lead byte"
            )));
        }
        [lead, trail] => EncodedUnit::Double(*lead, *trail),
        _ => {
            warnings.push(BuildWarning::on_line(
                BuildWarningCode::UnsupportedLength,
                format!(
                    "{}-byte sequence for U+{code:04X} is longer than two bytes, skipped",
                    bytes.len()
                ),
                line_no,
            ));
            return Ok(None);
        }
    };

    Ok(Some(Mapping { ch, unit, precision }))
}
