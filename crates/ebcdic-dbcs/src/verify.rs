//! Exhaustive consistency checks over a pair of tables.
//!
//! Every one of the 65536 byte units is decoded and every BMP scalar value
//! is encoded. A decoded character that does not encode back to its own
//! unit is recorded as an [`Asymmetry`]: expected for reverse-fallback
//! entries, a defect when the re-encoded unit decodes to something else.

use ebcdic_dbcs_core::{DecodeTable, EncodeTable, EncodedUnit, REPLACEMENT_CHAR, decode_unit, encode_char};

/// How a decoded character fails to encode back to its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsymmetryKind {
    /// The character encodes to another unit that decodes to it as well.
    ManyToOne,
    /// The character has no encoding at all.
    DecodeOnly,
    /// The character encodes to a unit that decodes to a different
    /// character.
    Mismatch,
}

/// A byte unit whose decoded character does not round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Asymmetry {
    pub unit: u16,
    pub ch: char,
    /// What `ch` encodes to, if anything.
    pub encoded: Option<EncodedUnit>,
    pub kind: AsymmetryKind,
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerifyReport {
    /// Units decoded (always 65536).
    pub units_checked: usize,
    /// Units that decode to something other than U+FFFD.
    pub units_mapped: usize,
    /// BMP scalar values encoded.
    pub chars_checked: usize,
    /// Characters with an encoding.
    pub chars_encodable: usize,
    /// Decoded units whose character encodes straight back to them.
    pub round_trips: usize,
    /// Encodable characters whose unit decodes to a different character
    /// (fallback mappings).
    pub encode_fallbacks: usize,
    /// `Some(ok)` when either table maps NUL: whether `0x00` and U+0000
    /// map to each other in both directions. `None` when neither does.
    pub nul_round_trip: Option<bool>,
    /// Whether a second pass over a sample of keys gave identical results.
    pub idempotent: bool,
    pub asymmetries: Vec<Asymmetry>,
}

impl VerifyReport {
    pub fn mismatches(&self) -> impl Iterator<Item = &Asymmetry> {
        self.asymmetries
            .iter()
            .filter(|a| a.kind == AsymmetryKind::Mismatch)
    }

    /// No mismatches, NUL handled correctly and stable lookups.
    pub fn is_consistent(&self) -> bool {
        self.mismatches().next().is_none() && self.nul_round_trip != Some(false) && self.idempotent
    }
}

enum UnitCheck {
    Unmapped,
    RoundTrip,
    Asymmetric(Asymmetry),
}

fn check_unit(decode: &DecodeTable, encode: &EncodeTable, unit: u16) -> UnitCheck {
    let ch = decode_unit(decode, unit);
    if ch == REPLACEMENT_CHAR {
        return UnitCheck::Unmapped;
    }
    let encoded = encode_char(encode, ch);
    let kind = match encoded {
        Some(e) if e.packed() == unit => return UnitCheck::RoundTrip,
        Some(e) if decode_unit(decode, e.packed()) == ch => AsymmetryKind::ManyToOne,
        Some(_) => AsymmetryKind::Mismatch,
        None => AsymmetryKind::DecodeOnly,
    };
    UnitCheck::Asymmetric(Asymmetry {
        unit,
        ch,
        encoded,
        kind,
    })
}

/// `(encodable, fallback)` for one code point.
fn check_char(decode: &DecodeTable, encode: &EncodeTable, code: u32) -> (bool, bool) {
    let Some(ch) = char::from_u32(code) else {
        return (false, false);
    };
    match encode_char(encode, ch) {
        Some(e) => (true, decode_unit(decode, e.packed()) != ch),
        None => (false, false),
    }
}

/// Run every check over the full key space.
///
/// With the `parallel` feature the unit and code point sweeps run on the
/// rayon thread pool; the report is identical either way.
pub fn verify(decode: &DecodeTable, encode: &EncodeTable) -> VerifyReport {
    let mut report = VerifyReport {
        units_checked: 1 << 16,
        ..VerifyReport::default()
    };

    let units = sweep_units(decode, encode);
    for check in units {
        match check {
            UnitCheck::Unmapped => {}
            UnitCheck::RoundTrip => {
                report.units_mapped += 1;
                report.round_trips += 1;
            }
            UnitCheck::Asymmetric(a) => {
                report.units_mapped += 1;
                report.asymmetries.push(a);
            }
        }
    }

    let chars = sweep_chars(decode, encode);
    report.chars_checked = chars.len();
    for (encodable, fallback) in chars {
        report.chars_encodable += usize::from(encodable);
        report.encode_fallbacks += usize::from(fallback);
    }

    let nul_decoded = decode_unit(decode, 0) == '\0';
    let nul_encoded = encode_char(encode, '\0');
    if nul_decoded || nul_encoded.is_some() {
        report.nul_round_trip = Some(nul_decoded && nul_encoded == Some(EncodedUnit::Single(0)));
    }

    report.idempotent = (0..=u16::MAX).step_by(97).all(|key| {
        decode_unit(decode, key) == decode_unit(decode, key)
            && char::from_u32(u32::from(key))
                .is_none_or(|ch| encode_char(encode, ch) == encode_char(encode, ch))
    });

    #[cfg(feature = "tracing")]
    tracing::debug!(
        units_mapped = report.units_mapped,
        chars_encodable = report.chars_encodable,
        asymmetries = report.asymmetries.len(),
        "verified tables"
    );

    report
}

#[cfg(not(feature = "parallel"))]
fn sweep_units(decode: &DecodeTable, encode: &EncodeTable) -> Vec<UnitCheck> {
    (0..=u16::MAX)
        .map(|unit| check_unit(decode, encode, unit))
        .collect()
}

#[cfg(feature = "parallel")]
fn sweep_units(decode: &DecodeTable, encode: &EncodeTable) -> Vec<UnitCheck> {
    use rayon::prelude::*;

    (0u32..0x1_0000)
        .into_par_iter()
        .map(|unit| check_unit(decode, encode, unit as u16))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn sweep_chars(decode: &DecodeTable, encode: &EncodeTable) -> Vec<(bool, bool)> {
    (0u32..0x1_0000)
        .filter(|&code| char::from_u32(code).is_some())
        .map(|code| check_char(decode, encode, code))
        .collect()
}

#[cfg(feature = "parallel")]
fn sweep_chars(decode: &DecodeTable, encode: &EncodeTable) -> Vec<(bool, bool)> {
    use rayon::prelude::*;

    (0u32..0x1_0000)
        .into_par_iter()
        .filter(|&code| char::from_u32(code).is_some())
        .map(|code| check_char(decode, encode, code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebcdic_dbcs_tables::{BuildOptions, Mapping, TableBuilder};

    fn tables(mappings: &[Mapping]) -> (DecodeTable, EncodeTable) {
        let mut b = TableBuilder::new();
        b.extend(mappings.iter().copied()).unwrap();
        let built = b.build(&BuildOptions::default()).unwrap().value;
        (built.decode, built.encode)
    }

    #[test]
    fn clean_tables_round_trip() {
        let (d, e) = tables(&[
            Mapping::round_trip('\0', EncodedUnit::Single(0)),
            Mapping::round_trip('A', EncodedUnit::Single(0xC1)),
            Mapping::round_trip('\u{3000}', EncodedUnit::Double(0x40, 0x40)),
        ]);
        let report = verify(&d, &e);
        assert_eq!(report.units_checked, 65536);
        assert_eq!(report.units_mapped, 3);
        assert_eq!(report.round_trips, 3);
        assert_eq!(report.chars_checked, 0x10000 - 0x800);
        assert_eq!(report.chars_encodable, 3);
        assert_eq!(report.nul_round_trip, Some(true));
        assert!(report.idempotent);
        assert!(report.asymmetries.is_empty());
        assert!(report.is_consistent());
    }

    #[test]
    fn reverse_fallback_is_many_to_one() {
        let (d, e) = tables(&[
            Mapping::round_trip('\u{FF5E}', EncodedUnit::Double(0x43, 0xA1)),
            Mapping::reverse_fallback('\u{FF5E}', EncodedUnit::Double(0x44, 0x7F)),
        ]);
        let report = verify(&d, &e);
        assert_eq!(
            report.asymmetries,
            vec![Asymmetry {
                unit: 0x447F,
                ch: '\u{FF5E}',
                encoded: Some(EncodedUnit::Double(0x43, 0xA1)),
                kind: AsymmetryKind::ManyToOne,
            }]
        );
        assert!(report.is_consistent());
        assert_eq!(report.nul_round_trip, None);
    }

    #[test]
    fn decode_only_entry() {
        let (d, e) = tables(&[Mapping::reverse_fallback('\u{2225}', EncodedUnit::Double(0x44, 0x7E))]);
        let report = verify(&d, &e);
        assert_eq!(report.asymmetries.len(), 1);
        assert_eq!(report.asymmetries[0].kind, AsymmetryKind::DecodeOnly);
        assert!(report.is_consistent());
    }

    #[test]
    fn fallbacks_are_counted() {
        let (d, e) = tables(&[
            Mapping::round_trip('$', EncodedUnit::Single(0x5B)),
            Mapping::fallback('\u{00A5}', EncodedUnit::Single(0x5B)),
        ]);
        let report = verify(&d, &e);
        assert_eq!(report.chars_encodable, 2);
        assert_eq!(report.encode_fallbacks, 1);
        assert!(report.asymmetries.is_empty());
    }

    #[test]
    fn tables_without_nul_leave_it_unencodable() {
        let (d, e) = tables(&[Mapping::round_trip('A', EncodedUnit::Single(0xC1))]);
        assert_eq!(encode_char(&e, '\0'), None);
        let report = verify(&d, &e);
        assert_eq!(report.nul_round_trip, None);
        assert_eq!(report.chars_encodable, 1);
        assert!(report.is_consistent());
    }

    #[test]
    fn nul_encodable_without_decode_is_inconsistent() {
        let (d, _) = tables(&[Mapping::round_trip('A', EncodedUnit::Single(0xC1))]);
        let (_, e) = tables(&[
            Mapping::round_trip('\0', EncodedUnit::Single(0)),
            Mapping::round_trip('A', EncodedUnit::Single(0xC1)),
        ]);
        let report = verify(&d, &e);
        assert_eq!(report.nul_round_trip, Some(false));
        assert!(!report.is_consistent());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn report_serializes_to_json() {
        let (d, e) = tables(&[
            Mapping::round_trip('\u{FF5E}', EncodedUnit::Double(0x43, 0xA1)),
            Mapping::reverse_fallback('\u{FF5E}', EncodedUnit::Double(0x44, 0x7F)),
        ]);
        let report = verify(&d, &e);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"kind\":\"ManyToOne\""));
        let back: VerifyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn mismatch_is_inconsistent() {
        // Hand-built tables where 'A' decodes from 0xC1 but encodes to 0xC2,
        // which decodes to 'B'.
        let (d, _) = tables(&[
            Mapping::round_trip('A', EncodedUnit::Single(0xC1)),
            Mapping::round_trip('B', EncodedUnit::Single(0xC2)),
        ]);
        let (_, e) = tables(&[Mapping::round_trip('A', EncodedUnit::Single(0xC2))]);
        let report = verify(&d, &e);
        assert_eq!(report.mismatches().count(), 1);
        assert!(!report.is_consistent());
    }
}
