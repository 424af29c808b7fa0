/// A key to look up: a byte unit or a code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LookupKey {
    /// A 16-bit unit, `0x00bb` for single bytes.
    Unit(u16),
    /// A code point in `U+0000..=U+FFFF`, not necessarily a scalar value.
    CodePoint(u32),
}

/// Parse a key list like "0xC1,0x4040-0x4045,U+3000" into a sorted list.
///
/// `0x` prefixes byte units, `U+` prefixes code points. A range joins two
/// keys of the same kind. Returns an error for malformed or reversed ranges.
pub fn parse_code_range(input: &str) -> Result<Vec<LookupKey>, String> {
    let mut keys = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = part.split_once('-') {
            let start = parse_key(start_str.trim())?;
            let end = parse_key(end_str.trim())?;
            match (start, end) {
                (LookupKey::Unit(a), LookupKey::Unit(b)) if a <= b => {
                    keys.extend((a..=b).map(LookupKey::Unit));
                }
                (LookupKey::CodePoint(a), LookupKey::CodePoint(b)) if a <= b => {
                    keys.extend((a..=b).map(LookupKey::CodePoint));
                }
                (LookupKey::Unit(_), LookupKey::Unit(_))
                | (LookupKey::CodePoint(_), LookupKey::CodePoint(_)) => {
                    return Err(format!("range '{part}' ends before it starts"));
                }
                _ => return Err(format!("range '{part}' mixes units and code points")),
            }
        } else {
            keys.push(parse_key(part)?);
        }
    }

    keys.sort();
    keys.dedup();
    Ok(keys)
}

fn parse_key(s: &str) -> Result<LookupKey, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
            .map(LookupKey::Unit)
            .map_err(|_| format!("invalid byte unit: '{s}'"))
    } else if let Some(hex) = s.strip_prefix("U+").or_else(|| s.strip_prefix("u+")) {
        match u32::from_str_radix(hex, 16) {
            Ok(code) if code <= 0xFFFF => Ok(LookupKey::CodePoint(code)),
            Ok(_) => Err(format!("code point outside the BMP: '{s}'")),
            Err(_) => Err(format!("invalid code point: '{s}'")),
        }
    } else {
        Err(format!("expected '0x..' or 'U+..', found '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_unit() {
        assert_eq!(parse_code_range("0xC1").unwrap(), vec![LookupKey::Unit(0xC1)]);
    }

    #[test]
    fn unit_range() {
        assert_eq!(
            parse_code_range("0x4040-0x4042").unwrap(),
            vec![
                LookupKey::Unit(0x4040),
                LookupKey::Unit(0x4041),
                LookupKey::Unit(0x4042)
            ]
        );
    }

    #[test]
    fn mixed_kinds() {
        assert_eq!(
            parse_code_range("U+3000,0xC1").unwrap(),
            vec![LookupKey::Unit(0xC1), LookupKey::CodePoint(0x3000)]
        );
    }

    #[test]
    fn code_point_range() {
        assert_eq!(parse_code_range("U+4E00-U+4E01").unwrap().len(), 2);
    }

    #[test]
    fn reversed_range_invalid() {
        let err = parse_code_range("0x4045-0x4040").unwrap_err();
        assert!(err.contains("ends before"));
    }

    #[test]
    fn mixed_range_invalid() {
        let err = parse_code_range("0x40-U+40").unwrap_err();
        assert!(err.contains("mixes"));
    }

    #[test]
    fn supplementary_invalid() {
        let err = parse_code_range("U+20000").unwrap_err();
        assert!(err.contains("BMP"));
    }

    #[test]
    fn missing_prefix_invalid() {
        assert!(parse_code_range("4040").is_err());
    }

    #[test]
    fn duplicates_removed() {
        assert_eq!(parse_code_range("0xC1,0xC1").unwrap().len(), 1);
    }

    #[test]
    fn whitespace_tolerance() {
        assert_eq!(
            parse_code_range(" 0xC1 , U+0041 - U+0042 ").unwrap(),
            vec![
                LookupKey::Unit(0xC1),
                LookupKey::CodePoint(0x41),
                LookupKey::CodePoint(0x42)
            ]
        );
    }
}
