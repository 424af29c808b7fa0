use ebcdic_dbcs::{Codec, REPLACEMENT_CHAR};

use crate::cli::{OutputFormat, TableArgs};
use crate::code_range::{LookupKey, parse_code_range};
use crate::shared::{char_str, load_codec, unit_str};

fn lookup_json(codec: &Codec, key: LookupKey) -> serde_json::Value {
    match key {
        LookupKey::Unit(unit) => {
            let ch = codec.decode_unit(unit);
            serde_json::json!({
                "unit": unit,
                "char": (ch != REPLACEMENT_CHAR).then(|| char_str(ch)),
            })
        }
        LookupKey::CodePoint(code) => {
            let unit = char::from_u32(code).and_then(|ch| codec.encode_char(ch));
            serde_json::json!({
                "code_point": code,
                "unit": unit.map(|u| u.packed()),
            })
        }
    }
}

fn lookup_line(codec: &Codec, key: LookupKey) -> String {
    match key {
        LookupKey::Unit(unit) => {
            let ch = codec.decode_unit(unit);
            let label = if unit <= 0xFF {
                format!("0x{unit:02X}")
            } else {
                format!("0x{unit:04X}")
            };
            if ch == REPLACEMENT_CHAR {
                format!("{label}\tunmapped")
            } else {
                format!("{label}\t{}\t{}", char_str(ch), printable(ch))
            }
        }
        LookupKey::CodePoint(code) => {
            let label = format!("U+{code:04X}");
            match char::from_u32(code) {
                None => format!("{label}\tnot a scalar value"),
                Some(ch) => match codec.encode_char(ch) {
                    Some(unit) => format!("{label}\t{}\t{}", unit_str(unit), printable(ch)),
                    None => format!("{label}\tunmapped"),
                },
            }
        }
    }
}

fn printable(ch: char) -> String {
    if ch.is_control() {
        String::new()
    } else {
        ch.to_string()
    }
}

pub fn run(table: &TableArgs, keys: &str, format: &OutputFormat) -> Result<(), i32> {
    let keys = parse_code_range(keys).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let codec = load_codec(table, Default::default())?;

    match format {
        OutputFormat::Text => {
            for key in keys {
                println!("{}", lookup_line(&codec, key).trim_end());
            }
        }
        OutputFormat::Json => {
            let items: Vec<_> = keys.into_iter().map(|k| lookup_json(&codec, k)).collect();
            println!("{}", serde_json::to_string_pretty(&items).unwrap());
        }
    }
    Ok(())
}
