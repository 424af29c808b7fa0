use ebcdic_dbcs::{AsymmetryKind, VerifyReport};

use crate::cli::{OutputFormat, TableArgs};
use crate::shared::{char_str, load_codec, unit_str};

fn kind_str(kind: AsymmetryKind) -> &'static str {
    match kind {
        AsymmetryKind::ManyToOne => "many-to-one",
        AsymmetryKind::DecodeOnly => "decode-only",
        AsymmetryKind::Mismatch => "MISMATCH",
    }
}

fn print_text(report: &VerifyReport) {
    println!("Units checked: {}", report.units_checked);
    println!("Units mapped: {}", report.units_mapped);
    println!("Round trips: {}", report.round_trips);
    println!("Chars checked: {}", report.chars_checked);
    println!("Chars encodable: {}", report.chars_encodable);
    println!("Encode fallbacks: {}", report.encode_fallbacks);
    match report.nul_round_trip {
        Some(true) => println!("NUL: round trip"),
        Some(false) => println!("NUL: BROKEN"),
        None => println!("NUL: unmapped"),
    }
    println!("Asymmetries: {}", report.asymmetries.len());
    for a in &report.asymmetries {
        let encoded = a.encoded.map(unit_str).unwrap_or_else(|| "-".to_string());
        println!(
            "  0x{:04X} -> {} -> {encoded}  {}",
            a.unit,
            char_str(a.ch),
            kind_str(a.kind)
        );
    }
    println!(
        "Result: {}",
        if report.is_consistent() { "consistent" } else { "INCONSISTENT" }
    );
}

/// Exits with status 1 when the tables are inconsistent.
pub fn run(table: &TableArgs, format: &OutputFormat) -> Result<(), i32> {
    let codec = load_codec(table, Default::default())?;
    let report = codec.verify();

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => {
            let mut obj = serde_json::to_value(&report).unwrap();
            obj["consistent"] = serde_json::Value::Bool(report.is_consistent());
            println!("{}", serde_json::to_string_pretty(&obj).unwrap());
        }
    }

    if report.is_consistent() { Ok(()) } else { Err(1) }
}
