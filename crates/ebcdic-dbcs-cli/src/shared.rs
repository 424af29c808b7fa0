use std::io::{self, Read, Write};
use std::path::Path;

use ebcdic_dbcs::transcode::{Encoding, encoding_for_label};
use ebcdic_dbcs::{BuildOptions, Codec, EncodedUnit};

use crate::cli::TableArgs;

/// Install a stderr log subscriber when `--verbose` is given.
pub fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }
}

/// Load a codec with user-friendly error messages.
///
/// Mapping-file warnings are printed to stderr. Returns `Err(1)` if the file
/// is missing or cannot be built.
pub fn load_codec(args: &TableArgs, options: BuildOptions) -> Result<Codec, i32> {
    if !args.table.exists() {
        eprintln!("Error: file not found: {}", args.table.display());
        return Err(1);
    }
    let options = BuildOptions {
        strict: args.strict_table,
        ..options
    };

    let built = Codec::open_file(&args.table, &options).map_err(|e| {
        eprintln!("Error: failed to load table: {e}");
        1
    })?;
    for warning in &built.warnings {
        eprintln!("Warning: {warning}");
    }
    tracing::debug!(name = built.value.name(), "table loaded");
    Ok(built.value)
}

/// Read all of `input`, or stdin for `None` / `-`.
pub fn read_input(input: Option<&Path>) -> Result<Vec<u8>, i32> {
    let mut buf = Vec::new();
    let result = match input {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                eprintln!("Error: file not found: {}", path.display());
                return Err(1);
            }
            std::fs::File::open(path).and_then(|mut f| f.read_to_end(&mut buf))
        }
        _ => io::stdin().read_to_end(&mut buf),
    };
    result.map_err(|e| {
        eprintln!("Error: failed to read input: {e}");
        1
    })?;
    Ok(buf)
}

/// Write `bytes` to `output`, or stdout for `None`.
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), i32> {
    let result = match output {
        Some(path) => std::fs::write(path, bytes),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes).and_then(|()| stdout.flush())
        }
    };
    result.map_err(|e| {
        eprintln!("Error: failed to write output: {e}");
        1
    })
}

/// Resolve an encoding label, failing with a message for unknown labels.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, i32> {
    encoding_for_label(label).map_err(|e| {
        eprintln!("Error: {e}");
        2
    })
}

/// Format an encoded unit as hex bytes, e.g. `0x4C41`.
pub fn unit_str(unit: EncodedUnit) -> String {
    match unit {
        EncodedUnit::Single(b) => format!("0x{b:02X}"),
        EncodedUnit::Double(lead, trail) => format!("0x{lead:02X}{trail:02X}"),
    }
}

/// Format a character as `U+XXXX`.
pub fn char_str(ch: char) -> String {
    format!("U+{:04X}", u32::from(ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_str_single() {
        assert_eq!(unit_str(EncodedUnit::Single(0xC1)), "0xC1");
    }

    #[test]
    fn unit_str_double() {
        assert_eq!(unit_str(EncodedUnit::Double(0x4C, 0x41)), "0x4C41");
    }

    #[test]
    fn char_str_pads() {
        assert_eq!(char_str('A'), "U+0041");
        assert_eq!(char_str('\u{4E00}'), "U+4E00");
    }

    #[test]
    fn unknown_encoding_is_usage_error() {
        assert_eq!(resolve_encoding("no-such-charset"), Err(2));
        assert!(resolve_encoding("gb18030").is_ok());
    }
}
