use std::path::Path;

use ebcdic_dbcs::ErrorMode;
use ebcdic_dbcs::transcode::from_ebcdic;

use crate::cli::TableArgs;
use crate::shared::{load_codec, read_input, resolve_encoding, write_output};

pub fn run(
    table: &TableArgs,
    input: Option<&Path>,
    output: Option<&Path>,
    output_encoding: &str,
    strict: bool,
) -> Result<(), i32> {
    let encoding = resolve_encoding(output_encoding)?;
    let codec = load_codec(table, Default::default())?;
    let bytes = read_input(input)?;

    let mode = if strict { ErrorMode::Strict } else { ErrorMode::Replace };
    let out = from_ebcdic(&codec, &bytes, encoding, mode).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    write_output(output, &out)
}
