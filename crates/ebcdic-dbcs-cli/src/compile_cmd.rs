use std::path::Path;

use ebcdic_dbcs::BuildOptions;

use crate::cli::TableArgs;
use crate::shared::{load_codec, write_output};

pub fn run(
    table: &TableArgs,
    output: &Path,
    overflow_split: Option<usize>,
    no_fallbacks: bool,
) -> Result<(), i32> {
    let options = BuildOptions {
        overflow_split,
        include_fallbacks: !no_fallbacks,
        ..BuildOptions::default()
    };
    let codec = load_codec(table, options)?;

    let blob = codec.to_blob().map_err(|e| {
        eprintln!("Error: failed to serialize tables: {e}");
        1
    })?;
    write_output(Some(output), &blob)?;

    tracing::debug!(bytes = blob.len(), path = %output.display(), "wrote table blob");
    eprintln!("Wrote {} ({} bytes)", output.display(), blob.len());
    Ok(())
}
