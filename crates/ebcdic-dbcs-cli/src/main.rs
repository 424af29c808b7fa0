mod cli;
mod code_range;
mod compile_cmd;
mod decode_cmd;
mod encode_cmd;
mod info_cmd;
mod lookup_cmd;
mod shared;
mod verify_cmd;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            ref table,
            ref input,
            ref output,
            ref output_encoding,
            strict,
        } => decode_cmd::run(
            table,
            input.as_deref(),
            output.as_deref(),
            output_encoding,
            strict,
        ),
        Commands::Encode {
            ref table,
            ref input,
            ref output,
            ref input_encoding,
            strict,
        } => encode_cmd::run(
            table,
            input.as_deref(),
            output.as_deref(),
            input_encoding,
            strict,
        ),
        Commands::Compile {
            ref table,
            ref output,
            overflow_split,
            no_fallbacks,
        } => compile_cmd::run(table, output, overflow_split, no_fallbacks),
        Commands::Info {
            ref table,
            ref format,
        } => info_cmd::run(table, format),
        Commands::Lookup {
            ref table,
            ref keys,
            ref format,
        } => lookup_cmd::run(table, keys, format),
        Commands::Verify {
            ref table,
            ref format,
        } => verify_cmd::run(table, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
