use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Convert, compile and inspect EBCDIC double-byte code page tables.
#[derive(Debug, Parser)]
#[command(name = "ebcdic-dbcs", about, version)]
pub struct Cli {
    /// Log table loading and build details to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the code page comes from.
#[derive(Debug, Args)]
pub struct TableArgs {
    /// UCM mapping file or compiled table blob
    #[arg(long, short, value_name = "TABLE")]
    pub table: PathBuf,

    /// Fail on mapping-file warnings instead of skipping the lines
    #[arg(long)]
    pub strict_table: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode EBCDIC bytes to text
    Decode {
        #[command(flatten)]
        table: TableArgs,

        /// Input file ('-' or omitted: stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Encoding of the output text (any WHATWG label)
        #[arg(long, default_value = "utf-8")]
        output_encoding: String,

        /// Stop at the first malformed or unmappable sequence
        #[arg(long)]
        strict: bool,
    },

    /// Encode text to EBCDIC bytes
    Encode {
        #[command(flatten)]
        table: TableArgs,

        /// Input file ('-' or omitted: stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Encoding of the input text (any WHATWG label)
        #[arg(long, default_value = "utf-8")]
        input_encoding: String,

        /// Stop at the first unmappable character
        #[arg(long)]
        strict: bool,
    },

    /// Compile a UCM mapping file into a table blob
    Compile {
        #[command(flatten)]
        table: TableArgs,

        /// Output blob path
        #[arg(long, short)]
        output: PathBuf,

        /// Move encode entries past this index into the overflow segment
        #[arg(long)]
        overflow_split: Option<usize>,

        /// Leave |1 fallback mappings out of the encode table
        #[arg(long)]
        no_fallbacks: bool,
    },

    /// Show code page identity and table sizes
    Info {
        #[command(flatten)]
        table: TableArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Look up byte units or code points
    Lookup {
        #[command(flatten)]
        table: TableArgs,

        /// Keys, e.g. '0xC1,0x4040-0x4045,U+3000'
        #[arg(value_name = "KEYS")]
        keys: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check both tables over their full key space
    Verify {
        #[command(flatten)]
        table: TableArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for info/lookup/verify subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}
