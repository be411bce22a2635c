use clap::Parser;
use std::path::PathBuf;

/// Circuit fixup - fold known inputs into a single-output checking circuit
///
/// The result reads 0 when every output of CIRCUIT matches EXPECTED_OUTPUT and
/// 1 otherwise.
#[derive(Parser, Debug)]
#[command(name = "fixup")]
#[command(author, version, about, long_about)]
pub(crate) struct Cli {
    /// Input circuit file (Bristol format)
    #[arg(value_name = "CIRCUIT")]
    pub(crate) circuit: PathBuf,

    /// Known input values, one per line: 0, 1, or -1 for unknown
    #[arg(value_name = "PUBLIC_INPUT")]
    pub(crate) public_input: PathBuf,

    /// Expected output values, one per line: 0 or 1
    #[arg(value_name = "EXPECTED_OUTPUT")]
    pub(crate) expected_output: PathBuf,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    pub(crate) output: Option<PathBuf>,

    /// Verbose output
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Log progress to stderr (-vv for debug detail)"
    )]
    pub(crate) verbose: u8,
}

impl Cli {
    /// Parse command line arguments
    pub(crate) fn parse_args() -> Self {
        Cli::parse()
    }
}
