//! CLI tool for chaining copies of a circuit end to end.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use ckt_fixup::bristol::FlatCircuit;
use clap::Parser;

/// Chain COUNT copies of a circuit, feeding each copy's outputs into the next
#[derive(Parser, Debug)]
#[command(name = "ckt-sequence")]
#[command(author, version, about)]
struct Args {
    /// Input circuit file (Bristol format)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Number of copies
    #[arg(value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let src = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let circuit = FlatCircuit::parse(&src)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let chained = ckt_sequence::repeat(&circuit, args.count as usize)?;
    let text = chained.to_string();

    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}
