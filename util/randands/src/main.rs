//! CLI tool for generating random all-AND circuits.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, ensure};
use ckt_randands::{default_rng, generate, seeded_rng};
use clap::Parser;

/// Generate a random single-output circuit made only of AND gates
///
/// Output is deterministic: the same arguments always give the same circuit.
#[derive(Parser, Debug)]
#[command(name = "ckt-randands")]
#[command(author, version, about, long_about)]
struct Args {
    /// Approximate number of gates
    #[arg(value_name = "GATES")]
    gates: u64,

    /// Number of inputs
    #[arg(value_name = "INPUTS")]
    inputs: u64,

    /// Output file path (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Seed for the generator (defaults to a fixed built-in seed)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ensure!(args.inputs > 0, "INPUTS must be at least 1");

    let circuit = match args.seed {
        Some(seed) => generate(args.gates, args.inputs, &mut seeded_rng(seed)),
        None => generate(args.gates, args.inputs, &mut default_rng()),
    };
    let text = circuit.to_string();

    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}
