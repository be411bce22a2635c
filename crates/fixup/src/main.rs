//! Command-line entry point for circuit fixup.

mod cli;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use cli::Cli;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse_args();
    init_logging(args.verbose);

    let circuit = read(&args.circuit, "circuit")?;
    let public = read(&args.public_input, "public input")?;
    let expected = read(&args.expected_output, "expected output")?;

    let result = ckt_fixup::fixup(&circuit, &public, &expected)
        .with_context(|| format!("failed to fix up {}", args.circuit.display()))?;

    // Nothing is written until the whole circuit has been processed.
    let counts = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let counts = result.write_to(&mut out)?;
            out.flush()?;
            counts
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            let counts = result.write_to(&mut out)?;
            out.flush()?;
            counts
        }
    };

    info!(gates = counts.gates, wires = counts.wires, "wrote checking circuit");
    Ok(())
}

fn read(path: &Path, what: &str) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} file {}", path.display()))
}

/// Logs go to stderr; stdout carries the circuit. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
