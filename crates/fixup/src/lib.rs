//! Partial evaluation of Bristol-style boolean circuits.
//!
//! Given a circuit, the values of some of its inputs and the expected values of
//! all of its outputs, this crate builds a single-output circuit that reads
//! `false` exactly when the original outputs match, then folds every constant
//! it can and renumbers what's left.
//!
//! # Pipeline
//! - [`bristol::parse_circuit`] reads the circuit into a node arena
//! - [`check::build_check`] reduces the outputs to one pass/fail bit
//! - [`simplify::Simplifier`] propagates the known inputs
//! - [`passes::reindex`] assigns dense indices in dependency order
//! - [`passes::write_circuit`] emits the result
//!
//! # Example
//! ```
//! let circuit = "1 3\n1 2\n1 1\n\n2 1 0 1 2 AND\n";
//! // Input 0 is known to be 1, input 1 is free. The AND must output 1.
//! let out = ckt_fixup::fixup(circuit, "1\n-1\n", "1\n").unwrap();
//!
//! let mut buf = Vec::new();
//! out.write_to(&mut buf).unwrap();
//! assert_eq!(String::from_utf8(buf).unwrap(), "1 2\n1 1\n1 1\n\n1 1 0 1 INV\n");
//! ```

use std::io::Write;

use tracing::{info, warn};

pub mod bristol;
pub mod check;
pub mod error;
pub mod gate_type;
pub mod ir;
pub mod passes;
pub mod simplify;
pub mod values;

pub use error::{FixupError, Result};
pub use gate_type::GateType;
pub use ir::{Circuit, Node, NodeId, WireIdx};
pub use values::Assignment;

use bristol::ParsedCircuit;
use passes::{Counts, Numbering};

/// A simplified, renumbered checking circuit ready to be written out.
#[derive(Debug)]
pub struct FixupOutput {
    /// Arena holding the checking circuit.
    pub circuit: Circuit,
    /// The single pass/fail output.
    pub root: NodeId,
    /// Final wire indices for everything reachable from `root`.
    pub numbering: Numbering,
}

impl FixupOutput {
    /// Writes the circuit in the text format.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<Counts> {
        passes::write_circuit(&self.circuit, self.root, &self.numbering, out)
    }
}

/// Runs the whole pipeline on the contents of the circuit file, the public
/// input file and the expected output file.
///
/// Fails without producing anything if the check folds to a constant.
pub fn fixup(circuit_src: &str, public_src: &str, expected_src: &str) -> Result<FixupOutput> {
    let ParsedCircuit {
        header,
        mut circuit,
        outputs,
    } = bristol::parse_circuit(circuit_src)?;
    info!(
        gates = header.num_gates,
        wires = header.num_wires,
        inputs = header.num_inputs(),
        outputs = outputs.len(),
        "parsed circuit"
    );

    let public = values::parse_assignment(public_src)?;
    let expected = values::parse_assignment(expected_src)?;

    if public.max_index().is_some_and(|i| i >= header.num_inputs()) {
        warn!(
            bound = public.len(),
            inputs = header.num_inputs(),
            "public input file binds wires past the last input; they are ignored"
        );
    }
    if expected.max_index().is_some_and(|i| i >= outputs.len() as u64) {
        warn!(
            outputs = outputs.len(),
            "expected output file has more values than the circuit has outputs; extras are ignored"
        );
    }

    let check = check::build_check(&mut circuit, &outputs, &expected)?;

    let mut simplifier = simplify::Simplifier::new(&public);
    let root = simplifier.simplify(&mut circuit, check);
    info!(
        folds = simplifier.folds(),
        known_inputs = public.len(),
        "propagated known inputs"
    );

    if let Some(value) = circuit[root].as_concrete() {
        return Err(FixupError::ConstantCircuit { value });
    }

    let numbering = passes::reindex(&circuit, root);
    info!(
        gates = numbering.num_gates(),
        inputs = numbering.num_inputs(),
        "reindexed checking circuit"
    );

    Ok(FixupOutput {
        circuit,
        root,
        numbering,
    })
}
