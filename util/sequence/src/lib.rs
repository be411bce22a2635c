//! Sequential composition of circuits.
//!
//! Used to build large test circuits out of small ones, e.g. chaining several
//! copies of a hash compression function so that each copy consumes the
//! previous one's outputs.

use ckt_fixup::WireIdx;
use ckt_fixup::bristol::{FlatCircuit, GateLine};

/// Reasons two circuits can't be chained.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// The second circuit has too few inputs to take every output of the first.
    #[error("{outputs} outputs cannot feed a circuit with {inputs} inputs")]
    TooFewInputs {
        /// Outputs of the first circuit.
        outputs: u64,
        /// Inputs of the second circuit.
        inputs: u64,
    },

    /// A gate refers to a wire outside `0..inputs + gates`.
    #[error("wire {wire} is outside the {num_wires} dense wires of the circuit")]
    SparseWire {
        /// Offending wire.
        wire: WireIdx,
        /// Number of wires the circuit should have.
        num_wires: u64,
    },

    /// More outputs than gates, so outputs would overlap the inputs.
    #[error("circuit declares {outputs} outputs but has only {gates} gates")]
    OutputsNotGates {
        /// Declared outputs.
        outputs: u64,
        /// Number of gates.
        gates: u64,
    },

    /// `repeat` needs at least one copy.
    #[error("repeat count must be at least 1")]
    ZeroRepeats,
}

fn check_dense(circuit: &FlatCircuit) -> Result<(), ComposeError> {
    let gates = circuit.gates.len() as u64;
    if circuit.num_outputs > gates {
        return Err(ComposeError::OutputsNotGates {
            outputs: circuit.num_outputs,
            gates,
        });
    }

    let num_wires = circuit.num_inputs + gates;
    for gate in &circuit.gates {
        if let Some(&wire) = gate
            .inputs()
            .iter()
            .chain([&gate.output])
            .find(|&&w| w >= num_wires)
        {
            return Err(ComposeError::SparseWire { wire, num_wires });
        }
    }
    Ok(())
}

/// Chains `first` into `second`.
///
/// The `k`-th output of `first` drives the `k`-th input of `second`; the
/// remaining inputs of `second` become fresh inputs of the result, numbered
/// right after the inputs of `first`. The result's outputs are those of
/// `second`.
///
/// Wire layout of the result:
/// ```text
/// [first inputs][fresh second inputs][first gates][second gates]
/// ```
pub fn paste(first: &FlatCircuit, second: &FlatCircuit) -> Result<FlatCircuit, ComposeError> {
    if first.num_outputs > second.num_inputs {
        return Err(ComposeError::TooFewInputs {
            outputs: first.num_outputs,
            inputs: second.num_inputs,
        });
    }
    check_dense(first)?;
    check_dense(second)?;

    let fresh = second.num_inputs - first.num_outputs;
    let num_inputs = first.num_inputs + fresh;
    let first_gates = first.gates.len() as u64;
    // Rebased wire of first's 0th output.
    let first_outputs_start = num_inputs + first_gates - first.num_outputs;

    let rebase_first = |w: WireIdx| {
        if w < first.num_inputs { w } else { w + fresh }
    };
    let rebase_second = |w: WireIdx| {
        if w < first.num_outputs {
            first_outputs_start + w
        } else if w < second.num_inputs {
            w - first.num_outputs + first.num_inputs
        } else {
            w - second.num_inputs + num_inputs + first_gates
        }
    };

    let mut gates = Vec::with_capacity(first.gates.len() + second.gates.len());
    gates.extend(rebased(&first.gates, rebase_first));
    gates.extend(rebased(&second.gates, rebase_second));

    Ok(FlatCircuit {
        num_inputs,
        num_outputs: second.num_outputs,
        gates,
    })
}

fn rebased(
    gates: &[GateLine],
    rebase: impl Fn(WireIdx) -> WireIdx,
) -> impl Iterator<Item = GateLine> {
    gates.iter().map(move |gate| {
        let mut gate = *gate;
        for w in gate.inputs_mut() {
            *w = rebase(*w);
        }
        gate.output = rebase(gate.output);
        gate
    })
}

/// Chains `n` copies of `circuit`.
pub fn repeat(circuit: &FlatCircuit, n: usize) -> Result<FlatCircuit, ComposeError> {
    if n == 0 {
        return Err(ComposeError::ZeroRepeats);
    }
    check_dense(circuit)?;

    let mut result = circuit.clone();
    for _ in 1..n {
        result = paste(&result, circuit)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckt_fixup::bristol::parse_circuit;
    use ckt_fixup::{Assignment, Circuit, NodeId, simplify::simplify};

    /// Two inputs, outputs `a ^ b` then `a & b`.
    const HALF_ADDER: &str = "2 4\n1 2\n1 2\n\n2 1 0 1 2 XOR\n2 1 0 1 3 AND\n";

    /// Three inputs, one output: `!(x0 & x1) ^ x2`.
    const NAND_XOR: &str = "3 6\n1 3\n1 1\n\n2 1 0 1 3 AND\n1 1 3 4 INV\n2 1 4 2 5 XOR\n";

    fn eval(text: &str, inputs: &[bool]) -> Vec<bool> {
        let parsed = parse_circuit(text).unwrap();
        let mut circuit: Circuit = parsed.circuit;
        let assignment: Assignment = inputs
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as u64, v))
            .collect();
        parsed
            .outputs
            .iter()
            .map(|&out: &NodeId| {
                let r = simplify(&mut circuit, out, &assignment);
                circuit[r].as_concrete().expect("total assignment")
            })
            .collect()
    }

    fn all_inputs(n: usize) -> impl Iterator<Item = Vec<bool>> {
        (0..1u32 << n).map(move |bits| (0..n).map(|i| (bits >> i) & 1 == 1).collect())
    }

    #[test]
    fn test_paste_feeds_outputs_forward() {
        let first = FlatCircuit::parse(HALF_ADDER).unwrap();
        let second = FlatCircuit::parse(NAND_XOR).unwrap();
        let pasted = paste(&first, &second).unwrap();

        assert_eq!(pasted.num_inputs, 3);
        assert_eq!(pasted.num_outputs, 1);
        assert_eq!(pasted.gates.len(), 5);

        let text = pasted.to_string();
        for inputs in all_inputs(3) {
            let (a, b, c) = (inputs[0], inputs[1], inputs[2]);
            let expected = !((a ^ b) & (a & b)) ^ c;
            assert_eq!(eval(&text, &inputs), vec![expected], "inputs {inputs:?}");
        }
    }

    #[test]
    fn test_paste_layout() {
        let first = FlatCircuit::parse(HALF_ADDER).unwrap();
        let second = FlatCircuit::parse(NAND_XOR).unwrap();
        let pasted = paste(&first, &second).unwrap();

        assert_eq!(
            pasted.to_string(),
            "5 8\n1 3\n1 1\n\n\
             2 1 0 1 3 XOR\n\
             2 1 0 1 4 AND\n\
             2 1 3 4 5 AND\n\
             1 1 5 6 INV\n\
             2 1 6 2 7 XOR\n"
        );
    }

    #[test]
    fn test_repeat_chains_copies() {
        // Each copy maps (a, b) to (a ^ b, a & b).
        let adder = FlatCircuit::parse(HALF_ADDER).unwrap();
        let twice = repeat(&adder, 2).unwrap();
        assert_eq!(twice.num_inputs, 2);
        assert_eq!(twice.num_outputs, 2);
        assert_eq!(twice.gates.len(), 4);

        let text = twice.to_string();
        for inputs in all_inputs(2) {
            let (a, b) = (inputs[0], inputs[1]);
            let (s, c) = (a ^ b, a & b);
            assert_eq!(eval(&text, &inputs), vec![s ^ c, s & c]);
        }
    }

    #[test]
    fn test_repeat_once_is_identity() {
        let adder = FlatCircuit::parse(HALF_ADDER).unwrap();
        assert_eq!(repeat(&adder, 1).unwrap(), adder);
    }

    #[test]
    fn test_repeat_zero() {
        let adder = FlatCircuit::parse(HALF_ADDER).unwrap();
        assert_eq!(repeat(&adder, 0), Err(ComposeError::ZeroRepeats));
    }

    #[test]
    fn test_too_few_inputs() {
        let adder = FlatCircuit::parse(HALF_ADDER).unwrap();
        let inverter = FlatCircuit::parse("1 2\n1 1\n1 1\n\n1 1 0 1 INV\n").unwrap();
        assert_eq!(
            paste(&adder, &inverter),
            Err(ComposeError::TooFewInputs {
                outputs: 2,
                inputs: 1
            })
        );
    }

    #[test]
    fn test_sparse_wires_rejected() {
        let sparse = FlatCircuit::parse("1 5\n1 2\n1 1\n\n2 1 0 1 4 AND\n").unwrap();
        let err = repeat(&sparse, 2).unwrap_err();
        assert_eq!(
            err,
            ComposeError::SparseWire {
                wire: 4,
                num_wires: 3
            }
        );
    }
}
