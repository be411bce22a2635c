//! Whole-DAG traversals over the nodes reachable from a root: reindexing,
//! counting and dumping.
//!
//! Every pass walks the DAG with an explicit stack and its own visited set, so
//! shared nodes are handled once per pass and deep circuits don't recurse.

use std::io::Write;
use std::ops::Index;

use ahash::{HashSet, HashSetExt};
use fixedbitset::FixedBitSet;

use crate::bristol::{GateLine, Header};
use crate::error::{FixupError, Result};
use crate::gate_type::GateType;
use crate::ir::{Circuit, Node, NodeId, WireIdx};

/// Returns the nodes reachable from `root`, each once, every node after all of
/// its operands. Left operands are visited before right ones.
pub fn post_order(circuit: &Circuit, root: NodeId) -> Vec<NodeId> {
    let mut visited = FixedBitSet::with_capacity(circuit.len());
    let mut order = Vec::new();
    let mut stack = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        if visited.put(id.idx()) {
            continue;
        }

        stack.push((id, true));
        stack.extend(
            circuit[id]
                .operands()
                .rev()
                .filter(|op| !visited.contains(op.idx()))
                .map(|op| (op, false)),
        );
    }

    order
}

/// Final wire indices assigned by [`reindex`].
#[derive(Clone, Debug)]
pub struct Numbering {
    final_index: Vec<Option<WireIdx>>,
    num_inputs: u64,
    num_gates: u64,
}

impl Numbering {
    /// Final index of `id`, if it was reachable when numbering.
    pub fn get(&self, id: NodeId) -> Option<WireIdx> {
        self.final_index.get(id.idx()).copied().flatten()
    }

    /// Number of input wires, numbered `0..num_inputs`.
    pub fn num_inputs(&self) -> u64 {
        self.num_inputs
    }

    /// Number of gates, numbered after the inputs.
    pub fn num_gates(&self) -> u64 {
        self.num_gates
    }
}

impl Index<NodeId> for Numbering {
    type Output = WireIdx;

    fn index(&self, id: NodeId) -> &WireIdx {
        self.final_index[id.idx()]
            .as_ref()
            .expect("numbering: node not reachable from the reindexed root")
    }
}

/// Assigns dense final indices to everything reachable from `root`.
///
/// Inputs keep their relative order and take `0..n`. Gates follow in
/// dependency order, so every operand's index is below its user's.
pub fn reindex(circuit: &Circuit, root: NodeId) -> Numbering {
    let order = post_order(circuit, root);
    let (mut inputs, gates): (Vec<NodeId>, Vec<NodeId>) =
        order.into_iter().partition(|&id| circuit[id].is_input());

    // Two distinct gates carrying the same stale index means some rewrite
    // duplicated a node instead of sharing it.
    let mut seen = HashSet::with_capacity(gates.len());
    for &g in &gates {
        if let Some(index) = circuit[g].index() {
            assert!(
                seen.insert(index),
                "reindex: stale index {index} carried by two distinct gates"
            );
        }
    }

    inputs.sort_by_key(|&id| circuit[id].index());

    let mut final_index = vec![None; circuit.len()];
    for (i, &id) in inputs.iter().chain(&gates).enumerate() {
        final_index[id.idx()] = Some(i as WireIdx);
    }

    Numbering {
        final_index,
        num_inputs: inputs.len() as u64,
        num_gates: gates.len() as u64,
    }
}

/// Gate and wire totals of a circuit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Counts {
    /// Gates, one per non-input node.
    pub gates: u64,
    /// Wires, inputs included.
    pub wires: u64,
}

impl Counts {
    /// Wires that aren't driven by a gate.
    pub fn inputs(&self) -> u64 {
        self.wires - self.gates
    }
}

/// Counts the gates and wires reachable from `root`. An input is one wire;
/// anything else is one gate and one wire.
pub fn count(circuit: &Circuit, root: NodeId) -> Counts {
    post_order(circuit, root)
        .into_iter()
        .fold(Counts { gates: 0, wires: 0 }, |acc, id| Counts {
            gates: acc.gates + u64::from(!circuit[id].is_input()),
            wires: acc.wires + 1,
        })
}

/// Writes one gate line per reachable gate, operands first, using the final
/// indices from `numbering`.
pub fn dump<W: Write>(
    circuit: &Circuit,
    root: NodeId,
    numbering: &Numbering,
    out: &mut W,
) -> Result<()> {
    for id in post_order(circuit, root) {
        let line = match circuit[id] {
            Node::Input { .. } => continue,
            Node::Concrete(value) => return Err(FixupError::ConstantCircuit { value }),
            Node::And { lhs, rhs, .. } => {
                GateLine::binary(GateType::AND, numbering[lhs], numbering[rhs], numbering[id])
            }
            Node::Xor { lhs, rhs, .. } => {
                GateLine::binary(GateType::XOR, numbering[lhs], numbering[rhs], numbering[id])
            }
            Node::Inv { operand, .. } => GateLine::inv(numbering[operand], numbering[id]),
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Writes a complete single-output circuit file rooted at `root`.
///
/// All inputs go in one group. Fails if `root` is a constant, since a
/// constant has no gate to name as the output.
pub fn write_circuit<W: Write>(
    circuit: &Circuit,
    root: NodeId,
    numbering: &Numbering,
    out: &mut W,
) -> Result<Counts> {
    if let Some(value) = circuit[root].as_concrete() {
        return Err(FixupError::ConstantCircuit { value });
    }

    let counts = count(circuit, root);
    let header = Header::single_group(counts.gates, counts.wires, counts.inputs(), 1);
    write!(out, "{header}")?;
    dump(circuit, root, numbering, out)?;
    Ok(counts)
}
