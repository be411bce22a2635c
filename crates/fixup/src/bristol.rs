//! Reader for the Bristol-style circuit text format.
//!
//! ```text
//! <numGates> <numWires>
//! <numInputGroups> <inputGroupSize>...
//! <numOutputGroups> <outputGroupSize>...
//!
//! <arity> 1 <operand wires...> <output wire> <AND|XOR|INV>
//! ```
//!
//! Wires below the total input size are implicit inputs. The last
//! `sum(outputGroupSizes)` wires are the circuit outputs.

use std::fmt;

use ahash::{HashMap, HashMapExt};

use crate::error::{FixupError, Result};
use crate::gate_type::GateType;
use crate::ir::{Circuit, NodeId, WireIdx};

/// Counts from the first three lines of a circuit file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Number of gate lines.
    pub num_gates: u64,
    /// Number of wires, inputs included.
    pub num_wires: u64,
    /// Size of each input group.
    pub input_groups: Vec<u64>,
    /// Size of each output group.
    pub output_groups: Vec<u64>,
}

impl Header {
    /// Header with a single input group and a single output group.
    pub fn single_group(num_gates: u64, num_wires: u64, num_inputs: u64, num_outputs: u64) -> Self {
        Self {
            num_gates,
            num_wires,
            input_groups: vec![num_inputs],
            output_groups: vec![num_outputs],
        }
    }

    /// Total number of input wires.
    pub fn num_inputs(&self) -> u64 {
        self.input_groups.iter().sum()
    }

    /// Total number of output wires.
    pub fn num_outputs(&self) -> u64 {
        self.output_groups.iter().sum()
    }
}

/// Writes the header lines, including the blank separator line.
impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.num_gates, self.num_wires)?;
        for groups in [&self.input_groups, &self.output_groups] {
            write!(f, "{}", groups.len())?;
            for size in groups {
                write!(f, " {size}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

/// One gate line, as written in the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GateLine {
    /// Gate tag.
    pub ty: GateType,
    /// Operand wires; only the first `ty.arity()` entries are meaningful.
    inputs: [WireIdx; 2],
    /// Wire the gate drives.
    pub output: WireIdx,
}

impl GateLine {
    /// Creates a two-input gate line.
    pub fn binary(ty: GateType, in1: WireIdx, in2: WireIdx, output: WireIdx) -> Self {
        debug_assert_eq!(ty.arity(), 2);
        Self {
            ty,
            inputs: [in1, in2],
            output,
        }
    }

    /// Creates an inverter line.
    pub fn inv(input: WireIdx, output: WireIdx) -> Self {
        Self {
            ty: GateType::INV,
            inputs: [input, 0],
            output,
        }
    }

    /// Operand wires in file order.
    pub fn inputs(&self) -> &[WireIdx] {
        &self.inputs[..self.ty.arity()]
    }

    /// Operand wires, mutably.
    pub fn inputs_mut(&mut self) -> &mut [WireIdx] {
        &mut self.inputs[..self.ty.arity()]
    }
}

impl fmt::Display for GateLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 1", self.ty.arity())?;
        for w in self.inputs() {
            write!(f, " {w}")?;
        }
        write!(f, " {} {}", self.output, self.ty)
    }
}

/// Line iterator that keeps track of 1-based line numbers.
#[derive(Debug)]
struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let text = self.lines.next()?;
        self.line += 1;
        Some((self.line, text))
    }

    /// Skips blank lines and returns the next non-blank one.
    fn next_nonblank(&mut self) -> Option<(usize, &'a str)> {
        loop {
            let (line, text) = self.next_line()?;
            if !text.trim().is_empty() {
                return Some((line, text));
            }
        }
    }

    /// Counts the non-blank lines left, without consuming them.
    fn remaining_nonblank(&self) -> u64 {
        self.lines
            .clone()
            .filter(|text| !text.trim().is_empty())
            .count() as u64
    }

    /// Fails if anything other than blank lines remains.
    fn expect_end(&mut self) -> Result<()> {
        match self.next_nonblank() {
            Some((line, _)) => Err(FixupError::TrailingData { line }),
            None => Ok(()),
        }
    }
}

fn parse_number(token: &str, line: usize) -> Result<u64> {
    token.parse().map_err(|_| FixupError::InvalidNumber {
        line,
        token: token.to_owned(),
    })
}

fn header_numbers(text: &str, line: usize) -> Result<Vec<u64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse().map_err(|_| FixupError::MalformedHeader {
                line,
                reason: format!("'{tok}' is not a non-negative integer"),
            })
        })
        .collect()
}

fn parse_groups(reader: &mut LineReader<'_>, what: &str) -> Result<Vec<u64>> {
    let (line, text) = reader.next_line().ok_or_else(|| FixupError::MalformedHeader {
        line: reader.line + 1,
        reason: format!("missing {what} group line"),
    })?;

    let nums = header_numbers(text, line)?;
    let Some((&count, sizes)) = nums.split_first() else {
        return Err(FixupError::MalformedHeader {
            line,
            reason: format!("empty {what} group line"),
        });
    };

    if count != sizes.len() as u64 {
        return Err(FixupError::MalformedHeader {
            line,
            reason: format!(
                "declares {count} {what} groups but lists {} sizes",
                sizes.len()
            ),
        });
    }

    if sizes.iter().try_fold(0u64, |acc, &size| acc.checked_add(size)).is_none() {
        return Err(FixupError::MalformedHeader {
            line,
            reason: format!("{what} group sizes overflow"),
        });
    }

    Ok(sizes.to_vec())
}

fn parse_header(reader: &mut LineReader<'_>) -> Result<Header> {
    let (line, text) = reader
        .next_nonblank()
        .ok_or_else(|| FixupError::MalformedHeader {
            line: 1,
            reason: "empty circuit file".to_owned(),
        })?;

    let counts = header_numbers(text, line)?;
    let [num_gates, num_wires] = counts[..] else {
        return Err(FixupError::MalformedHeader {
            line,
            reason: "expected '<numGates> <numWires>'".to_owned(),
        });
    };

    let input_groups = parse_groups(reader, "input")?;
    let output_groups = parse_groups(reader, "output")?;

    match reader.next_line() {
        Some((_, text)) if text.trim().is_empty() => {}
        Some((line, _)) => {
            return Err(FixupError::MalformedHeader {
                line,
                reason: "expected a blank line before the gates".to_owned(),
            });
        }
        None => {
            return Err(FixupError::MalformedHeader {
                line: reader.line + 1,
                reason: "missing blank line before the gates".to_owned(),
            });
        }
    }

    let header = Header {
        num_gates,
        num_wires,
        input_groups,
        output_groups,
    };

    for (what, n) in [("inputs", header.num_inputs()), ("outputs", header.num_outputs())] {
        if n > num_wires {
            return Err(FixupError::MalformedHeader {
                line,
                reason: format!("{n} {what} do not fit in {num_wires} wires"),
            });
        }
    }

    // Outputs are the last wires, which gates must drive.
    if header.num_outputs() > num_gates {
        return Err(FixupError::MalformedHeader {
            line: line + 2,
            reason: format!(
                "{} outputs but only {num_gates} gates",
                header.num_outputs()
            ),
        });
    }

    // Every count sized from here on is bounded by the lines actually present.
    let available = reader.remaining_nonblank();
    if num_gates > available {
        return Err(FixupError::UnexpectedEof {
            expected: num_gates,
            found: available,
        });
    }

    Ok(header)
}

/// Parses one gate line, checking its shape but not the wires it refers to
/// beyond their range.
pub fn parse_gate_line(text: &str, line: usize, num_wires: u64) -> Result<GateLine> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(FixupError::MalformedGate {
            line,
            reason: format!("expected at least 4 fields, got {}", tokens.len()),
        });
    }

    let declared = parse_number(tokens[0], line)?;
    let fan_out = parse_number(tokens[1], line)?;
    if fan_out != 1 {
        return Err(FixupError::FanOut { line, fan_out });
    }

    let tag = tokens[tokens.len() - 1];
    let ty: GateType = tag.parse().map_err(|_| FixupError::UnknownGate {
        line,
        tag: tag.to_owned(),
    })?;

    let operand_tokens = &tokens[2..tokens.len() - 2];
    if declared != ty.arity() as u64 || operand_tokens.len() != ty.arity() {
        return Err(FixupError::ArityMismatch {
            line,
            tag: ty.tag(),
            expected: ty.arity(),
            declared,
            actual: operand_tokens.len(),
        });
    }

    let check_range = |wire: u64| {
        if wire < num_wires {
            Ok(wire)
        } else {
            Err(FixupError::WireOutOfRange {
                line,
                wire,
                num_wires,
            })
        }
    };

    let mut inputs = [0; 2];
    for (slot, tok) in inputs.iter_mut().zip(operand_tokens) {
        *slot = check_range(parse_number(tok, line)?)?;
    }
    let output = check_range(parse_number(tokens[tokens.len() - 2], line)?)?;

    Ok(GateLine {
        ty,
        inputs,
        output,
    })
}

/// A circuit parsed into the node arena.
#[derive(Debug)]
pub struct ParsedCircuit {
    /// Header as read.
    pub header: Header,
    /// Arena holding every gate and every input a gate reads.
    pub circuit: Circuit,
    /// Output wires in order, taken from the end of the wire space.
    pub outputs: Vec<NodeId>,
}

/// Wire table used while parsing. Input nodes are created the first time a
/// gate reads them, so the arena never grows past what the gate lines name.
#[derive(Debug)]
struct Wires {
    num_inputs: u64,
    inputs: HashMap<WireIdx, NodeId>,
    gates: HashMap<WireIdx, NodeId>,
}

impl Wires {
    fn new(num_inputs: u64, num_gates: usize) -> Self {
        Self {
            num_inputs,
            inputs: HashMap::new(),
            gates: HashMap::with_capacity(num_gates),
        }
    }

    fn is_assigned(&self, wire: WireIdx) -> bool {
        wire < self.num_inputs || self.gates.contains_key(&wire)
    }

    fn get(&mut self, circuit: &mut Circuit, wire: WireIdx) -> Option<NodeId> {
        if wire < self.num_inputs {
            Some(*self.inputs.entry(wire).or_insert_with(|| circuit.input(wire)))
        } else {
            self.gates.get(&wire).copied()
        }
    }
}

/// Parses circuit text into a DAG.
///
/// Inputs get indices `0..numInputs`; the `j`-th gate line gets
/// `numInputs + j` regardless of the output wire it names. Inputs no gate
/// reads are left out of the arena.
pub fn parse_circuit(src: &str) -> Result<ParsedCircuit> {
    let mut reader = LineReader::new(src);
    let header = parse_header(&mut reader)?;
    let num_inputs = header.num_inputs();
    let num_wires = header.num_wires;
    let num_gates = header.num_gates as usize;

    let mut circuit = Circuit::with_capacity(num_gates);
    let mut wires = Wires::new(num_inputs, num_gates);

    for j in 0..header.num_gates {
        let (line, text) = reader.next_line().ok_or(FixupError::UnexpectedEof {
            expected: header.num_gates,
            found: j,
        })?;
        let gate = parse_gate_line(text, line, num_wires)?;

        if wires.is_assigned(gate.output) {
            return Err(FixupError::DuplicateWire {
                line,
                wire: gate.output,
            });
        }

        let mut operands = [None; 2];
        for (slot, &wire) in operands.iter_mut().zip(gate.inputs()) {
            *slot = Some(
                wires
                    .get(&mut circuit, wire)
                    .ok_or(FixupError::UnassignedWire { line, wire })?,
            );
        }

        let index = num_inputs + j;
        let id = match (gate.ty, operands) {
            (GateType::AND, [Some(a), Some(b)]) => circuit.and(index, a, b),
            (GateType::XOR, [Some(a), Some(b)]) => circuit.xor(index, a, b),
            (GateType::INV, [Some(a), None]) => circuit.inv(index, a),
            _ => unreachable!("bristol: operand count checked against arity"),
        };
        wires.gates.insert(gate.output, id);
    }

    reader.expect_end()?;

    // Gate outputs are distinct and in range, so this stops within
    // `num_gates + 1` steps.
    if let Some(wire) = (num_inputs..num_wires).find(|w| !wires.gates.contains_key(w)) {
        return Err(FixupError::IncompleteCircuit { wire });
    }

    let first_output = num_wires - header.num_outputs();
    let outputs = (first_output..num_wires)
        .filter_map(|w| wires.gates.get(&w).copied())
        .collect();

    Ok(ParsedCircuit {
        header,
        circuit,
        outputs,
    })
}

/// A circuit kept as the plain list of gate lines, without building a DAG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatCircuit {
    /// Total number of input wires.
    pub num_inputs: u64,
    /// Total number of output wires.
    pub num_outputs: u64,
    /// Gate lines in file order.
    pub gates: Vec<GateLine>,
}

impl FlatCircuit {
    /// Parses circuit text, keeping gate lines in file order.
    pub fn parse(src: &str) -> Result<Self> {
        let mut reader = LineReader::new(src);
        let header = parse_header(&mut reader)?;

        let mut gates = Vec::with_capacity(header.num_gates as usize);
        for j in 0..header.num_gates {
            let (line, text) = reader.next_line().ok_or(FixupError::UnexpectedEof {
                expected: header.num_gates,
                found: j,
            })?;
            gates.push(parse_gate_line(text, line, header.num_wires)?);
        }
        reader.expect_end()?;

        Ok(Self {
            num_inputs: header.num_inputs(),
            num_outputs: header.num_outputs(),
            gates,
        })
    }

    /// Header describing this circuit with single input and output groups.
    pub fn header(&self) -> Header {
        let num_gates = self.gates.len() as u64;
        Header::single_group(
            num_gates,
            num_gates + self.num_inputs,
            self.num_inputs,
            self.num_outputs,
        )
    }
}

impl fmt::Display for FlatCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())?;
        for gate in &self.gates {
            writeln!(f, "{gate}")?;
        }
        Ok(())
    }
}
