//! Error conditions raised while parsing, checking and emitting circuits.

use std::io;

/// Every failure is fatal; nothing is written once one of these is raised.
///
/// Line numbers are 1-based and refer to the file being parsed.
#[allow(missing_docs, reason = "the error messages describe the fields")]
#[derive(Debug, thiserror::Error)]
pub enum FixupError {
    #[error("line {line}: malformed header: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: malformed gate line: {reason}")]
    MalformedGate { line: usize, reason: String },

    #[error("line {line}: wire {wire} is out of range (circuit has {num_wires} wires)")]
    WireOutOfRange {
        line: usize,
        wire: u64,
        num_wires: u64,
    },

    #[error("line {line}: wire {wire} is assigned twice")]
    DuplicateWire { line: usize, wire: u64 },

    #[error("line {line}: wire {wire} is used before it is assigned")]
    UnassignedWire { line: usize, wire: u64 },

    #[error("line {line}: gate fan-out must be 1, got {fan_out}")]
    FanOut { line: usize, fan_out: u64 },

    #[error("line {line}: unknown gate type '{tag}'")]
    UnknownGate { line: usize, tag: String },

    #[error("line {line}: {tag} gate takes {expected} operands, line declares {declared} with {actual} given")]
    ArityMismatch {
        line: usize,
        tag: &'static str,
        expected: usize,
        declared: u64,
        actual: usize,
    },

    #[error("unexpected end of input: expected {expected} gate lines, found {found}")]
    UnexpectedEof { expected: u64, found: u64 },

    #[error("line {line}: unexpected data after the last gate")]
    TrailingData { line: usize },

    #[error("circuit is incomplete: wire {wire} is never assigned")]
    IncompleteCircuit { wire: u64 },

    #[error("line {line}: invalid assignment value {value} (expected -1, 0 or 1)")]
    InvalidValue { line: usize, value: i64 },

    #[error("output {position} has no expected value")]
    UnconstrainedOutput { position: usize },

    #[error("circuit has no outputs to check")]
    NoOutputs,

    #[error("circuit reduces to the constant {value}")]
    ConstantCircuit { value: bool },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for the crate.
pub type Result<T> = std::result::Result<T, FixupError>;
