//! Gate type tags used by the text format.

use std::fmt;
use std::str::FromStr;

/// Gate type as it appears in the last column of a gate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateType {
    /// Two-input conjunction.
    AND,
    /// Two-input exclusive or.
    XOR,
    /// Inverter.
    INV,
}

impl GateType {
    /// Number of operand wires a gate of this type reads.
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            GateType::AND | GateType::XOR => 2,
            GateType::INV => 1,
        }
    }

    /// The tag written in the text format.
    #[inline]
    pub const fn tag(self) -> &'static str {
        match self {
            GateType::AND => "AND",
            GateType::XOR => "XOR",
            GateType::INV => "INV",
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Returned when a tag is not one of `AND`, `XOR` or `INV`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGateType;

impl FromStr for GateType {
    type Err = UnknownGateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(GateType::AND),
            "XOR" => Ok(GateType::XOR),
            "INV" => Ok(GateType::INV),
            _ => Err(UnknownGateType),
        }
    }
}
