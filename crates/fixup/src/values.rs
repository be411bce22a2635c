//! Partial assignments of wire values.
//!
//! The file format is one integer per line: `0` or `1` binds the wire at that
//! line's position, `-1` leaves it free.

use ahash::{HashMap, HashMapExt};

use crate::error::{FixupError, Result};
use crate::ir::WireIdx;

/// Mapping from wire position to a known value. Unbound positions are free.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: HashMap<WireIdx, bool>,
}

impl Assignment {
    /// Creates an empty assignment, binding nothing.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Returns the value bound to `index`, if any.
    #[inline]
    pub fn get(&self, index: WireIdx) -> Option<bool> {
        self.values.get(&index).copied()
    }

    /// Binds `index` to `value`, returning the previous binding.
    pub fn insert(&mut self, index: WireIdx, value: bool) -> Option<bool> {
        self.values.insert(index, value)
    }

    /// Number of bound positions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest bound position.
    pub fn max_index(&self) -> Option<WireIdx> {
        self.values.keys().copied().max()
    }
}

impl FromIterator<(WireIdx, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (WireIdx, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parses a value file into an [`Assignment`].
pub fn parse_assignment(src: &str) -> Result<Assignment> {
    let mut assignment = Assignment::new();

    let trimmed = src.trim();
    if trimmed.is_empty() {
        return Ok(assignment);
    }

    // Positions count from the first value; reported lines count from the
    // top of the file.
    let skipped = src[..src.len() - src.trim_start().len()]
        .bytes()
        .filter(|&b| b == b'\n')
        .count();

    for (i, text) in trimmed.lines().enumerate() {
        let line = skipped + i + 1;
        let token = text.trim();
        let value: i64 = token.parse().map_err(|_| FixupError::InvalidNumber {
            line,
            token: token.to_owned(),
        })?;

        match value {
            -1 => {}
            0 | 1 => {
                assignment.insert(i as WireIdx, value == 1);
            }
            _ => return Err(FixupError::InvalidValue { line, value }),
        }
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_values() {
        let a = parse_assignment("1\n-1\n0\n1\n").unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.get(0), Some(true));
        assert_eq!(a.get(1), None);
        assert_eq!(a.get(2), Some(false));
        assert_eq!(a.get(3), Some(true));
        assert_eq!(a.max_index(), Some(3));
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let a = parse_assignment("\n  0\n1  \n\n").unwrap();
        assert_eq!(a.get(0), Some(false));
        assert_eq!(a.get(1), Some(true));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_assignment("").unwrap().is_empty());
        assert!(parse_assignment(" \n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_out_of_range_value() {
        let err = parse_assignment("0\n2\n").unwrap_err();
        assert!(matches!(err, FixupError::InvalidValue { line: 2, value: 2 }));
    }

    #[test]
    fn test_parse_not_a_number() {
        let err = parse_assignment("0\nx\n").unwrap_err();
        assert!(matches!(err, FixupError::InvalidNumber { line: 2, .. }));

        // A blank line in the middle is not a value either.
        let err = parse_assignment("0\n\n1\n").unwrap_err();
        assert!(matches!(err, FixupError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_errors_count_leading_blank_lines() {
        let err = parse_assignment("\n\n1\n7\n").unwrap_err();
        assert!(matches!(err, FixupError::InvalidValue { line: 4, value: 7 }));

        let err = parse_assignment("\n  \n0\nx\n").unwrap_err();
        assert!(matches!(err, FixupError::InvalidNumber { line: 4, .. }));

        // Positions still start at the first value.
        let a = parse_assignment("\n\n1\n0\n").unwrap();
        assert_eq!(a.get(0), Some(true));
        assert_eq!(a.get(1), Some(false));
    }
}
