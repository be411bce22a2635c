//! Output check construction.
//!
//! Turns a list of circuit outputs and their expected values into a single
//! bit that is `false` when every output matches and `true` otherwise.

use crate::error::{FixupError, Result};
use crate::ir::{Circuit, NodeId};
use crate::values::Assignment;

/// Builds the check node for `outputs` against `expected`.
///
/// Every output position must have an expected value; this is checked before
/// any node is created. Outputs expected to be `false` are inverted so each
/// wire reads `true` on a match, the match bits are AND-reduced pairwise
/// (an odd last bit is carried into the next round), and the final bit is
/// inverted.
pub fn build_check(
    circuit: &mut Circuit,
    outputs: &[NodeId],
    expected: &Assignment,
) -> Result<NodeId> {
    if outputs.is_empty() {
        return Err(FixupError::NoOutputs);
    }

    let expected_values = (0..outputs.len())
        .map(|position| {
            expected
                .get(position as u64)
                .ok_or(FixupError::UnconstrainedOutput { position })
        })
        .collect::<Result<Vec<bool>>>()?;

    // Past every index in the arena; reindexing replaces these anyway.
    let mut next_index = circuit.next_free_index();
    let mut fresh = || {
        let index = next_index;
        next_index += 1;
        index
    };

    let mut matches: Vec<NodeId> = outputs
        .iter()
        .zip(expected_values)
        .map(|(&out, want)| if want { out } else { circuit.inv(fresh(), out) })
        .collect();

    while matches.len() > 1 {
        let mut next = Vec::with_capacity(matches.len().div_ceil(2));
        for pair in matches.chunks(2) {
            match *pair {
                [a, b] => next.push(circuit.and(fresh(), a, b)),
                [last] => next.push(last),
                _ => unreachable!(),
            }
        }
        matches = next;
    }

    Ok(circuit.inv(fresh(), matches[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Node;
    use crate::simplify::simplify;

    fn outputs_with(c: &mut Circuit, n: u64) -> Vec<NodeId> {
        (0..n).map(|i| c.input(i)).collect()
    }

    #[test]
    fn test_two_outputs_pass_and_fail() {
        let mut c = Circuit::new();
        let outs = outputs_with(&mut c, 2);
        let expected = Assignment::from_iter([(0, true), (1, false)]);
        let check = build_check(&mut c, &outs, &expected).unwrap();

        // Unconstrained: stays symbolic.
        let free = simplify(&mut c, check, &Assignment::new());
        assert_eq!(c[free].as_concrete(), None);

        // Matching values: pass.
        let good = Assignment::from_iter([(0, true), (1, false)]);
        let r = simplify(&mut c, check, &good);
        assert_eq!(c[r], Node::Concrete(false));

        // One flipped: fail.
        let bad = Assignment::from_iter([(0, true), (1, true)]);
        let r = simplify(&mut c, check, &bad);
        assert_eq!(c[r], Node::Concrete(true));
    }

    #[test]
    fn test_odd_number_of_outputs() {
        let mut c = Circuit::new();
        let outs = outputs_with(&mut c, 3);
        let expected = Assignment::from_iter([(0, true), (1, false), (2, true)]);
        let check = build_check(&mut c, &outs, &expected).unwrap();

        let r = simplify(&mut c, check, &expected);
        assert_eq!(c[r], Node::Concrete(false));

        for flip in 0..3 {
            let mut actual = expected.clone();
            actual.insert(flip, !expected.get(flip).unwrap());
            let r = simplify(&mut c, check, &actual);
            assert_eq!(c[r], Node::Concrete(true), "flipping output {flip}");
        }
    }

    #[test]
    fn test_tree_shape() {
        let mut c = Circuit::new();
        let outs = outputs_with(&mut c, 3);
        let expected = Assignment::from_iter([(0, true), (1, true), (2, true)]);
        let check = build_check(&mut c, &outs, &expected).unwrap();

        // INV(AND(AND(o0, o1), o2))
        let Node::Inv { operand: top, .. } = c[check] else {
            panic!("expected closing inverter");
        };
        let Node::And { lhs, rhs, .. } = c[top] else {
            panic!("expected and");
        };
        assert_eq!(rhs, outs[2]);
        assert!(matches!(c[lhs], Node::And { lhs: l, rhs: r, .. } if l == outs[0] && r == outs[1]));
    }

    #[test]
    fn test_single_output() {
        let mut c = Circuit::new();
        let outs = outputs_with(&mut c, 1);
        let check = build_check(&mut c, &outs, &Assignment::from_iter([(0, false)])).unwrap();

        // INV(INV(o0))
        let Node::Inv { operand, .. } = c[check] else {
            panic!("expected inverter");
        };
        assert_eq!(c[operand], Node::Inv { index: 1, operand: outs[0] });
    }

    #[test]
    fn test_fresh_indices_are_disjoint() {
        let mut c = Circuit::new();
        let a = c.input(0);
        let b = c.input(1);
        let g = c.and(41, a, b);
        let outs = vec![a, b, g];
        let check = build_check(
            &mut c,
            &outs,
            &Assignment::from_iter([(0, false), (1, false), (2, false)]),
        )
        .unwrap();

        let indices: Vec<u64> = crate::passes::post_order(&c, check)
            .into_iter()
            .filter_map(|id| c[id].index())
            .collect();
        assert!(indices.iter().filter(|&&i| i > 41).count() >= 5);
        let mut dedup = indices.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), indices.len());
    }

    #[test]
    fn test_unconstrained_output() {
        let mut c = Circuit::new();
        let outs = outputs_with(&mut c, 2);
        let before = c.len();

        let err = build_check(&mut c, &outs, &Assignment::from_iter([(0, true)])).unwrap_err();
        assert!(matches!(err, FixupError::UnconstrainedOutput { position: 1 }));
        assert_eq!(c.len(), before);
    }

    #[test]
    fn test_no_outputs() {
        let mut c = Circuit::new();
        let err = build_check(&mut c, &[], &Assignment::new()).unwrap_err();
        assert!(matches!(err, FixupError::NoOutputs));
    }
}
