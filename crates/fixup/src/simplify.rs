//! Constant propagation under a partial input assignment.
//!
//! Each node is folded at most once per [`Simplifier`]: the result is cached
//! by node id and the result's own cache entry points at itself, so shared
//! sub-DAGs stay shared and simplifying a simplified node is free.

use tracing::debug;

use crate::ir::{Circuit, Node, NodeId, WireIdx};
use crate::values::Assignment;

/// Memoizing constant folder bound to one assignment.
#[derive(Debug)]
pub struct Simplifier<'a> {
    assignment: &'a Assignment,
    memo: Vec<Option<NodeId>>,
    folds: usize,
}

impl<'a> Simplifier<'a> {
    /// Creates a simplifier for `assignment`.
    pub fn new(assignment: &'a Assignment) -> Self {
        Self {
            assignment,
            memo: Vec::new(),
            folds: 0,
        }
    }

    /// Number of nodes folded so far.
    pub fn folds(&self) -> usize {
        self.folds
    }

    /// Cached result for `id`, if it has been simplified.
    pub fn cached(&self, id: NodeId) -> Option<NodeId> {
        self.memo.get(id.idx()).copied().flatten()
    }

    fn remember(&mut self, circuit: &Circuit, id: NodeId, result: NodeId) {
        if self.memo.len() < circuit.len() {
            self.memo.resize(circuit.len(), None);
        }
        self.memo[id.idx()] = Some(result);
        self.memo[result.idx()] = Some(result);
    }

    fn resolved(&self, id: NodeId) -> NodeId {
        self.cached(id)
            .expect("simplify: operand folded before its user")
    }

    /// Returns a node equivalent to `root` with bound inputs replaced by their
    /// constants and everything foldable folded.
    pub fn simplify(&mut self, circuit: &mut Circuit, root: NodeId) -> NodeId {
        let folds_before = self.folds;
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if self.cached(id).is_some() {
                continue;
            }

            if !expanded {
                stack.push((id, true));
                stack.extend(
                    circuit[id]
                        .operands()
                        .rev()
                        .filter(|&op| self.cached(op).is_none())
                        .map(|op| (op, false)),
                );
                continue;
            }

            let result = self.fold(circuit, id);
            self.remember(circuit, id, result);
        }

        debug!(folds = self.folds - folds_before, "simplified");
        self.resolved(root)
    }

    /// Folds a single node whose operands have all been simplified.
    fn fold(&mut self, circuit: &mut Circuit, id: NodeId) -> NodeId {
        self.folds += 1;

        match circuit[id] {
            Node::Concrete(_) => id,

            Node::Input { index } => match self.assignment.get(index) {
                Some(value) => circuit.constant(value),
                None => id,
            },

            Node::Inv { index, operand } => {
                let a = self.resolved(operand);
                match circuit[a] {
                    Node::Concrete(_) | Node::Inv { .. } => fold_inv(circuit, index, a),
                    _ if a == operand => id,
                    _ => circuit.inv(index, a),
                }
            }

            Node::And { index, lhs, rhs } => {
                let (a, b) = (self.resolved(lhs), self.resolved(rhs));
                match constant_side(circuit, a, b) {
                    Some((true, other)) => other,
                    Some((false, _)) => circuit.constant(false),
                    None if (a, b) == (lhs, rhs) => id,
                    None => circuit.and(index, a, b),
                }
            }

            Node::Xor { index, lhs, rhs } => {
                let (a, b) = (self.resolved(lhs), self.resolved(rhs));
                match constant_side(circuit, a, b) {
                    Some((true, other)) => fold_inv(circuit, index, other),
                    Some((false, other)) => other,
                    None if (a, b) == (lhs, rhs) => id,
                    None => circuit.xor(index, a, b),
                }
            }
        }
    }
}

/// Finds a constant operand, checking the left one first, and returns its
/// value along with the other operand.
fn constant_side(circuit: &Circuit, a: NodeId, b: NodeId) -> Option<(bool, NodeId)> {
    if let Some(v) = circuit[a].as_concrete() {
        Some((v, b))
    } else {
        circuit[b].as_concrete().map(|v| (v, a))
    }
}

/// Negates an already simplified node.
fn fold_inv(circuit: &mut Circuit, index: WireIdx, operand: NodeId) -> NodeId {
    match circuit[operand] {
        Node::Concrete(v) => circuit.constant(!v),
        Node::Inv { operand: inner, .. } => inner,
        _ => circuit.inv(index, operand),
    }
}

/// Simplifies `root` under `assignment` with a fresh cache.
pub fn simplify(circuit: &mut Circuit, root: NodeId, assignment: &Assignment) -> NodeId {
    Simplifier::new(assignment).simplify(circuit, root)
}
