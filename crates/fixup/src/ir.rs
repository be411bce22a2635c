//! Arena-backed circuit DAG.
//!
//! Nodes are immutable once pushed. Sharing is expressed by several nodes
//! holding the same [`NodeId`], and every per-pass cache or marker lives in a
//! side table indexed by that id rather than in the node itself.

use std::ops::Index;

use crate::gate_type::GateType;

/// Wire index, either the stale one carried by a node or a final one assigned
/// by reindexing.
pub type WireIdx = u64;

/// Handle to a node in a [`Circuit`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in its arena.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Operand handles of a node, in left-to-right order.
pub type Operands = std::iter::Flatten<std::array::IntoIter<Option<NodeId>, 2>>;

/// A circuit node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Constant wire.
    Concrete(bool),
    /// Free input wire.
    Input {
        /// Position among the circuit inputs.
        index: WireIdx,
    },
    /// Conjunction of two nodes.
    And {
        /// Stale wire index.
        index: WireIdx,
        /// Left operand.
        lhs: NodeId,
        /// Right operand.
        rhs: NodeId,
    },
    /// Exclusive or of two nodes.
    Xor {
        /// Stale wire index.
        index: WireIdx,
        /// Left operand.
        lhs: NodeId,
        /// Right operand.
        rhs: NodeId,
    },
    /// Negation of a node.
    Inv {
        /// Stale wire index.
        index: WireIdx,
        /// Negated node.
        operand: NodeId,
    },
}

impl Node {
    /// Iterates over the operands this node reads.
    #[inline]
    pub fn operands(&self) -> Operands {
        let ops = match *self {
            Node::Concrete(_) | Node::Input { .. } => [None, None],
            Node::And { lhs, rhs, .. } | Node::Xor { lhs, rhs, .. } => [Some(lhs), Some(rhs)],
            Node::Inv { operand, .. } => [Some(operand), None],
        };
        ops.into_iter().flatten()
    }

    /// The index carried by the node, `None` for constants.
    #[inline]
    pub fn index(&self) -> Option<WireIdx> {
        match *self {
            Node::Concrete(_) => None,
            Node::Input { index }
            | Node::And { index, .. }
            | Node::Xor { index, .. }
            | Node::Inv { index, .. } => Some(index),
        }
    }

    /// The gate type, `None` for inputs and constants.
    #[inline]
    pub fn gate_type(&self) -> Option<GateType> {
        match self {
            Node::Concrete(_) | Node::Input { .. } => None,
            Node::And { .. } => Some(GateType::AND),
            Node::Xor { .. } => Some(GateType::XOR),
            Node::Inv { .. } => Some(GateType::INV),
        }
    }

    /// Returns the value if this node is a constant.
    #[inline]
    pub fn as_concrete(&self) -> Option<bool> {
        match *self {
            Node::Concrete(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true for input wires.
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, Node::Input { .. })
    }
}

/// Arena holding every node ever created for a circuit.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    nodes: Vec<Node>,

    /// Interned `Concrete(false)` and `Concrete(true)`.
    constants: [Option<NodeId>; 2],

    /// One past the largest index carried by any node so far.
    next_index: WireIdx,
}

impl Circuit {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of nodes in the arena, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// An index no node in the arena carries, nor any smaller-numbered
    /// successor of it. Synthetic nodes draw their indices from here.
    pub fn next_free_index(&self) -> WireIdx {
        self.next_index
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(index) = node.index() {
            self.next_index = self.next_index.max(index + 1);
        }
        let id = u32::try_from(self.nodes.len()).expect("circuit: arena exceeds u32::MAX nodes");
        self.nodes.push(node);
        NodeId(id)
    }

    /// Returns the interned constant node for `value`.
    pub fn constant(&mut self, value: bool) -> NodeId {
        let slot = value as usize;
        if let Some(id) = self.constants[slot] {
            return id;
        }
        let id = self.push(Node::Concrete(value));
        self.constants[slot] = Some(id);
        id
    }

    /// Adds a free input wire.
    pub fn input(&mut self, index: WireIdx) -> NodeId {
        self.push(Node::Input { index })
    }

    /// Adds an AND gate.
    pub fn and(&mut self, index: WireIdx, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.push(Node::And { index, lhs, rhs })
    }

    /// Adds an XOR gate.
    pub fn xor(&mut self, index: WireIdx, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.push(Node::Xor { index, lhs, rhs })
    }

    /// Adds an inverter.
    pub fn inv(&mut self, index: WireIdx, operand: NodeId) -> NodeId {
        self.push(Node::Inv { index, operand })
    }

    /// Iterates over every node in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}

impl Index<NodeId> for Circuit {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }
}
