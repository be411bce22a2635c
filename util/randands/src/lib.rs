//! Random all-AND circuit generator.
//!
//! Produces circuits with a single output that depends on every gate, which
//! makes them a convenient stress input for the fixup pipeline: every gate
//! survives reindexing unless some input is fixed.

use std::collections::VecDeque;

use ckt_fixup::bristol::{FlatCircuit, GateLine};
use ckt_fixup::{GateType, WireIdx};
use indexmap::IndexSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Phrase the default seed is derived from.
pub const DEFAULT_SEED_PHRASE: &[u8] = b"Generating a random circuit build of all AND gates";

/// Gates reserved up front; larger circuits grow as they are built.
const MAX_PREALLOC_GATES: u64 = 1 << 24;

/// RNG seeded from [`DEFAULT_SEED_PHRASE`].
pub fn default_rng() -> ChaCha20Rng {
    ChaCha20Rng::from_seed(*blake3::hash(DEFAULT_SEED_PHRASE).as_bytes())
}

/// RNG seeded from a user supplied number.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Generates a random circuit of AND gates over `num_inputs` inputs.
///
/// Gates pick both operands uniformly among all earlier wires until the
/// gates placed so far plus the wires nobody consumes yet reach `num_gates`.
/// The unconsumed wires are then ANDed together pairwise, oldest first, until
/// a single output remains. When the random phase lands exactly on
/// `num_gates` the result has one gate fewer than asked for.
///
/// # Panics
/// If `num_inputs` is zero.
pub fn generate<R: Rng>(num_gates: u64, num_inputs: u64, rng: &mut R) -> FlatCircuit {
    assert!(num_inputs > 0, "randands: need at least one input");

    let mut gates: Vec<GateLine> = Vec::with_capacity(gate_capacity(num_gates));
    let push = |gates: &mut Vec<GateLine>, a: WireIdx, b: WireIdx| {
        let out = num_inputs + gates.len() as u64;
        gates.push(GateLine::binary(GateType::AND, a, b, out));
        out
    };

    let mut uncovered: IndexSet<WireIdx> = IndexSet::new();
    while ((gates.len() + uncovered.len()) as u64) < num_gates {
        let wires = num_inputs + gates.len() as u64;
        let a = rng.random_range(0..wires);
        let b = rng.random_range(0..wires);
        let out = push(&mut gates, a, b);
        uncovered.swap_remove(&a);
        uncovered.swap_remove(&b);
        uncovered.insert(out);
    }

    let mut pending: VecDeque<WireIdx> = uncovered.into_iter().collect();
    while let (Some(a), Some(b)) = (pending.pop_front(), pending.pop_front()) {
        let out = push(&mut gates, a, b);
        pending.push_back(out);
    }

    // No gates at all: still emit one output gate.
    if gates.is_empty() {
        push(&mut gates, 0, 0);
    }

    FlatCircuit {
        num_inputs,
        num_outputs: 1,
        gates,
    }
}

fn gate_capacity(num_gates: u64) -> usize {
    num_gates.min(MAX_PREALLOC_GATES) as usize
}
