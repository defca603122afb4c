use std::collections::{BTreeSet, HashMap};

use automata_core::{RabinAcceptance, RabinAutomaton, RabinPair, StateId};
use tracing::debug;

use crate::error::SynthError;

/// Synchronous product of two Rabin automata with acceptance-pair lifting (spec §4.1).
///
/// The alphabet of the result is the intersection of the two input alphabets, matched by
/// event *name* since `g1` and `g2` own independent symbol tables; the shared event's
/// controllable/observable/forcible flags are inherited from `g1` (the "plant", by
/// convention of the caller — the spec contributes no attributes). States are the eager
/// Cartesian product of the two state sets (acceptable for the small supervisory-synthesis
/// models this crate targets), with `q1|q2`-style names. A transition `(q1,q2) --a--> (q1',q2')`
/// exists iff `a` is shared and both components have the corresponding transition.
///
/// Acceptance lifting is the subtle part: for every pair `(R1,I1)` of `g1`'s condition and
/// every pair `(R2,I2)` of `g2`'s condition, one product pair is emitted with
/// `R = (R1 × States2) ∪ (States1 × R2)` and `I = (I1 × States2) ∪ (States1 × I2)` — a run is
/// accepting in the product iff it is accepting in at least one lifted pair. An empty input
/// acceptance sequence is treated as a single synthetic pair `(∅, ∅)` so the nested
/// enumeration still emits pairs for the other side.
///
/// Structurally infallible except for propagating a structural error from either input.
pub fn product(g1: &RabinAutomaton, g2: &RabinAutomaton) -> Result<RabinAutomaton, SynthError> {
    g1.validate()?;
    g2.validate()?;

    let mut out = RabinAutomaton::new(format!("{}||{}", g1.name(), g2.name()));

    // Shared alphabet, matched by name; attributes inherited from g1.
    let shared_events: Vec<(automata_core::EventId, automata_core::EventId, automata_core::EventId)> = g1
        .alphabet()
        .filter_map(|a1| {
            let name = g1.events().name(a1)?;
            let a2 = g2
                .events()
                .id_by_name(name)
                .filter(|id| g2.alphabet_set().contains(id))?;
            let attrs = g1.events().get(a1)?.clone();
            let out_id = out.add_event(attrs);
            Some((a1, a2, out_id))
        })
        .collect();

    // Eager Cartesian product of states.
    let mut state_map: HashMap<(StateId, StateId), StateId> = HashMap::new();
    for q1 in g1.state_indices() {
        for q2 in g2.state_indices() {
            let n1 = g1
                .states()
                .name(q1)
                .map(str::to_string)
                .unwrap_or_else(|| q1.to_string());
            let n2 = g2
                .states()
                .name(q2)
                .map(str::to_string)
                .unwrap_or_else(|| q2.to_string());
            let q = out.add_named_state(format!("{n1}|{n2}"));
            state_map.insert((q1, q2), q);
        }
    }

    for &q1 in g1.initial_states() {
        for &q2 in g2.initial_states() {
            out.set_initial(state_map[&(q1, q2)]);
        }
    }
    for &q1 in g1.marked_states() {
        for &q2 in g2.marked_states() {
            out.set_marked(state_map[&(q1, q2)]);
        }
    }

    for &(a1, a2, out_ev) in &shared_events {
        for q1 in g1.state_indices() {
            for q2 in g2.state_indices() {
                let (Some(t1), Some(t2)) = (g1.successors(q1, a1), g2.successors(q2, a2)) else {
                    continue;
                };
                let src = state_map[&(q1, q2)];
                for &p1 in t1 {
                    for &p2 in t2 {
                        out.add_transition(src, out_ev, state_map[&(p1, p2)]);
                    }
                }
            }
        }
    }

    out.set_acceptance(lift_acceptance(g1, g2, &state_map));

    debug!(
        left = g1.name(),
        right = g2.name(),
        states = out.state_set().len(),
        shared_events = shared_events.len(),
        "computed synchronous product"
    );

    Ok(out)
}

fn lift_acceptance(
    g1: &RabinAutomaton,
    g2: &RabinAutomaton,
    state_map: &HashMap<(StateId, StateId), StateId>,
) -> RabinAcceptance {
    let synthetic_empty = RabinPair::default();
    let pairs1: Vec<&RabinPair> = if g1.acceptance().is_empty() {
        vec![&synthetic_empty]
    } else {
        g1.acceptance().pairs().iter().collect()
    };
    let pairs2: Vec<&RabinPair> = if g2.acceptance().is_empty() {
        vec![&synthetic_empty]
    } else {
        g2.acceptance().pairs().iter().collect()
    };

    let mut out_acc = RabinAcceptance::empty();
    for p1 in &pairs1 {
        for p2 in &pairs2 {
            let mut r: BTreeSet<StateId> = BTreeSet::new();
            let mut i: BTreeSet<StateId> = BTreeSet::new();
            for &s1 in p1.r() {
                for q2 in g2.state_indices() {
                    r.insert(state_map[&(s1, q2)]);
                }
            }
            for q1 in g1.state_indices() {
                for &s2 in p2.r() {
                    r.insert(state_map[&(q1, s2)]);
                }
            }
            for &s1 in p1.i() {
                for q2 in g2.state_indices() {
                    i.insert(state_map[&(s1, q2)]);
                }
            }
            for q1 in g1.state_indices() {
                for &s2 in p2.i() {
                    i.insert(state_map[&(q1, s2)]);
                }
            }
            out_acc.push(RabinPair::new(r, i));
        }
    }
    out_acc
}
