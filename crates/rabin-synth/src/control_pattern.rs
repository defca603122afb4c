use std::collections::BTreeSet;

use automata_core::{Event, EventId, RabinAutomaton};
use itertools::Itertools;
use tracing::debug;

use crate::error::SynthError;

/// Caps the size of the augmented alphabet `expand_to_control_patterns` is willing to build.
/// The number of augmented events is `|Σ| * 2^|C|` (spec §4.2), so a handful of controllable
/// events already makes this large; `max_patterns` bounds `2^|C|` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPatternConfig {
    pub max_patterns: u64,
}

impl Default for ControlPatternConfig {
    fn default() -> Self {
        // 2^12 patterns per event is already generous for the small supervisory-synthesis
        // models this crate targets; raise explicitly for larger |C|.
        Self {
            max_patterns: 1 << 12,
        }
    }
}

/// Control-pattern alphabet expansion (spec §4.2).
///
/// Replaces the alphabet with pairs `(a, γ)` where `γ` — a *control pattern* — is a subset of
/// the original alphabet containing every uncontrollable event plus a (possibly empty)
/// subset of `controllable`. All `2^|C|` subsets of the controllable events actually present
/// in `g`'s alphabet are enumerated (bounded by `cfg.max_patterns`, per the configurable cap
/// §4.2 mandates). An augmented event `(a, γ)` is enabled from state `q` iff the underlying
/// `a` is enabled from `q` and `a ∈ γ`; it inherits `a`'s controllable/observable/forcible
/// flags. The state space and acceptance condition are unchanged.
pub fn expand_to_control_patterns(
    g: &RabinAutomaton,
    controllable: &BTreeSet<EventId>,
) -> Result<RabinAutomaton, SynthError> {
    expand_to_control_patterns_with(g, controllable, &ControlPatternConfig::default())
}

/// As [`expand_to_control_patterns`], with an explicit cap configuration.
pub fn expand_to_control_patterns_with(
    g: &RabinAutomaton,
    controllable: &BTreeSet<EventId>,
    cfg: &ControlPatternConfig,
) -> Result<RabinAutomaton, SynthError> {
    g.validate()?;

    let sigma: BTreeSet<EventId> = g.alphabet_set().clone();
    let controllable_in_sigma: Vec<EventId> = sigma.intersection(controllable).copied().collect();
    let uncontrollable: BTreeSet<EventId> = sigma.difference(controllable).copied().collect();

    let num_c = controllable_in_sigma.len();
    let needed = 1u64
        .checked_shl(num_c as u32)
        .unwrap_or(u64::MAX);
    if needed > cfg.max_patterns {
        return Err(SynthError::ControlPatternCapExceeded {
            num_controllable: num_c,
            needed,
            cap: cfg.max_patterns,
        });
    }

    // One subset of `controllable_in_sigma` per bit pattern in 0..2^num_c; each becomes
    // γ = (Σ \ C) ∪ S (spec §4.2).
    let patterns: Vec<BTreeSet<EventId>> = (0..needed)
        .map(|mask| {
            let mut pattern = uncontrollable.clone();
            for (bit, &c) in controllable_in_sigma.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    pattern.insert(c);
                }
            }
            pattern
        })
        .collect();

    let mut out = g.with_same_states(format!("ExpandToControlPatterns({})", g.name()));

    // Augmented alphabet, ordered lexicographically on (event, pattern) per spec §3: outer
    // loop over events (sorted by id), inner loop over patterns in generation order.
    let mut augmented: Vec<(EventId, usize, EventId)> = Vec::new();
    for a in sigma.iter().copied() {
        let base = g.events().get(a).cloned().unwrap();
        for (pidx, pattern) in patterns.iter().enumerate() {
            if !pattern.contains(&a) {
                continue;
            }
            let pattern_label = pattern
                .iter()
                .filter_map(|&e| g.events().name(e))
                .sorted()
                .join(",");
            let name = format!("{}#{{{}}}", base.name(), pattern_label);
            let augmented_event = Event::with_flags(
                name,
                base.controllable,
                base.observable,
                base.forcible,
            );
            let out_id = out.add_event(augmented_event);
            augmented.push((a, pidx, out_id));
        }
    }

    for (source, event, target) in g.transitions() {
        for &(a, pidx, out_ev) in augmented.iter() {
            if a == event && patterns[pidx].contains(&event) {
                out.add_transition(source, out_ev, target);
            }
        }
    }

    debug!(
        automaton = g.name(),
        num_controllable = num_c,
        patterns = patterns.len(),
        augmented_events = augmented.len(),
        "expanded alphabet to control patterns"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use automata_core::RabinAutomatonBuilder;

    use super::*;

    #[test_log::test]
    fn empty_controllable_set_keeps_alphabet_size() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["s"])
            .with_events(["a", "b"])
            .with_transitions([("s", "a", "s"), ("s", "b", "s")])
            .with_initial(["s"])
            .build();
        let expanded = expand_to_control_patterns(&g, &BTreeSet::new()).unwrap();
        assert_eq!(expanded.alphabet_set().len(), g.alphabet_set().len());
    }

    #[test]
    fn scenario_e_fan_out() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["q", "q2"])
            .with_events(["a", "b"])
            .with_transitions([("q", "a", "q2")])
            .with_initial(["q"])
            .build();
        let a = g.events().id_by_name("a").unwrap();
        let controllable: BTreeSet<EventId> = [a].into();

        let expanded = expand_to_control_patterns(&g, &controllable).unwrap();
        // |Sigma| * 2^|C| = 2 * 2^1 = 4
        assert_eq!(expanded.alphabet_set().len(), 4);

        // transitions on 'a' must lift to exactly the patterns containing 'a' (2 of them)
        let lifted_a_transitions = expanded
            .transitions()
            .filter(|&(_, ev, _)| expanded.events().name(ev).unwrap().starts_with('a'))
            .count();
        assert_eq!(lifted_a_transitions, 2);
    }

    #[test]
    fn acceptance_and_state_space_are_unchanged() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["s"])
            .with_events(["a"])
            .with_transitions([("s", "a", "s")])
            .with_initial(["s"])
            .with_marked(["s"])
            .build();
        let expanded = expand_to_control_patterns(&g, &BTreeSet::new()).unwrap();
        assert_eq!(expanded.state_set().len(), g.state_set().len());
        assert_eq!(expanded.initial_states().len(), g.initial_states().len());
        assert_eq!(expanded.acceptance().len(), g.acceptance().len());
    }

    #[test]
    fn cap_is_enforced() {
        let mut builder = RabinAutomatonBuilder::new("g").with_states(["s"]);
        let names: Vec<String> = (0..20).map(|i| format!("c{i}")).collect();
        builder = builder.with_events(names.clone());
        let g = builder.with_initial(["s"]).build();
        let controllable: BTreeSet<EventId> = names
            .iter()
            .map(|n| g.events().id_by_name(n).unwrap())
            .collect();
        let cfg = ControlPatternConfig { max_patterns: 1024 };
        let result = expand_to_control_patterns_with(&g, &controllable, &cfg);
        assert!(matches!(
            result,
            Err(SynthError::ControlPatternCapExceeded { .. })
        ));
    }
}
