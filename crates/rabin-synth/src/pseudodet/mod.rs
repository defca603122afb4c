mod config;
mod signature;
mod tree;

use std::collections::{BTreeSet, HashMap, VecDeque};

use automata_core::{EventId, RabinAcceptance, RabinAutomaton, RabinPair, StateId};
use tracing::debug;

pub use config::PseudoDetConfig;
use signature::tree_signature;
pub use tree::{Colour, LabeledTree, NodeId, TreeNode};

use crate::error::SynthError;
use crate::warning::Warning;

/// Result of [`pseudo_det`]: the determinised automaton plus any capacity-cap warnings
/// accumulated along the way (spec §7 — capacity exhaustion is not a fatal error).
#[derive(Debug, Clone)]
pub struct PseudoDetOutcome {
    pub automaton: RabinAutomaton,
    pub warnings: Vec<Warning>,
}

/// Pseudo-determinises `g` via labelled-tree (Safra-style) macro-states (spec §4.4).
pub fn pseudo_det(g: &RabinAutomaton) -> Result<PseudoDetOutcome, SynthError> {
    pseudo_det_with(g, &PseudoDetConfig::default())
}

/// As [`pseudo_det`], with explicit safety-cap configuration.
pub fn pseudo_det_with(
    g: &RabinAutomaton,
    cfg: &PseudoDetConfig,
) -> Result<PseudoDetOutcome, SynthError> {
    let (automaton, _trees, warnings) = run(g, cfg)?;
    Ok(PseudoDetOutcome { automaton, warnings })
}

/// Core exploration loop, separated from [`pseudo_det_with`] only so tests can inspect the
/// per-macro-state trees directly (spec §8 P1: every tree must satisfy (T1)-(T5)).
fn run(
    g: &RabinAutomaton,
    cfg: &PseudoDetConfig,
) -> Result<(RabinAutomaton, HashMap<StateId, LabeledTree>, Vec<Warning>), SynthError> {
    g.validate()?;

    let mut out = RabinAutomaton::new(format!("PseudoDet({})", g.name()));
    let mut event_map: HashMap<EventId, EventId> = HashMap::new();
    for e in g.alphabet() {
        let event = g.events().get(e).cloned().unwrap();
        let out_id = out.add_event(event);
        event_map.insert(e, out_id);
    }

    if g.is_initial_empty() {
        debug!(automaton = g.name(), "empty input, returning empty automaton");
        return Ok((out, HashMap::new(), Vec::new()));
    }

    let silent = g.events().silent_event();
    let mut warnings = Vec::new();

    let initial_label: BTreeSet<StateId> = g.initial_states().iter().copied().collect();
    let initial_tree = LabeledTree::singleton(initial_label);

    let mut state_to_tree: HashMap<StateId, LabeledTree> = HashMap::new();
    let mut signature_to_state: HashMap<String, StateId> = HashMap::new();

    let initial_macro = out.add_state();
    out.set_initial(initial_macro);
    signature_to_state.insert(tree_signature(&initial_tree), initial_macro);
    state_to_tree.insert(initial_macro, initial_tree);

    let mut queue: VecDeque<StateId> = VecDeque::new();
    queue.push_back(initial_macro);

    let mut macro_step_counter = 0usize;
    let mut macro_states_capped = false;

    while let Some(current) = queue.pop_front() {
        if state_to_tree.len() >= cfg.max_macro_states {
            if !macro_states_capped {
                warnings.push(Warning::MaxMacroStates {
                    cap: cfg.max_macro_states,
                });
                macro_states_capped = true;
            }
            break;
        }
        if macro_step_counter >= cfg.max_macro_steps {
            warnings.push(Warning::MaxMacroSteps {
                cap: cfg.max_macro_steps,
            });
            break;
        }

        let current_tree = state_to_tree[&current].clone();

        for g_event in g.alphabet() {
            macro_step_counter += 1;
            if macro_step_counter > cfg.max_macro_steps {
                warnings.push(Warning::MaxMacroSteps {
                    cap: cfg.max_macro_steps,
                });
                break;
            }

            if current_tree.len() > cfg.max_nodes_per_tree {
                warnings.push(Warning::MaxNodesPerTree {
                    macro_step: macro_step_counter,
                });
                continue;
            }

            let out_event = event_map[&g_event];
            let mut tree = current_tree.clone();
            let is_silent_event = silent == Some(g_event);

            // Step 1 — reset colours.
            for id in tree.node_ids().collect::<Vec<_>>() {
                tree.node_mut(id).unwrap().colour = Colour::White;
            }

            // Step 2 — state-label update.
            for id in tree.node_ids().collect::<Vec<_>>() {
                let label = tree.node(id).unwrap().state_label.clone();
                let mut new_label: BTreeSet<StateId> = if is_silent_event {
                    label.clone()
                } else {
                    BTreeSet::new()
                };
                for &q in &label {
                    if let Some(succ) = g.successors(q, g_event) {
                        new_label.extend(succ.iter().copied());
                    }
                }
                tree.node_mut(id).unwrap().state_label = new_label;
            }

            // Step 3 — acceptance-driven branching.
            if !g.acceptance().is_empty() {
                let mut total_new_children = 0usize;
                let mut hit_children_per_node_cap = false;
                let mut hit_new_children_cap = false;
                let mut hit_states_per_child_cap = false;

                'nodes: for id in tree.node_ids().collect::<Vec<_>>() {
                    if total_new_children >= cfg.max_new_children_per_step {
                        hit_new_children_cap = true;
                        break 'nodes;
                    }
                    let mut node_children_count = 0usize;
                    for pair in g.acceptance().pairs() {
                        if node_children_count >= cfg.max_children_per_node {
                            hit_children_per_node_cap = true;
                            break;
                        }
                        if total_new_children >= cfg.max_new_children_per_step {
                            hit_new_children_cap = true;
                            break 'nodes;
                        }

                        let label = tree.node(id).unwrap().state_label.clone();
                        let mut w: BTreeSet<StateId> = BTreeSet::new();
                        for &q in label.difference(pair.i()) {
                            if w.len() >= cfg.max_states_per_new_child {
                                hit_states_per_child_cap = true;
                                break;
                            }
                            w.insert(q);
                        }
                        if w.is_empty() {
                            continue;
                        }

                        let existing_children = tree.node(id).unwrap().children.clone();
                        let already_represented = existing_children.iter().any(|&c| {
                            tree.node(c)
                                .map(|cn| !cn.state_label.is_disjoint(&w))
                                .unwrap_or(false)
                        });
                        if already_represented {
                            continue;
                        }

                        let child = tree.create_node();
                        tree.node_mut(child).unwrap().state_label = w;
                        tree.node_mut(child).unwrap().colour = Colour::Red;
                        tree.node_mut(id).unwrap().children.push(child);
                        node_children_count += 1;
                        total_new_children += 1;
                    }
                }

                if hit_children_per_node_cap {
                    warnings.push(Warning::MaxChildrenPerNode {
                        macro_step: macro_step_counter,
                    });
                }
                if hit_new_children_cap {
                    warnings.push(Warning::MaxNewChildrenPerStep {
                        macro_step: macro_step_counter,
                    });
                }
                if hit_states_per_child_cap {
                    warnings.push(Warning::MaxStatesPerNewChild {
                        macro_step: macro_step_counter,
                    });
                }
            }

            // Step 4 — sibling disjointness (older-wins).
            for parent in tree.node_ids().collect::<Vec<_>>() {
                let children = tree.node(parent).unwrap().children.clone();
                for i in 1..children.len() {
                    let younger = children[i];
                    for &older in children.iter().take(i) {
                        let older_label = tree.node(older).unwrap().state_label.clone();
                        let younger_node = tree.node_mut(younger).unwrap();
                        for s in &older_label {
                            younger_node.state_label.remove(s);
                        }
                    }
                }
            }

            // Step 5 — prune empties.
            let empties: Vec<NodeId> = tree
                .iter()
                .filter(|(_, n)| n.state_label.is_empty())
                .map(|(id, _)| id)
                .collect();
            for id in empties {
                tree.delete_node(id);
            }

            // Step 6 — red breakpoint.
            for id in tree.node_ids().collect::<Vec<_>>() {
                if !tree.contains(id) {
                    continue;
                }
                let (label, children) = {
                    let node = tree.node(id).unwrap();
                    (node.state_label.clone(), node.children.clone())
                };
                let mut union: BTreeSet<StateId> = BTreeSet::new();
                for &c in &children {
                    if let Some(cn) = tree.node(c) {
                        union.extend(cn.state_label.iter().copied());
                    }
                }
                if !union.is_empty() && union == label {
                    let mut bfs: VecDeque<NodeId> = children.into_iter().collect();
                    let mut descendants = Vec::new();
                    while let Some(cur) = bfs.pop_front() {
                        descendants.push(cur);
                        if let Some(cn) = tree.node(cur) {
                            bfs.extend(cn.children.iter().copied());
                        }
                    }
                    for d in descendants {
                        tree.delete_node(d);
                    }
                    let node = tree.node_mut(id).unwrap();
                    node.colour = Colour::Red;
                    node.children.clear();
                    node.a_set.clear();
                    node.r_set.clear();
                }
            }

            // Step 7 — A/R-set cleanup.
            let existing: BTreeSet<NodeId> = tree.node_ids().collect();
            for id in existing.iter().copied().collect::<Vec<_>>() {
                let node = tree.node_mut(id).unwrap();
                node.a_set.retain(|x| existing.contains(x));
                node.r_set.retain(|x| existing.contains(x));
            }

            // Step 8 — green promotion.
            for id in tree.node_ids().collect::<Vec<_>>() {
                let node = tree.node_mut(id).unwrap();
                if node.colour != Colour::Red && node.a_set.is_empty() {
                    node.colour = Colour::Green;
                    node.a_set = node.r_set.clone();
                    node.r_set.clear();
                }
            }

            // Step 9 — R-set update from red nodes.
            let red_nodes: BTreeSet<NodeId> = tree
                .iter()
                .filter(|(_, n)| n.colour == Colour::Red)
                .map(|(id, _)| id)
                .collect();
            for id in tree.node_ids().collect::<Vec<_>>() {
                let is_red = tree.node(id).unwrap().colour == Colour::Red;
                if !is_red {
                    let node = tree.node_mut(id).unwrap();
                    node.r_set.extend(red_nodes.iter().copied());
                }
            }

            // Macro-state canonicalisation and insertion (spec §4.4.3).
            let sig = tree_signature(&tree);
            let target = if let Some(&existing) = signature_to_state.get(&sig) {
                existing
            } else {
                if state_to_tree.len() >= cfg.max_macro_states {
                    if !macro_states_capped {
                        warnings.push(Warning::MaxMacroStates {
                            cap: cfg.max_macro_states,
                        });
                        macro_states_capped = true;
                    }
                    continue;
                }
                let has_green = tree.iter().any(|(_, n)| n.colour == Colour::Green);
                let has_red = tree.iter().any(|(_, n)| n.colour == Colour::Red);

                let new_state = out.add_state();
                if has_green && !has_red {
                    out.set_marked(new_state);
                }
                signature_to_state.insert(sig, new_state);
                state_to_tree.insert(new_state, tree);
                queue.push_back(new_state);
                new_state
            };

            out.add_transition(current, out_event, target);
        }
    }

    out.set_acceptance(output_acceptance(&state_to_tree));

    debug!(
        automaton = g.name(),
        macro_states = state_to_tree.len(),
        warnings = warnings.len(),
        "pseudo-determinisation complete"
    );

    Ok((out, state_to_tree, warnings))
}

/// Coarsened output acceptance condition (spec §4.4.4, §9 "Open question — coarsened
/// acceptance output"): a single `(globalR, globalI)` pair rather than one per input pair.
/// Preserved as specified.
fn output_acceptance(state_to_tree: &HashMap<StateId, LabeledTree>) -> RabinAcceptance {
    let mut global_r: BTreeSet<StateId> = BTreeSet::new();
    let mut global_i: BTreeSet<StateId> = BTreeSet::new();

    for (&state, tree) in state_to_tree {
        let has_red = tree.iter().any(|(_, n)| n.colour == Colour::Red);
        let has_green = tree.iter().any(|(_, n)| n.colour == Colour::Green);
        if has_red {
            global_r.insert(state);
        }
        if has_green {
            global_i.insert(state);
        }
    }

    if global_r.is_empty() || global_i.is_empty() {
        RabinAcceptance::empty()
    } else {
        RabinAcceptance::from([RabinPair::new(global_r, global_i)])
    }
}

#[cfg(test)]
mod tests {
    use automata_core::RabinAutomatonBuilder;

    use super::*;

    #[test_log::test]
    fn scenario_a_trivial_determinisation() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["s0"])
            .with_events(["a"])
            .with_transitions([("s0", "a", "s0")])
            .with_initial(["s0"])
            .build();
        let s0 = g
            .state_indices()
            .find(|&s| g.states().name(s) == Some("s0"))
            .unwrap();
        let mut g = g;
        g.set_acceptance([RabinPair::new(BTreeSet::from([s0]), BTreeSet::from([s0]))].into());

        let outcome = pseudo_det(&g).unwrap();
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.automaton.state_set().len(), 1);
        let only = *outcome.automaton.state_set().iter().next().unwrap();
        let a = outcome.automaton.events().id_by_name("a").unwrap();
        assert_eq!(outcome.automaton.successors(only, a).unwrap().len(), 1);
    }

    #[test]
    fn scenario_b_nondeterministic_merge() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["1", "2", "3"])
            .with_events(["a"])
            .with_transitions([("1", "a", "2"), ("1", "a", "3")])
            .with_initial(["1"])
            .build();
        let outcome = pseudo_det(&g).unwrap();
        assert_eq!(outcome.automaton.state_set().len(), 2);
    }

    #[test]
    fn output_is_deterministic_per_p2() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["1", "2", "3"])
            .with_events(["a", "b"])
            .with_transitions([
                ("1", "a", "2"),
                ("1", "a", "3"),
                ("2", "b", "1"),
                ("3", "b", "1"),
            ])
            .with_initial(["1"])
            .build();
        let outcome = pseudo_det(&g).unwrap();
        let mut seen: BTreeSet<(StateId, EventId)> = BTreeSet::new();
        for (s, e, _) in outcome.automaton.transitions() {
            assert!(seen.insert((s, e)), "duplicate outgoing transition on same event");
        }
    }

    #[test]
    fn empty_input_returns_empty_automaton_without_warnings() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["s"])
            .with_events(["a"])
            .build();
        let outcome = pseudo_det(&g).unwrap();
        assert!(outcome.automaton.state_set().is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn scenario_f_capacity_cap_yields_partial_result_with_warning() {
        // A state per reachable subset quickly explodes; cap macro-states tightly.
        let mut builder = RabinAutomatonBuilder::new("g");
        let names: Vec<String> = (0..8).map(|i| format!("s{i}")).collect();
        builder = builder.with_states(names.clone());
        builder = builder.with_events(["a"]);
        let mut edges = Vec::new();
        for i in 0..7 {
            edges.push((names[i].clone(), "a".to_string(), names[i + 1].clone()));
            edges.push((names[i].clone(), "a".to_string(), names[0].clone()));
        }
        let g = builder
            .with_transitions(edges)
            .with_initial(["s0"])
            .build();

        let cfg = PseudoDetConfig {
            max_macro_states: 2,
            ..PseudoDetConfig::default()
        };
        let outcome = pseudo_det_with(&g, &cfg).unwrap();
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::MaxMacroStates { .. })));
        assert!(outcome.automaton.state_set().len() <= 2);
    }

    #[test]
    fn max_states_per_new_child_truncates_and_warns() {
        // Six initial states, each with a reflexive 'a'-self-loop, so the root's state-label
        // stays at 6 states across macro-steps. An empty-I acceptance pair makes Step 3's
        // candidate child W equal to the whole label, which exceeds the default cap of 5.
        let names: Vec<String> = (0..6).map(|i| format!("s{i}")).collect();
        let mut builder = RabinAutomatonBuilder::new("g").with_states(names.clone());
        builder = builder.with_events(["a"]);
        let edges: Vec<_> = names
            .iter()
            .map(|n| (n.clone(), "a".to_string(), n.clone()))
            .collect();
        let g = builder
            .with_transitions(edges)
            .with_initial(names.iter().cloned())
            .build();
        let mut g = g;
        g.set_acceptance([RabinPair::new(BTreeSet::new(), BTreeSet::new())].into());

        let outcome = pseudo_det(&g).unwrap();
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::MaxStatesPerNewChild { .. })));
    }

    /// (T1) every state-label is non-empty, (T2) siblings have pairwise-disjoint state-labels,
    /// (T3) every child's state-label is a subset of its parent's, (T5) a red node has no
    /// children (spec §3, property P1).
    fn assert_tree_invariants(tree: &LabeledTree) {
        for (id, node) in tree.iter() {
            assert!(!node.state_label.is_empty(), "T1 violated at {id}");
            if node.colour == Colour::Red {
                assert!(node.children.is_empty(), "T5 violated at {id}");
            }
            for &child in &node.children {
                let child_label = &tree.node(child).unwrap().state_label;
                assert!(
                    child_label.is_subset(&node.state_label),
                    "T3 violated: child {child} of {id}"
                );
            }
            for (i, &a) in node.children.iter().enumerate() {
                for &b in node.children.iter().skip(i + 1) {
                    let la = &tree.node(a).unwrap().state_label;
                    let lb = &tree.node(b).unwrap().state_label;
                    assert!(la.is_disjoint(lb), "T2 violated: siblings {a} and {b} of {id}");
                }
            }
        }
    }

    #[test]
    fn p1_every_macro_state_tree_satisfies_core_invariants() {
        let g = RabinAutomatonBuilder::new("g")
            .with_states(["1", "2", "3", "4"])
            .with_events(["a", "b"])
            .with_transitions([
                ("1", "a", "2"),
                ("1", "a", "3"),
                ("2", "a", "4"),
                ("3", "b", "4"),
                ("4", "a", "1"),
                ("4", "b", "2"),
            ])
            .with_initial(["1"])
            .build();
        let s1 = g.state_indices().find(|&s| g.states().name(s) == Some("1")).unwrap();
        let s4 = g.state_indices().find(|&s| g.states().name(s) == Some("4")).unwrap();
        let mut g = g;
        g.set_acceptance(
            [RabinPair::new(BTreeSet::from([s1]), BTreeSet::from([s4]))].into(),
        );

        let (_automaton, trees, _warnings) = run(&g, &PseudoDetConfig::default()).unwrap();
        assert!(!trees.is_empty());
        for tree in trees.values() {
            assert_tree_invariants(tree);
        }
    }
}
