use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::error::AutomatonError;
use crate::event::{Event, EventId, EventSymbolTable};
use crate::rabin::RabinAcceptance;
use crate::state::{StateId, StateSymbolTable};

/// The nondeterministic transition relation, keyed by `(source, event)` and mapping to the
/// (possibly empty, possibly multi-element) set of successor states.
pub type Transitions = BTreeMap<(StateId, EventId), BTreeSet<StateId>>;

/// A finite-state automaton with a [`RabinAcceptance`] condition over infinite runs (spec §3).
///
/// This is the "collaborator library" container spec.md treats as an external dependency: a
/// finite set of states, an alphabet of events with controllable/observable/forcible flags, a
/// transition relation, designated initial and marked states, and a Rabin acceptance
/// condition. The synthesis pipeline in `rabin-synth` only ever reads and rebuilds values of
/// this type.
#[derive(Debug, Clone, Default)]
pub struct RabinAutomaton {
    name: String,
    events: EventSymbolTable,
    states: StateSymbolTable,
    alphabet: BTreeSet<EventId>,
    state_set: BTreeSet<StateId>,
    initial: BTreeSet<StateId>,
    marked: BTreeSet<StateId>,
    transitions: Transitions,
    acceptance: RabinAcceptance,
}

impl RabinAutomaton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // -- events ----------------------------------------------------------

    pub fn events(&self) -> &EventSymbolTable {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventSymbolTable {
        &mut self.events
    }

    /// Inserts `event` into the symbol table and adds it to the alphabet, returning its id.
    pub fn add_event(&mut self, event: Event) -> EventId {
        let id = self.events.insert(event);
        self.alphabet.insert(id);
        id
    }

    pub fn alphabet(&self) -> impl Iterator<Item = EventId> + '_ {
        self.alphabet.iter().copied()
    }

    pub fn alphabet_set(&self) -> &BTreeSet<EventId> {
        &self.alphabet
    }

    /// Removes `event` from the alphabet (but not from the shared symbol table), used by
    /// [`crate`]-external code such as `eps_observation` to drop now-unused unobservable
    /// events.
    pub fn remove_from_alphabet(&mut self, event: EventId) {
        self.alphabet.remove(&event);
    }

    // -- states ------------------------------------------------------------

    pub fn states(&self) -> &StateSymbolTable {
        &self.states
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.states.insert();
        self.state_set.insert(id);
        id
    }

    pub fn add_named_state(&mut self, name: impl Into<String>) -> StateId {
        let id = self.states.insert_named(name);
        self.state_set.insert(id);
        id
    }

    pub fn state_indices(&self) -> impl Iterator<Item = StateId> + '_ {
        self.state_set.iter().copied()
    }

    pub fn state_set(&self) -> &BTreeSet<StateId> {
        &self.state_set
    }

    // -- initial / marked ----------------------------------------------------

    pub fn set_initial(&mut self, state: StateId) {
        self.initial.insert(state);
    }

    pub fn set_marked(&mut self, state: StateId) {
        self.marked.insert(state);
    }

    pub fn initial_states(&self) -> &BTreeSet<StateId> {
        &self.initial
    }

    pub fn marked_states(&self) -> &BTreeSet<StateId> {
        &self.marked
    }

    pub fn is_initial_empty(&self) -> bool {
        self.initial.is_empty()
    }

    // -- transitions -----------------------------------------------------

    /// Adds `source --event--> target` to the (possibly nondeterministic) transition
    /// relation.
    pub fn add_transition(&mut self, source: StateId, event: EventId, target: StateId) {
        self.transitions
            .entry((source, event))
            .or_default()
            .insert(target);
    }

    /// Successor states reachable from `state` on `event`, or `None` if there is no such
    /// transition at all.
    pub fn successors(&self, state: StateId, event: EventId) -> Option<&BTreeSet<StateId>> {
        self.transitions.get(&(state, event))
    }

    pub fn transitions(&self) -> impl Iterator<Item = (StateId, EventId, StateId)> + '_ {
        self.transitions.iter().flat_map(|(&(q, a), targets)| {
            targets.iter().map(move |&p| (q, a, p))
        })
    }

    pub fn transitions_map(&self) -> &Transitions {
        &self.transitions
    }

    // -- acceptance --------------------------------------------------------

    pub fn acceptance(&self) -> &RabinAcceptance {
        &self.acceptance
    }

    pub fn set_acceptance(&mut self, acceptance: RabinAcceptance) {
        self.acceptance = acceptance;
    }

    /// Inserts an already-allocated event id (from [`Self::events`]'s own symbol table)
    /// directly into the alphabet, without going through [`Self::add_event`]. Used when an
    /// event was registered in the symbol table for bookkeeping (e.g. the silent event, see
    /// [`EventSymbolTable::ensure_silent_event`]) before it is known whether it will actually
    /// appear on a transition.
    pub fn ensure_event_in_alphabet(&mut self, event: EventId) {
        self.alphabet.insert(event);
    }

    /// Creates a fresh automaton that shares `self`'s state space (states, initial, marked
    /// states) and acceptance condition, but starts with an empty alphabet, symbol table and
    /// transition relation. Used by transformations that only touch the alphabet while
    /// leaving the state space and acceptance condition untouched, as spec.md requires of
    /// `eps_observation` (§4.3) and `expand_to_control_patterns` (§4.2, "Acceptance:
    /// unchanged (same state space)").
    pub fn with_same_states(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: EventSymbolTable::default(),
            states: self.states.clone(),
            alphabet: BTreeSet::new(),
            state_set: self.state_set.clone(),
            initial: self.initial.clone(),
            marked: self.marked.clone(),
            transitions: Transitions::new(),
            acceptance: self.acceptance.clone(),
        }
    }

    // -- validation --------------------------------------------------------

    /// Checks the structural invariants of spec §3: every transition references states and
    /// events that exist, and initial/marked states are subsets of the state set. Emptiness
    /// of the alphabet, acceptance condition, or of individual states is never an error
    /// (spec §7).
    pub fn validate(&self) -> Result<(), AutomatonError> {
        for &(source, event) in self.transitions.keys() {
            if !self.state_set.contains(&source) {
                return Err(AutomatonError::DanglingState(source));
            }
            if !self.alphabet.contains(&event) {
                return Err(AutomatonError::DanglingEvent(event));
            }
        }
        for targets in self.transitions.values() {
            for &target in targets {
                if !self.state_set.contains(&target) {
                    return Err(AutomatonError::DanglingState(target));
                }
            }
        }
        for &state in &self.initial {
            if !self.state_set.contains(&state) {
                return Err(AutomatonError::InitialNotAState(state));
            }
        }
        for &state in &self.marked {
            if !self.state_set.contains(&state) {
                return Err(AutomatonError::MarkedNotAState(state));
            }
        }
        trace!(
            automaton = self.name.as_str(),
            states = self.state_set.len(),
            events = self.alphabet.len(),
            "validated automaton structure"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    #[test_log::test]
    fn validate_accepts_well_formed_automaton() {
        let mut g = RabinAutomaton::new("g");
        let a = g.add_event(Event::new("a"));
        let s0 = g.add_state();
        let s1 = g.add_state();
        g.add_transition(s0, a, s1);
        g.set_initial(s0);
        g.set_marked(s1);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn validate_rejects_dangling_target() {
        let mut g = RabinAutomaton::new("g");
        let a = g.add_event(Event::new("a"));
        let s0 = g.add_state();
        let ghost = StateId(999);
        g.add_transition(s0, a, ghost);
        assert_eq!(
            g.validate(),
            Err(AutomatonError::DanglingState(ghost))
        );
    }

    #[test]
    fn empty_alphabet_and_acceptance_are_valid() {
        let mut g = RabinAutomaton::new("g");
        g.add_state();
        assert!(g.validate().is_ok());
    }
}
