use crate::automaton::RabinAutomaton;
use crate::event::Event;
use crate::rabin::RabinAcceptance;

/// Helper for constructing a [`RabinAutomaton`] from plain data, in the spirit of the
/// teacher library's `TSBuilder`: states and events are named, edges are given as
/// `(source, event, target)` triples, and the result is only assembled once `build()` is
/// called.
///
/// # Example
/// ```
/// use automata_core::RabinAutomatonBuilder;
///
/// let g = RabinAutomatonBuilder::new("g")
///     .with_states(["s0", "s1"])
///     .with_events(["a", "b"])
///     .with_transitions([("s0", "a", "s0"), ("s0", "b", "s1"), ("s1", "a", "s0")])
///     .with_initial(["s0"])
///     .with_marked(["s0"])
///     .build();
/// assert!(g.validate().is_ok());
/// ```
pub struct RabinAutomatonBuilder {
    automaton: RabinAutomaton,
}

impl RabinAutomatonBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            automaton: RabinAutomaton::new(name),
        }
    }

    /// Adds named states, in order, if not already present.
    pub fn with_states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if self.state_by_name(&name).is_none() {
                self.automaton.add_named_state(name);
            }
        }
        self
    }

    /// Adds events by name, using [`Event::new`] defaults (controllable, observable,
    /// non-forcible). Use [`Self::with_event`] for explicit flags.
    pub fn with_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.automaton.add_event(Event::new(name.into()));
        }
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.automaton.add_event(event);
        self
    }

    /// Adds transitions given as `(source name, event name, target name)` triples. Panics if
    /// a referenced name has not been registered via [`Self::with_states`]/[`Self::with_events`].
    pub fn with_transitions<I, S>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        for (source, event, target) in edges {
            let source = self
                .state_by_name(source.as_ref())
                .unwrap_or_else(|| panic!("unknown state {:?}", source.as_ref()));
            let target = self
                .state_by_name(target.as_ref())
                .unwrap_or_else(|| panic!("unknown state {:?}", target.as_ref()));
            let event = self
                .automaton
                .events()
                .id_by_name(event.as_ref())
                .unwrap_or_else(|| panic!("unknown event {:?}", event.as_ref()));
            self.automaton.add_transition(source, event, target);
        }
        self
    }

    pub fn with_initial<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let state = self
                .state_by_name(name.as_ref())
                .unwrap_or_else(|| panic!("unknown state {:?}", name.as_ref()));
            self.automaton.set_initial(state);
        }
        self
    }

    pub fn with_marked<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let state = self
                .state_by_name(name.as_ref())
                .unwrap_or_else(|| panic!("unknown state {:?}", name.as_ref()));
            self.automaton.set_marked(state);
        }
        self
    }

    pub fn with_acceptance(mut self, acceptance: RabinAcceptance) -> Self {
        self.automaton.set_acceptance(acceptance);
        self
    }

    pub fn build(self) -> RabinAutomaton {
        self.automaton
    }

    fn state_by_name(&self, name: &str) -> Option<crate::state::StateId> {
        self.automaton
            .state_indices()
            .find(|&s| self.automaton.states().name(s) == Some(name))
    }
}
