use thiserror::Error;

use crate::event::EventId;
use crate::state::StateId;

/// Structural violations of the invariants demanded by spec §3: every transition must
/// reference states/events that actually exist, and initial/marked states must be subsets
/// of the state set. These are the only errors [`crate::RabinAutomaton::validate`] raises;
/// empty alphabets, empty acceptance conditions and disconnected states are all valid
/// (spec §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("transition references state {0} which is not in the automaton's state set")]
    DanglingState(StateId),
    #[error("transition references event {0} which is not in the automaton's alphabet")]
    DanglingEvent(EventId),
    #[error("initial state {0} is not contained in the automaton's state set")]
    InitialNotAState(StateId),
    #[error("marked state {0} is not contained in the automaton's state set")]
    MarkedNotAState(StateId),
}
