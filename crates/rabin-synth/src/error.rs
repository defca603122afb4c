use automata_core::AutomatonError;
use thiserror::Error;

/// Errors raised by the synthesis pipeline, per the taxonomy of spec §7. Capacity exhaustion
/// is deliberately *not* represented here: it is not fatal and instead surfaces as a
/// [`crate::warning::Warning`] alongside a partial result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// The input automaton violates a structural invariant (spec §3); propagated unchanged
    /// from `automata_core::RabinAutomaton::validate`.
    #[error(transparent)]
    Structural(#[from] AutomatonError),

    /// `expand_to_control_patterns` would need more augmented patterns than the configured
    /// cap allows (spec §4.2: "Implementations must materialise patterns lazily or bound
    /// `|C|`; the spec mandates a configurable cap with a documented error on overflow").
    #[error(
        "control-pattern expansion needs 2^{num_controllable} = {needed} patterns per event, \
         which exceeds the configured cap of {cap}"
    )]
    ControlPatternCapExceeded {
        num_controllable: usize,
        needed: u64,
        cap: u64,
    },
}
