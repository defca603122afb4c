use std::fmt;

/// A non-fatal capacity-cap hit, per spec §7: "a configurable safety cap was hit; return a
/// partial result together with a warning record describing which cap triggered."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `pseudo_det` stopped enqueuing new macro-states after reaching the configured cap
    /// (spec §4.4.5).
    MaxMacroStates { cap: usize },
    /// `pseudo_det` stopped processing the exploration queue after the configured number of
    /// macro-steps (spec §4.4.5).
    MaxMacroSteps { cap: usize },
    /// A macro-step's working tree exceeded the configured node cap and the event was
    /// skipped for that macro-state (spec §4.4.2 Step 3 preamble, §4.4.5).
    MaxNodesPerTree { macro_step: usize },
    /// A node would have grown more children than the configured per-node cap during Step 3
    /// (spec §4.4.2 Step 3).
    MaxChildrenPerNode { macro_step: usize },
    /// A macro-step would have created more total new children than the configured cap
    /// during Step 3 (spec §4.4.2 Step 3).
    MaxNewChildrenPerStep { macro_step: usize },
    /// A candidate child's state-label was truncated to the configured cap while being built
    /// during Step 3 (spec §4.4.2 Step 3).
    MaxStatesPerNewChild { macro_step: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MaxMacroStates { cap } => {
                write!(f, "reached the maximum of {cap} macro-states; result is partial")
            }
            Warning::MaxMacroSteps { cap } => {
                write!(f, "reached the maximum of {cap} macro-steps; result is partial")
            }
            Warning::MaxNodesPerTree { macro_step } => write!(
                f,
                "tree exceeded the node cap during macro-step {macro_step}; event skipped"
            ),
            Warning::MaxChildrenPerNode { macro_step } => write!(
                f,
                "a node exceeded the per-node child cap during macro-step {macro_step}"
            ),
            Warning::MaxNewChildrenPerStep { macro_step } => write!(
                f,
                "macro-step {macro_step} exceeded the total new-children cap"
            ),
            Warning::MaxStatesPerNewChild { macro_step } => write!(
                f,
                "a candidate child's state-label was truncated during macro-step {macro_step}"
            ),
        }
    }
}
