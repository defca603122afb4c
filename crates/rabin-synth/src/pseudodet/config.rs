/// Safety caps for [`super::pseudo_det`] (spec §4.4.5 and §4.4.2 Step 3).
///
/// Reaching any of these caps produces a [`crate::warning::Warning`] and a partial result
/// rather than a failure (spec §7): the number of distinct labelled trees over a finite state
/// set is finite but doubly exponential, so unbounded exploration is not an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoDetConfig {
    /// Upper bound on the number of macro-states (output states) created.
    pub max_macro_states: usize,
    /// Upper bound on the number of macro-steps (current-macro-state, event) pairs processed.
    pub max_macro_steps: usize,
    /// A working tree exceeding this many nodes causes its macro-step to be skipped entirely.
    pub max_nodes_per_tree: usize,
    /// Upper bound on new children created per node during Step 3 of a single macro-step.
    pub max_children_per_node: usize,
    /// Upper bound on total new children created across all nodes during Step 3 of a single
    /// macro-step.
    pub max_new_children_per_step: usize,
    /// Upper bound on the number of states collected into a single candidate child's
    /// state-label during Step 3 (the `w = new-label(n) \ Iᵢ` computation); the label is
    /// truncated to the first states encountered once this many have been collected.
    pub max_states_per_new_child: usize,
}

impl Default for PseudoDetConfig {
    fn default() -> Self {
        Self {
            max_macro_states: 1000,
            max_macro_steps: 10_000,
            max_nodes_per_tree: 100,
            max_children_per_node: 3,
            max_new_children_per_step: 40,
            max_states_per_new_child: 5,
        }
    }
}
