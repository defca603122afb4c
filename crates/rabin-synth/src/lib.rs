//! Supervisory-control synthesis pipeline over Rabin automata: synchronous product,
//! control-pattern alphabet expansion, epsilon-observation, and labelled-tree
//! pseudo-determinisation, composed as
//!
//! ```text
//! product -> expand_to_control_patterns -> eps_observation -> pseudo_det
//! ```

mod control_pattern;
mod eps_observation;
mod error;
mod product;
mod pseudodet;
mod warning;

pub use control_pattern::{
    expand_to_control_patterns, expand_to_control_patterns_with, ControlPatternConfig,
};
pub use eps_observation::eps_observation;
pub use error::SynthError;
pub use product::product;
pub use pseudodet::{pseudo_det, pseudo_det_with, Colour, LabeledTree, NodeId, PseudoDetConfig, PseudoDetOutcome, TreeNode};
pub use warning::Warning;
