//! Finite automaton container for Rabin-accepting discrete-event models.
//!
//! This crate plays the role spec.md calls the "collaborator library": it owns events,
//! states, the symbol tables that name them, the (possibly nondeterministic) transition
//! relation, and the [`RabinAcceptance`] condition. It carries no synthesis algorithms of
//! its own — those live in `rabin-synth`, which depends on this crate and only ever reads
//! and rebuilds values of type [`RabinAutomaton`].

mod automaton;
mod builder;
mod error;
mod event;
mod rabin;
mod state;

pub use automaton::{RabinAutomaton, Transitions};
pub use builder::RabinAutomatonBuilder;
pub use error::AutomatonError;
pub use event::{Event, EventId, EventSymbolTable};
pub use rabin::{RabinAcceptance, RabinPair};
pub use state::{StateId, StateSymbolTable};
