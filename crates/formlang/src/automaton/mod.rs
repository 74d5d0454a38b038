//! Finite automata.
//!
//! This module provides:
//! - an epsilon-NFA with lazily cached epsilon closures
//! - Thompson-style constructors forming a purely applicative algebra
//! - language equivalence with shortest counterexamples
//! - loading of authored automata from JSON

mod algebra;
mod equivalence;
mod nfa;
mod spec;
mod state;

pub use equivalence::{Verdict, equivalent};
pub use nfa::Nfa;
pub use spec::{AutomatonSpec, TransitionSpec, automaton_spec_to_nfa};
pub use state::{StateId, StateSet};
