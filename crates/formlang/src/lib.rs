//! Regex compilation and finite-automaton equivalence.
//!
//! A regex is parsed against an explicit context-free grammar, reduced to
//! an AST and then to an epsilon-NFA with Thompson-style constructors.
//! Two automata can be compared for language equivalence; when they
//! differ, the shortest distinguishing string is returned.
//!
//! ```
//! use formlang::{Verdict, equivalent, regex_to_nfa};
//!
//! let star = regex_to_nfa("a*", Some("a")).unwrap();
//! let plus = regex_to_nfa("a+", Some("a")).unwrap();
//! assert!(star.accepts("aaa"));
//! assert_eq!(equivalent(&star, &plus), Verdict::CounterExample(String::new()));
//! ```

pub mod alphabet;
pub mod ast;
pub mod automaton;
pub mod compiler;
pub mod config;
pub mod error;
pub mod grammar;

#[cfg(feature = "python")]
mod python_bindings;

pub use alphabet::{Alphabet, display, normalise};
pub use automaton::{AutomatonSpec, Nfa, Verdict, automaton_spec_to_nfa, equivalent};
pub use compiler::{RegexCompiler, regex_to_nfa, regex_to_nfa_with};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
