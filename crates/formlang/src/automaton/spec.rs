//! Authored automata: named states and transitions, as drawn by a student.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, EMPTY_SET, EPSILON, SymbolId, normalise};
use crate::automaton::Nfa;
use crate::automaton::state::StateId;
use crate::error::{EngineError, Result};

/// One edge of an authored automaton. An empty symbol or `ε` denotes an
/// epsilon move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub from: String,
    pub symbol: String,
    pub to: String,
}

/// A state/transition graph in its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonSpec {
    /// Declared alphabet. When absent, the symbols used by the transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<Vec<String>>,
    pub states: Vec<String>,
    pub start: String,
    #[serde(default)]
    pub accepting: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
}

impl AutomatonSpec {
    /// Parse a spec from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| EngineError::invalid(format!("automaton is not valid JSON: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| EngineError::invalid(format!("automaton cannot be serialized: {e}")))
    }

    /// Build the automaton the spec describes.
    pub fn to_nfa(&self) -> Result<Nfa> {
        let alphabet = self.alphabet()?;

        let mut states: IndexMap<&str, StateId> = IndexMap::new();
        for name in &self.states {
            let id = states.len() as StateId;
            if states.insert(name.as_str(), id).is_some() {
                return Err(EngineError::invalid(format!("state \"{name}\" is declared twice")));
            }
        }
        let lookup = |name: &str| {
            states
                .get(name)
                .copied()
                .ok_or_else(|| EngineError::invalid(format!("unknown state \"{name}\"")))
        };

        let start = lookup(&self.start)?;
        let mut nfa = Nfa::with_start(alphabet);
        for _ in 1..states.len() {
            nfa.add_state();
        }
        nfa.set_start(start);
        for name in &self.accepting {
            nfa.add_accepting(lookup(name)?);
        }
        for transition in &self.transitions {
            let from = lookup(&transition.from)?;
            let to = lookup(&transition.to)?;
            let symbol = symbol_id(nfa.alphabet(), &transition.symbol)?;
            nfa.add_transition(from, symbol, to);
        }

        log::debug!(
            "loaded automaton with {} states and {} transitions",
            nfa.num_states(),
            self.transitions.len()
        );
        Ok(nfa)
    }

    fn alphabet(&self) -> Result<Alphabet> {
        let symbols: Vec<&str> = match &self.alphabet {
            Some(declared) => declared.iter().map(String::as_str).collect(),
            None => self.transitions.iter().map(|t| t.symbol.as_str()).collect(),
        };
        if symbols.iter().any(|s| s.contains(EMPTY_SET)) {
            return Err(EngineError::invalid(format!(
                "'{EMPTY_SET}' cannot label a transition"
            )));
        }
        Alphabet::from_symbols(symbols)
    }
}

fn symbol_id(alphabet: &Alphabet, symbol: &str) -> Result<SymbolId> {
    let canonical = normalise(symbol);
    let mut chars = canonical.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(EPSILON),
        (Some(c), None) => alphabet.id_of(c).ok_or_else(|| {
            EngineError::invalid(format!("symbol '{c}' is not part of {alphabet}"))
        }),
        _ => Err(EngineError::invalid(format!(
            "transition symbol \"{symbol}\" is longer than one character"
        ))),
    }
}

/// Build an automaton from its authored form.
pub fn automaton_spec_to_nfa(spec: &AutomatonSpec) -> Result<Nfa> {
    spec.to_nfa()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEN_AS: &str = r#"{
        "states": ["even", "odd"],
        "start": "even",
        "accepting": ["even"],
        "transitions": [
            { "from": "even", "symbol": "a", "to": "odd" },
            { "from": "odd", "symbol": "a", "to": "even" },
            { "from": "even", "symbol": "b", "to": "even" },
            { "from": "odd", "symbol": "b", "to": "odd" }
        ]
    }"#;

    #[test]
    fn test_even_number_of_as() {
        let nfa = AutomatonSpec::from_json(EVEN_AS).unwrap().to_nfa().unwrap();
        assert_eq!(nfa.num_states(), 2);
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("abab"));
        assert!(nfa.accepts("bbb"));
        assert!(!nfa.accepts("ab"));
    }

    #[test]
    fn test_epsilon_moves() {
        let spec = AutomatonSpec {
            alphabet: Some(vec!["a".into()]),
            states: vec!["p".into(), "q".into()],
            start: "p".into(),
            accepting: vec!["q".into()],
            transitions: vec![
                TransitionSpec {
                    from: "p".into(),
                    symbol: "ε".into(),
                    to: "q".into(),
                },
                TransitionSpec {
                    from: "q".into(),
                    symbol: "a".into(),
                    to: "p".into(),
                },
            ],
        };
        let nfa = automaton_spec_to_nfa(&spec).unwrap();
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaa"));
    }

    #[test]
    fn test_json_round_trip() {
        let spec = AutomatonSpec::from_json(EVEN_AS).unwrap();
        let again = AutomatonSpec::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(spec, again);
    }

    #[test]
    fn test_invalid_specs() {
        let cases = [
            "not json",
            r#"{ "states": ["p"], "start": "q" }"#,
            r#"{ "states": ["p", "p"], "start": "p" }"#,
            r#"{ "states": ["p"], "start": "p", "accepting": ["x"] }"#,
            r#"{ "states": ["p"], "start": "p",
                 "transitions": [{ "from": "p", "symbol": "ab", "to": "p" }] }"#,
            r#"{ "alphabet": ["a"], "states": ["p"], "start": "p",
                 "transitions": [{ "from": "p", "symbol": "b", "to": "p" }] }"#,
            r#"{ "states": ["p"], "start": "p",
                 "transitions": [{ "from": "p", "symbol": "∅", "to": "p" }] }"#,
        ];
        for case in cases {
            let result = AutomatonSpec::from_json(case).and_then(|spec| spec.to_nfa());
            let err = result.unwrap_err();
            assert!(err.is_user_facing(), "{case}: {err}");
        }
    }
}
