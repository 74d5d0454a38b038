//! Language equivalence with shortest counterexamples.
//!
//! Both automata are determinized on the fly: a search node is the pair
//! of epsilon-closed state sets reached by reading the same string in
//! each automaton. Breadth-first search with symbols taken in alphabet
//! order discovers nodes in shortlex order of their access strings, so
//! the first node whose two sides disagree on acceptance gives the
//! shortest, then lexicographically least, distinguishing string.

use std::collections::{HashMap, VecDeque};

use crate::alphabet::{Alphabet, SymbolId};
use crate::automaton::Nfa;
use crate::automaton::state::{StateId, StateSet};

/// Outcome of an equivalence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Both automata accept the same language.
    Equal,
    /// A string accepted by exactly one of the automata.
    CounterExample(String),
}

impl Verdict {
    pub fn is_equal(&self) -> bool {
        matches!(self, Verdict::Equal)
    }

    pub fn counterexample(&self) -> Option<&str> {
        match self {
            Verdict::Equal => None,
            Verdict::CounterExample(witness) => Some(witness),
        }
    }
}

/// One side of the product: an automaton and the translation from the
/// shared alphabet onto its own symbol IDs.
struct Side<'a> {
    nfa: &'a Nfa,
    symbols: Vec<Option<SymbolId>>,
}

impl<'a> Side<'a> {
    fn new(nfa: &'a Nfa, alphabet: &Alphabet) -> Self {
        let symbols = alphabet.iter().map(|c| nfa.alphabet().id_of(c)).collect();
        Self { nfa, symbols }
    }

    /// Symbols missing from this automaton's alphabet lead nowhere.
    fn step(&self, states: &StateSet, shared: usize) -> StateSet {
        match self.symbols[shared] {
            Some(symbol) if !states.is_empty() => self.nfa.step(states, symbol),
            _ => StateSet::default(),
        }
    }
}

type Key = (Vec<StateId>, Vec<StateId>);

/// Decide whether two automata accept the same language.
///
/// The search runs over the union of both alphabets and always
/// terminates: there are finitely many pairs of state sets.
pub fn equivalent(left: &Nfa, right: &Nfa) -> Verdict {
    let alphabet = left.alphabet().union(right.alphabet());
    let symbols: Vec<char> = alphabet.iter().collect();
    let lhs = Side::new(left, &alphabet);
    let rhs = Side::new(right, &alphabet);

    let start = (left.start_closure(), right.start_closure());
    if left.accepts_any(&start.0) != right.accepts_any(&start.1) {
        return Verdict::CounterExample(String::new());
    }

    // parents[n] is the node and symbol that first reached node n.
    let mut parents: Vec<Option<(usize, char)>> = vec![None];
    let mut seen: HashMap<Key, usize> = HashMap::new();
    seen.insert((start.0.to_vec(), start.1.to_vec()), 0);
    let mut queue = VecDeque::from([(0usize, start.0, start.1)]);

    while let Some((node, left_states, right_states)) = queue.pop_front() {
        for (shared, &symbol) in symbols.iter().enumerate() {
            let next_left = lhs.step(&left_states, shared);
            let next_right = rhs.step(&right_states, shared);
            let key = (next_left.to_vec(), next_right.to_vec());
            if seen.contains_key(&key) {
                continue;
            }

            let next = parents.len();
            parents.push(Some((node, symbol)));
            if left.accepts_any(&next_left) != right.accepts_any(&next_right) {
                log::debug!("counterexample found after {} product states", parents.len());
                return Verdict::CounterExample(trace(&parents, next));
            }
            seen.insert(key, next);
            queue.push_back((next, next_left, next_right));
        }
    }

    log::debug!("equivalent after {} product states", parents.len());
    Verdict::Equal
}

/// Rebuild the access string of a node from the parent links.
fn trace(parents: &[Option<(usize, char)>], mut node: usize) -> String {
    let mut symbols = Vec::new();
    while let Some((parent, symbol)) = parents[node] {
        symbols.push(symbol);
        node = parent;
    }
    symbols.iter().rev().collect()
}
