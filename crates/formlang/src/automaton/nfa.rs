//! Epsilon non-deterministic finite automata.

use std::collections::VecDeque;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::alphabet::{Alphabet, EPSILON, SymbolId, is_epsilon};
use crate::automaton::state::{StateId, StateSet};
use crate::error::{EngineError, Result};

/// An epsilon-NFA with a single start state.
///
/// States are numbered `0..num_states`. Each state owns an adjacency list
/// of `(symbol, destination)` edges, where the symbol is either
/// [`EPSILON`] or an ID of the automaton's alphabet.
///
/// Automata are only mutated while one of the constructors in this module
/// tree is assembling them; every public operation returns a new value.
#[derive(Debug, Clone)]
pub struct Nfa {
    alphabet: Alphabet,
    start: StateId,
    accepting: StateSet,
    /// Outgoing edges, indexed by source state.
    edges: Vec<Vec<(SymbolId, StateId)>>,
    /// Epsilon closure of every state, computed on first use.
    closures: OnceLock<Vec<StateSet>>,
}

impl Nfa {
    /// An automaton with a single non-accepting start state.
    pub(crate) fn with_start(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            start: 0,
            accepting: StateSet::default(),
            edges: vec![Vec::new()],
            closures: OnceLock::new(),
        }
    }

    pub(crate) fn add_state(&mut self) -> StateId {
        self.edges.push(Vec::new());
        self.closures.take();
        (self.edges.len() - 1) as StateId
    }

    pub(crate) fn set_start(&mut self, state: StateId) {
        debug_assert!((state as usize) < self.edges.len());
        self.start = state;
    }

    pub(crate) fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        debug_assert!(is_epsilon(symbol) || (symbol as usize) < self.alphabet.len());
        debug_assert!((destination as usize) < self.edges.len());
        let edges = &mut self.edges[source as usize];
        if !edges.contains(&(symbol, destination)) {
            edges.push((symbol, destination));
        }
        self.closures.take();
    }

    pub(crate) fn add_epsilon_transition(&mut self, source: StateId, destination: StateId) {
        self.add_transition(source, EPSILON, destination);
    }

    pub(crate) fn add_accepting(&mut self, state: StateId) {
        debug_assert!((state as usize) < self.edges.len());
        self.accepting.insert(state);
    }

    pub(crate) fn take_accepting(&mut self) -> StateSet {
        std::mem::take(&mut self.accepting)
    }

    /// Copy the states and edges of `other` into this automaton, shifted
    /// past the existing states. Returns the shift. Start and accepting
    /// states of `other` are not carried over.
    pub(crate) fn embed(&mut self, other: &Nfa) -> StateId {
        debug_assert_eq!(self.alphabet, other.alphabet);
        let offset = self.edges.len() as StateId;
        self.edges.extend(other.edges.iter().map(|edges| {
            edges
                .iter()
                .map(|&(symbol, destination)| (symbol, destination + offset))
                .collect()
        }));
        self.closures.take();
        offset
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn num_states(&self) -> StateId {
        self.edges.len() as StateId
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn accepting_states(&self) -> &StateSet {
        &self.accepting
    }

    /// Whether the set contains an accepting state.
    pub fn accepts_any(&self, states: &StateSet) -> bool {
        states.intersects(&self.accepting)
    }

    /// All transitions as `(source, symbol, destination)`.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.edges.iter().enumerate().flat_map(|(source, edges)| {
            edges
                .iter()
                .map(move |&(symbol, destination)| (source as StateId, symbol, destination))
        })
    }

    fn closures(&self) -> &[StateSet] {
        self.closures.get_or_init(|| {
            (0..self.num_states())
                .map(|state| self.closure_of(state))
                .collect()
        })
    }

    /// Compute the epsilon closure of a single state using DFS.
    fn closure_of(&self, state: StateId) -> StateSet {
        let mut closure = StateSet::with_capacity(self.edges.len());
        let mut stack = vec![state];
        while let Some(s) = stack.pop() {
            if !closure.insert(s) {
                continue;
            }
            for &(symbol, destination) in &self.edges[s as usize] {
                if is_epsilon(symbol) && !closure.contains(destination) {
                    stack.push(destination);
                }
            }
        }
        closure
    }

    /// Get the epsilon closure of a set of states.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let closures = self.closures();
        let mut closure = StateSet::with_capacity(self.edges.len());
        for state in states.iter() {
            if let Some(cached) = closures.get(state as usize) {
                closure.union_with(cached);
            }
        }
        closure
    }

    /// The epsilon closure of the start state.
    pub fn start_closure(&self) -> StateSet {
        self.epsilon_closure(&StateSet::singleton(self.start, self.edges.len()))
    }

    /// States reachable from `states` by one `symbol` edge, epsilon closed.
    pub fn step(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        debug_assert!(!is_epsilon(symbol), "use epsilon_closure for epsilon moves");
        let mut reached = StateSet::with_capacity(self.edges.len());
        for state in states.iter() {
            for &(edge_symbol, destination) in &self.edges[state as usize] {
                if edge_symbol == symbol {
                    reached.insert(destination);
                }
            }
        }
        self.epsilon_closure(&reached)
    }

    /// Run the automaton over a sequence of symbol IDs.
    pub fn accepts_symbols(&self, input: &[SymbolId]) -> bool {
        let mut current = self.start_closure();
        for &symbol in input {
            if current.is_empty() {
                return false;
            }
            current = self.step(&current, symbol);
        }
        self.accepts_any(&current)
    }

    /// Check whether the automaton accepts `input`. Characters outside the
    /// alphabet are never accepted.
    pub fn accepts(&self, input: &str) -> bool {
        match self.alphabet.encode(input) {
            Some(symbols) => self.accepts_symbols(&symbols),
            None => false,
        }
    }

    /// Check if the language is empty: no accepting state is reachable.
    pub fn is_empty(&self) -> bool {
        let mut visited = StateSet::with_capacity(self.edges.len());
        let mut queue = VecDeque::from([self.start]);
        while let Some(state) = queue.pop_front() {
            if !visited.insert(state) {
                continue;
            }
            if self.accepting.contains(state) {
                return false;
            }
            for &(_, destination) in &self.edges[state as usize] {
                if !visited.contains(destination) {
                    queue.push_back(destination);
                }
            }
        }
        true
    }

    /// Re-express the automaton over a larger alphabet.
    ///
    /// Fails if a symbol of the current alphabet is missing from `alphabet`.
    pub fn with_alphabet(&self, alphabet: &Alphabet) -> Result<Nfa> {
        if let Some(missing) = self.alphabet.iter().find(|&c| !alphabet.contains(c)) {
            return Err(EngineError::invalid(format!(
                "symbol '{missing}' is not part of {alphabet}"
            )));
        }
        Ok(self.remap(alphabet))
    }

    /// Translate symbol IDs onto `alphabet`, dropping edges whose symbol it
    /// lacks.
    pub(crate) fn remap(&self, alphabet: &Alphabet) -> Nfa {
        if alphabet == &self.alphabet {
            return self.clone();
        }
        let mapping: Vec<Option<SymbolId>> =
            self.alphabet.iter().map(|c| alphabet.id_of(c)).collect();
        let edges = self
            .edges
            .iter()
            .map(|edges| {
                edges
                    .iter()
                    .filter_map(|&(symbol, destination)| {
                        if is_epsilon(symbol) {
                            Some((EPSILON, destination))
                        } else {
                            mapping[symbol as usize].map(|symbol| (symbol, destination))
                        }
                    })
                    .collect()
            })
            .collect();
        Nfa {
            alphabet: alphabet.clone(),
            start: self.start,
            accepting: self.accepting.clone(),
            edges,
            closures: OnceLock::new(),
        }
    }

    /// Transitions grouped by source and symbol, with symbols rendered as
    /// text (`ε` for epsilon moves). Meant for debugging and tests.
    pub fn to_transition_map(&self) -> IndexMap<StateId, IndexMap<String, Vec<StateId>>> {
        let mut map: IndexMap<StateId, IndexMap<String, Vec<StateId>>> = IndexMap::new();
        for (source, symbol, destination) in self.transitions() {
            let label = match self.alphabet.symbol(symbol) {
                Some(c) => c.to_string(),
                None => crate::alphabet::display(""),
            };
            map.entry(source)
                .or_default()
                .entry(label)
                .or_default()
                .push(destination);
        }
        map
    }
}
