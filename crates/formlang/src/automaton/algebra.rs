//! Thompson-style constructors.
//!
//! Every operator takes its operands by reference and returns a fresh
//! automaton. Binary operators over different alphabets first lift both
//! operands to the union of the two alphabets.

use std::borrow::Cow;

use crate::alphabet::{Alphabet, SymbolId};
use crate::automaton::Nfa;
use crate::error::{EngineError, Result};

impl Nfa {
    /// The automaton accepting nothing.
    pub fn empty_language(alphabet: Alphabet) -> Nfa {
        Nfa::with_start(alphabet)
    }

    /// The automaton accepting only the empty string.
    pub fn empty_string(alphabet: Alphabet) -> Nfa {
        let mut nfa = Nfa::with_start(alphabet);
        nfa.add_accepting(0);
        nfa
    }

    /// Two states joined by a single `symbol` edge.
    pub fn symbol(alphabet: Alphabet, symbol: SymbolId) -> Result<Nfa> {
        if (symbol as usize) >= alphabet.len() {
            return Err(EngineError::invalid(format!(
                "symbol #{symbol} is not part of {alphabet}"
            )));
        }
        let mut nfa = Nfa::with_start(alphabet);
        let accept = nfa.add_state();
        nfa.add_transition(0, symbol, accept);
        nfa.add_accepting(accept);
        Ok(nfa)
    }

    /// The automaton for the language `{c}`.
    pub fn literal(alphabet: Alphabet, c: char) -> Result<Nfa> {
        let symbol = alphabet
            .id_of(c)
            .ok_or_else(|| EngineError::invalid(format!("'{c}' is not part of {alphabet}")))?;
        Nfa::symbol(alphabet, symbol)
    }

    /// A fresh start with epsilon edges into both operands, whose accepting
    /// states all funnel into one new accepting state.
    pub fn union(&self, other: &Nfa) -> Nfa {
        let (lhs, rhs) = aligned(self, other);
        let mut nfa = Nfa::with_start(lhs.alphabet().clone());
        let lhs_offset = nfa.embed(&lhs);
        let rhs_offset = nfa.embed(&rhs);
        let accept = nfa.add_state();

        nfa.add_epsilon_transition(0, lhs.start_state() + lhs_offset);
        nfa.add_epsilon_transition(0, rhs.start_state() + rhs_offset);
        for state in lhs.accepting_states().iter() {
            nfa.add_epsilon_transition(state + lhs_offset, accept);
        }
        for state in rhs.accepting_states().iter() {
            nfa.add_epsilon_transition(state + rhs_offset, accept);
        }
        nfa.add_accepting(accept);
        nfa
    }

    /// Every accepting state of `self` gets an epsilon edge to the start
    /// of `other`; only the accepting states of `other` remain accepting.
    pub fn concat(&self, other: &Nfa) -> Nfa {
        let (lhs, rhs) = aligned(self, other);
        let mut nfa = lhs.into_owned();
        let lhs_accepting = nfa.take_accepting();
        let rhs_offset = nfa.embed(&rhs);

        for state in lhs_accepting.iter() {
            nfa.add_epsilon_transition(state, rhs.start_state() + rhs_offset);
        }
        for state in rhs.accepting_states().iter() {
            nfa.add_accepting(state + rhs_offset);
        }
        nfa
    }

    /// Kleene closure. The new start is accepting and leads into the
    /// operand; the operand's accepting states loop back to it.
    pub fn star(&self) -> Nfa {
        let mut nfa = Nfa::with_start(self.alphabet().clone());
        let offset = nfa.embed(self);
        nfa.add_epsilon_transition(0, self.start_state() + offset);
        for state in self.accepting_states().iter() {
            nfa.add_epsilon_transition(state + offset, 0);
        }
        nfa.add_accepting(0);
        nfa
    }

    /// One or more repetitions: the operand followed by its own star.
    pub fn plus(&self) -> Nfa {
        self.concat(&self.star())
    }

    /// The operand or the empty string.
    pub fn optional(&self) -> Nfa {
        self.union(&Nfa::empty_string(self.alphabet().clone()))
    }

    /// Exactly `count` copies of the operand in sequence. Zero copies is the
    /// empty-string automaton.
    pub fn repeat(&self, count: u32) -> Nfa {
        if count == 0 {
            return Nfa::empty_string(self.alphabet().clone());
        }
        let mut nfa = self.clone();
        let mut tail = nfa.take_accepting();
        for _ in 1..count {
            let offset = nfa.embed(self);
            for state in tail.iter() {
                nfa.add_epsilon_transition(state, self.start_state() + offset);
            }
            tail = self.accepting_states().iter().map(|s| s + offset).collect();
        }
        for state in tail.iter() {
            nfa.add_accepting(state);
        }
        nfa
    }
}

/// Bring two automata onto one alphabet.
fn aligned<'a>(lhs: &'a Nfa, rhs: &'a Nfa) -> (Cow<'a, Nfa>, Cow<'a, Nfa>) {
    if lhs.alphabet() == rhs.alphabet() {
        return (Cow::Borrowed(lhs), Cow::Borrowed(rhs));
    }
    let alphabet = lhs.alphabet().union(rhs.alphabet());
    (
        Cow::Owned(lhs.remap(&alphabet)),
        Cow::Owned(rhs.remap(&alphabet)),
    )
}
