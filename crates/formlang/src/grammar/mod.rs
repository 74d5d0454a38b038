//! Context-free grammar primitives and the regex grammar.
//!
//! A [`Grammar`] is assembled with a [`GrammarBuilder`] and is immutable
//! afterwards. Every rule carries the [`Label`] the AST reducer uses for
//! the nodes it produces, so editing the grammar never shifts a lookup
//! table out of sync.

mod parser;
mod regex_grammar;

use std::fmt;

use fixedbitset::FixedBitSet;
use indexmap::IndexSet;

use crate::error::{EngineError, Result};

pub use parser::{ParseTree, Parser};
pub use regex_grammar::regex_grammar;

/// A named nonterminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonterminal(pub String);

impl From<&str> for Nonterminal {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One symbol on the right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(Nonterminal),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(c) => write!(f, "'{c}'"),
            Symbol::Nonterminal(nt) => write!(f, "{nt}"),
        }
    }
}

/// Shorthand for a terminal symbol.
pub fn t(c: char) -> Symbol {
    Symbol::Terminal(c)
}

/// Shorthand for a nonterminal symbol.
pub fn n(name: &str) -> Symbol {
    Symbol::Nonterminal(name.into())
}

/// The kind of AST node a rule application reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Union,
    EmptyUnion,
    Empty,
    Concatenation,
    Option,
    Star,
    Plus,
    Repetition,
    Paren,
    Terminal,
    Digits,
    /// The node stands for its only nonterminal child.
    Forward,
}

/// A production rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Nonterminal,
    pub rhs: Vec<Symbol>,
    pub label: Label,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " ε");
        }
        for symbol in &self.rhs {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

/// Index of a nonterminal inside its grammar.
pub(crate) type NonterminalId = usize;

/// A right-hand side item with nonterminals resolved to their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Item {
    Terminal(char),
    Nonterminal(NonterminalId),
}

/// Incrementally assembles a [`Grammar`].
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    start: Nonterminal,
    rules: Vec<Rule>,
    declared: Vec<Nonterminal>,
}

impl GrammarBuilder {
    pub fn new(start: &str) -> Self {
        Self {
            start: start.into(),
            rules: Vec::new(),
            declared: Vec::new(),
        }
    }

    /// Add a rule `lhs -> rhs` reducing to `label`.
    pub fn rule(&mut self, lhs: &str, rhs: Vec<Symbol>, label: Label) -> &mut Self {
        self.rules.push(Rule {
            lhs: lhs.into(),
            rhs,
            label,
        });
        self
    }

    /// Declare a nonterminal that may legitimately end up with no rules,
    /// such as the literal class of an empty alphabet.
    pub fn declare(&mut self, nonterminal: &str) -> &mut Self {
        self.declared.push(nonterminal.into());
        self
    }

    /// Validate and freeze the grammar.
    ///
    /// Fails with `AmbiguousGrammar` if a referenced nonterminal is never
    /// defined, or if some nonterminal derives itself without consuming
    /// input (which would admit infinitely many parse trees).
    pub fn build(self) -> Result<Grammar> {
        let mut nonterminals: IndexSet<Nonterminal> = IndexSet::new();
        nonterminals.insert(self.start.clone());
        for rule in &self.rules {
            nonterminals.insert(rule.lhs.clone());
        }
        for nonterminal in &self.declared {
            nonterminals.insert(nonterminal.clone());
        }

        let mut defined = FixedBitSet::with_capacity(nonterminals.len());
        for rule in &self.rules {
            if let Some(idx) = nonterminals.get_index_of(&rule.lhs) {
                defined.insert(idx);
            }
        }
        for nonterminal in &self.declared {
            if let Some(idx) = nonterminals.get_index_of(nonterminal) {
                defined.insert(idx);
            }
        }

        let mut compiled = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let mut items = Vec::with_capacity(rule.rhs.len());
            for symbol in &rule.rhs {
                items.push(match symbol {
                    Symbol::Terminal(c) => Item::Terminal(*c),
                    Symbol::Nonterminal(nt) => match nonterminals.get_index_of(nt) {
                        Some(idx) if defined.contains(idx) => Item::Nonterminal(idx),
                        _ => {
                            return Err(grammar_fault(format!(
                                "nonterminal {nt} used in \"{rule}\" has no rules"
                            )));
                        }
                    },
                });
            }
            let lhs = nonterminals.get_index_of(&rule.lhs).unwrap_or_default();
            compiled.push((lhs, items));
        }
        if !defined.contains(0) {
            return Err(grammar_fault(format!(
                "start symbol {} has no rules",
                self.start
            )));
        }

        let mut grammar = Grammar {
            rules: self.rules,
            compiled,
            nonterminals,
            nullable: FixedBitSet::new(),
        };
        grammar.nullable = grammar.compute_nullable();
        if let Some(cycle) = grammar.find_derivation_cycle() {
            return Err(grammar_fault(format!(
                "nonterminal {cycle} derives itself without consuming input"
            )));
        }

        log::debug!(
            "built grammar with {} rules over {} nonterminals",
            grammar.rules.len(),
            grammar.nonterminals.len()
        );
        Ok(grammar)
    }
}

fn grammar_fault(message: String) -> EngineError {
    log::error!("grammar construction failed: {message}");
    EngineError::AmbiguousGrammar(message)
}

/// An immutable context-free grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    /// Rules with nonterminals resolved to indices, parallel to `rules`.
    compiled: Vec<(NonterminalId, Vec<Item>)>,
    /// Index 0 is the start symbol.
    nonterminals: IndexSet<Nonterminal>,
    nullable: FixedBitSet,
}

impl Grammar {
    pub fn start(&self) -> &Nonterminal {
        &self.nonterminals[0]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn compiled_rules(&self) -> &[(NonterminalId, Vec<Item>)] {
        &self.compiled
    }

    pub(crate) fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    /// Whether a nonterminal can derive the empty string.
    pub fn is_nullable(&self, nonterminal: &Nonterminal) -> bool {
        self.nonterminals
            .get_index_of(nonterminal)
            .is_some_and(|idx| self.nullable.contains(idx))
    }

    fn compute_nullable(&self) -> FixedBitSet {
        let mut nullable = FixedBitSet::with_capacity(self.nonterminals.len());
        let mut changed = true;
        while changed {
            changed = false;
            for (lhs, items) in &self.compiled {
                if nullable.contains(*lhs) {
                    continue;
                }
                let all_nullable = items.iter().all(|item| match item {
                    Item::Terminal(_) => false,
                    Item::Nonterminal(nt) => nullable.contains(*nt),
                });
                if all_nullable {
                    nullable.insert(*lhs);
                    changed = true;
                }
            }
        }
        nullable
    }

    /// Find a nonterminal `A` with `A =>+ A`, following edges `A -> B`
    /// for rules `A -> x B y` where `x` and `y` are nullable.
    fn find_derivation_cycle(&self) -> Option<&Nonterminal> {
        let count = self.nonterminals.len();
        let mut edges: Vec<Vec<NonterminalId>> = vec![Vec::new(); count];
        for (lhs, items) in &self.compiled {
            for (pos, item) in items.iter().enumerate() {
                let Item::Nonterminal(target) = item else {
                    continue;
                };
                let others_nullable = items.iter().enumerate().all(|(other, item)| {
                    other == pos
                        || matches!(item, Item::Nonterminal(nt) if self.nullable.contains(*nt))
                });
                if others_nullable {
                    edges[*lhs].push(*target);
                }
            }
        }

        // Iterative DFS with colours: 0 = unvisited, 1 = on stack, 2 = done.
        let mut colour = vec![0u8; count];
        for root in 0..count {
            if colour[root] != 0 {
                continue;
            }
            let mut stack = vec![(root, 0usize)];
            colour[root] = 1;
            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                if let Some(&succ) = edges[node].get(next) {
                    frame.1 += 1;
                    match colour[succ] {
                        0 => {
                            colour[succ] = 1;
                            stack.push((succ, 0));
                        }
                        1 => return self.nonterminals.get_index(succ),
                        _ => {}
                    }
                } else {
                    colour[node] = 2;
                    stack.pop();
                }
            }
        }
        None
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
