//! All-parses chart parser for arbitrary context-free grammars.
//!
//! The chart maps `(start, end, nonterminal)` to every tree deriving
//! `input[start..end]` from that nonterminal. Spans are filled shortest
//! first; within a span rules are re-applied until the span's cells stop
//! growing, which picks up unit rules and empty productions. Grammar
//! construction rejects derivation cycles, so that loop terminates.

use std::collections::HashMap;
use std::rc::Rc;

use crate::grammar::{Grammar, Item, Label, NonterminalId};

/// A node of a parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseTree {
    /// A matched terminal.
    Leaf(char),
    /// An application of `rule`, with one child per right-hand side symbol.
    Node {
        rule: usize,
        label: Label,
        children: Vec<Rc<ParseTree>>,
    },
}

impl ParseTree {
    pub fn label(&self) -> Option<Label> {
        match self {
            ParseTree::Leaf(_) => None,
            ParseTree::Node { label, .. } => Some(*label),
        }
    }

    pub fn children(&self) -> &[Rc<ParseTree>] {
        match self {
            ParseTree::Leaf(_) => &[],
            ParseTree::Node { children, .. } => children,
        }
    }

    /// The terminals covered by this tree, left to right.
    pub fn leaves(&self) -> String {
        let mut out = String::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut String) {
        match self {
            ParseTree::Leaf(c) => out.push(*c),
            ParseTree::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

type Forest = Vec<Rc<ParseTree>>;

#[derive(Default)]
struct Chart {
    cells: HashMap<(usize, usize, NonterminalId), Forest>,
}

impl Chart {
    fn get(&self, start: usize, end: usize, nonterminal: NonterminalId) -> &[Rc<ParseTree>] {
        self.cells
            .get(&(start, end, nonterminal))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Insert a tree, returning whether it was new.
    fn insert(
        &mut self,
        start: usize,
        end: usize,
        nonterminal: NonterminalId,
        tree: Rc<ParseTree>,
    ) -> bool {
        let cell = self.cells.entry((start, end, nonterminal)).or_default();
        if cell.contains(&tree) {
            false
        } else {
            cell.push(tree);
            true
        }
    }

    fn take(&mut self, start: usize, end: usize, nonterminal: NonterminalId) -> Forest {
        self.cells
            .remove(&(start, end, nonterminal))
            .unwrap_or_default()
    }
}

/// Parses input against a borrowed grammar.
pub struct Parser<'g> {
    grammar: &'g Grammar,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Return every parse tree deriving the whole of `input` from the
    /// start symbol. Structurally equal trees are reported once.
    pub fn parse(&self, input: &str) -> Vec<Rc<ParseTree>> {
        let tokens: Vec<char> = input.chars().collect();
        let mut chart = Chart::default();

        for len in 0..=tokens.len() {
            for start in 0..=tokens.len() - len {
                self.fill_span(&mut chart, &tokens, start, start + len);
            }
        }

        let trees = chart.take(0, tokens.len(), 0);
        log::debug!(
            "parsed {} token(s) into {} tree(s)",
            tokens.len(),
            trees.len()
        );
        trees
    }

    fn fill_span(&self, chart: &mut Chart, tokens: &[char], start: usize, end: usize) {
        loop {
            let mut found = Vec::new();
            for (rule, (lhs, items)) in self.grammar.compiled_rules().iter().enumerate() {
                let mut derivations = Vec::new();
                let mut prefix = Vec::with_capacity(items.len());
                expand(chart, tokens, items, start, end, &mut prefix, &mut derivations);
                for children in derivations {
                    let label = self.grammar.rules()[rule].label;
                    let tree = ParseTree::Node {
                        rule,
                        label,
                        children,
                    };
                    found.push((*lhs, Rc::new(tree)));
                }
            }

            let mut changed = false;
            for (lhs, tree) in found {
                changed |= chart.insert(start, end, lhs, tree);
            }
            if !changed {
                break;
            }
        }
    }
}

/// Enumerate every way `items` derives `tokens[pos..end]` using the trees
/// already in the chart.
fn expand(
    chart: &Chart,
    tokens: &[char],
    items: &[Item],
    pos: usize,
    end: usize,
    prefix: &mut Vec<Rc<ParseTree>>,
    out: &mut Vec<Vec<Rc<ParseTree>>>,
) {
    let Some((first, rest)) = items.split_first() else {
        if pos == end {
            out.push(prefix.clone());
        }
        return;
    };

    // Each remaining terminal consumes exactly one token.
    let reserved = rest
        .iter()
        .filter(|item| matches!(item, Item::Terminal(_)))
        .count();
    if pos + reserved > end {
        return;
    }

    match *first {
        Item::Terminal(c) => {
            if tokens.get(pos) == Some(&c) && pos < end {
                prefix.push(Rc::new(ParseTree::Leaf(c)));
                expand(chart, tokens, rest, pos + 1, end, prefix, out);
                prefix.pop();
            }
        }
        Item::Nonterminal(nonterminal) if rest.is_empty() => {
            for tree in chart.get(pos, end, nonterminal) {
                prefix.push(Rc::clone(tree));
                out.push(prefix.clone());
                prefix.pop();
            }
        }
        Item::Nonterminal(nonterminal) => {
            for mid in pos..=end - reserved {
                for tree in chart.get(pos, mid, nonterminal) {
                    prefix.push(Rc::clone(tree));
                    expand(chart, tokens, rest, mid, end, prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}
