//! Regex abstract syntax trees and their reduction from parse trees.

use std::fmt;

use crate::error::{EngineError, Result};
use crate::grammar::{Label, ParseTree};

/// A regex AST node. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Union(Box<Ast>, Box<Ast>),
    /// The empty string unioned with the operand, as in `|a`.
    EmptyUnion(Box<Ast>),
    /// The empty string.
    Empty,
    Concatenation(Box<Ast>, Box<Ast>),
    Option(Box<Ast>),
    Star(Box<Ast>),
    Plus(Box<Ast>),
    /// The operand repeated as many times as the [`Ast::Digits`] count says.
    Repetition(Box<Ast>, Box<Ast>),
    Paren(Box<Ast>),
    Terminal(char),
    Digits(String),
}

impl Ast {
    /// Reduce a parse tree of the regex grammar into an AST.
    ///
    /// Dispatch goes through each node's rule label. Terminal leaves only
    /// carry data for `Terminal` and `Digits` nodes; the other labels look
    /// at their nonterminal children alone.
    pub fn from_parse_tree(tree: &ParseTree) -> Result<Ast> {
        let Some(label) = tree.label() else {
            return Err(malformed("unexpected terminal"));
        };
        let operands: Vec<&ParseTree> = tree
            .children()
            .iter()
            .map(|child| child.as_ref())
            .filter(|child| child.label().is_some())
            .collect();

        let unary = |wrap: fn(Box<Ast>) -> Ast| -> Result<Ast> {
            match operands.as_slice() {
                [operand] => Ok(wrap(Box::new(Ast::from_parse_tree(operand)?))),
                _ => Err(malformed("expected one operand")),
            }
        };
        let binary = |wrap: fn(Box<Ast>, Box<Ast>) -> Ast| -> Result<Ast> {
            match operands.as_slice() {
                [lhs, rhs] => Ok(wrap(
                    Box::new(Ast::from_parse_tree(lhs)?),
                    Box::new(Ast::from_parse_tree(rhs)?),
                )),
                _ => Err(malformed("expected two operands")),
            }
        };

        match label {
            Label::Union => binary(Ast::Union),
            Label::Concatenation => binary(Ast::Concatenation),
            Label::Repetition => binary(Ast::Repetition),
            Label::EmptyUnion => unary(Ast::EmptyUnion),
            Label::Option => unary(Ast::Option),
            Label::Star => unary(Ast::Star),
            Label::Plus => unary(Ast::Plus),
            Label::Paren => unary(Ast::Paren),
            Label::Empty => Ok(Ast::Empty),
            Label::Forward => match operands.as_slice() {
                [operand] => Ast::from_parse_tree(operand),
                _ => Err(malformed("expected one operand")),
            },
            Label::Terminal => {
                let leaves = tree.leaves();
                let mut chars = leaves.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Ast::Terminal(c)),
                    _ => Err(malformed("terminal must cover one symbol")),
                }
            }
            Label::Digits => Ok(Ast::Digits(tree.leaves())),
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Ast::Union(a, b) | Ast::Concatenation(a, b) | Ast::Repetition(a, b) => {
                1 + a.size() + b.size()
            }
            Ast::EmptyUnion(a) | Ast::Option(a) | Ast::Star(a) | Ast::Plus(a) | Ast::Paren(a) => {
                1 + a.size()
            }
            Ast::Empty | Ast::Terminal(_) | Ast::Digits(_) => 1,
        }
    }
}

fn malformed(what: &str) -> EngineError {
    log::error!("parse tree does not match the regex grammar: {what}");
    EngineError::AmbiguousGrammar(format!("parse tree does not match the regex grammar: {what}"))
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Union(a, b) => write!(f, "{a}|{b}"),
            Ast::EmptyUnion(a) => write!(f, "|{a}"),
            Ast::Empty => Ok(()),
            Ast::Concatenation(a, b) => write!(f, "{a}{b}"),
            Ast::Option(a) => write!(f, "{a}?"),
            Ast::Star(a) => write!(f, "{a}*"),
            Ast::Plus(a) => write!(f, "{a}+"),
            Ast::Repetition(a, n) => write!(f, "{a}^{n}"),
            Ast::Paren(a) => write!(f, "({a})"),
            Ast::Terminal(c) => write!(f, "{c}"),
            Ast::Digits(digits) => write!(f, "{digits}"),
        }
    }
}
