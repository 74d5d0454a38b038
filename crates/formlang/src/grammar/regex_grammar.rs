//! The regex grammar, extended with one literal rule per alphabet symbol.

use crate::alphabet::{Alphabet, is_metacharacter};
use crate::error::Result;
use crate::grammar::{Grammar, GrammarBuilder, Label, n, t};

/// Build the grammar recognising regexes over `alphabet`:
///
/// ```text
/// U -> C '|' U | '|' U | ε | C
/// C -> O C | O
/// O -> R '?' | R
/// R -> A '*' | A '+' | A '^' I | A
/// A -> '(' U ')' | L
/// I -> D | I D
/// D -> '0'..'9'
/// L -> <one rule per alphabet symbol>
/// ```
pub fn regex_grammar(alphabet: &Alphabet) -> Result<Grammar> {
    let mut builder = GrammarBuilder::new("U");
    builder
        .rule("U", vec![n("C"), t('|'), n("U")], Label::Union)
        .rule("U", vec![t('|'), n("U")], Label::EmptyUnion)
        .rule("U", vec![], Label::Empty)
        .rule("U", vec![n("C")], Label::Forward)
        .rule("C", vec![n("O"), n("C")], Label::Concatenation)
        .rule("C", vec![n("O")], Label::Forward)
        .rule("O", vec![n("R"), t('?')], Label::Option)
        .rule("O", vec![n("R")], Label::Forward)
        .rule("R", vec![n("A"), t('*')], Label::Star)
        .rule("R", vec![n("A"), t('+')], Label::Plus)
        .rule("R", vec![n("A"), t('^'), n("I")], Label::Repetition)
        .rule("R", vec![n("A")], Label::Forward)
        .rule("A", vec![t('('), n("U"), t(')')], Label::Paren)
        .rule("A", vec![n("L")], Label::Forward)
        .rule("I", vec![n("D")], Label::Digits)
        .rule("I", vec![n("I"), n("D")], Label::Digits);
    for digit in '0'..='9' {
        builder.rule("D", vec![t(digit)], Label::Digits);
    }

    builder.declare("L");
    for symbol in alphabet.iter() {
        if is_metacharacter(symbol) {
            log::warn!("alphabet symbol '{symbol}' is also a regex metacharacter");
        }
        builder.rule("L", vec![t(symbol)], Label::Terminal);
    }

    builder.build()
}
