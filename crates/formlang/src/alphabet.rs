//! Alphabets and the mapping between display and canonical symbols.
//!
//! Students type `∪` for union and `ε` for the empty string; the grammar
//! only knows `|` and the empty input. [`normalise`] rewrites the former
//! into the latter and [`display`] goes back.

use std::fmt;

use crate::error::{EngineError, Result};

/// A symbol identifier: the position of a symbol in its [`Alphabet`].
/// The special value `EPSILON` marks an epsilon (empty) transition.
pub type SymbolId = u32;

/// Symbol ID reserved for epsilon transitions.
pub const EPSILON: SymbolId = u32::MAX;

/// Check if a symbol is an epsilon transition.
#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// Display form of the union operator.
pub const UNION_DISPLAY: char = '∪';
/// Display form of the empty string.
pub const EPSILON_DISPLAY: char = 'ε';
/// The empty language. Canonical and display forms coincide.
pub const EMPTY_SET: char = '∅';

/// Characters with a meaning in the regex grammar.
pub fn is_metacharacter(c: char) -> bool {
    matches!(c, '|' | '*' | '+' | '^' | '?' | '(' | ')') || c.is_ascii_digit()
}

fn canonical_char(c: char) -> Option<char> {
    match c {
        UNION_DISPLAY => Some('|'),
        EPSILON_DISPLAY => None,
        other => Some(other),
    }
}

/// Rewrite a symbol or a sequence of symbols into canonical form.
///
/// `∪` becomes `|` and `ε` becomes the empty string; everything else is
/// left untouched. Applying it twice changes nothing.
pub fn normalise(display: &str) -> String {
    display.chars().filter_map(canonical_char).collect()
}

/// Rewrite a canonical symbol or sequence into its display form.
pub fn display(canonical: &str) -> String {
    if canonical.is_empty() {
        return EPSILON_DISPLAY.to_string();
    }
    canonical
        .chars()
        .map(|c| if c == '|' { UNION_DISPLAY } else { c })
        .collect()
}

/// An ordered set of single-character symbols.
///
/// Symbols are kept sorted by code point; that order is the canonical
/// ordering used when enumerating strings, and a symbol's position is its
/// [`SymbolId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from the characters of `symbols`.
    ///
    /// Display symbols are normalised first, so `ε` is dropped and `∪`
    /// stands for `|`.
    pub fn new(symbols: &str) -> Self {
        normalise(symbols).chars().collect()
    }

    /// Build an alphabet from a list of symbols, each of which must
    /// normalise to at most one character.
    pub fn from_symbols<'a, I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut chars = Vec::new();
        for symbol in symbols {
            let canonical = normalise(symbol);
            let mut it = canonical.chars();
            match (it.next(), it.next()) {
                (None, _) => {}
                (Some(c), None) => chars.push(c),
                (Some(_), Some(_)) => {
                    return Err(EngineError::invalid(format!(
                        "alphabet symbol \"{symbol}\" is longer than one character"
                    )));
                }
            }
        }
        Ok(chars.into_iter().collect())
    }

    /// The symbols a regex uses: every distinct character that is not a
    /// metacharacter.
    pub fn infer(regex: &str) -> Self {
        normalise(regex)
            .chars()
            .filter(|&c| !is_metacharacter(c))
            .collect()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.id_of(symbol).is_some()
    }

    /// Look up the ID of a symbol.
    pub fn id_of(&self, symbol: char) -> Option<SymbolId> {
        self.symbols
            .binary_search(&symbol)
            .ok()
            .map(|idx| idx as SymbolId)
    }

    /// Look up the symbol behind an ID. Epsilon has no symbol.
    pub fn symbol(&self, id: SymbolId) -> Option<char> {
        if is_epsilon(id) {
            None
        } else {
            self.symbols.get(id as usize).copied()
        }
    }

    /// Iterate over the symbols in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Iterate over all symbol IDs in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        0..self.symbols.len() as SymbolId
    }

    /// Map a string onto symbol IDs. Returns `None` if a character is not
    /// part of the alphabet.
    pub fn encode(&self, input: &str) -> Option<Vec<SymbolId>> {
        input.chars().map(|c| self.id_of(c)).collect()
    }

    /// The alphabet containing the symbols of both.
    pub fn union(&self, other: &Alphabet) -> Alphabet {
        self.iter().chain(other.iter()).collect()
    }
}

/// `∅` never becomes a symbol.
impl FromIterator<char> for Alphabet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut symbols: Vec<char> = iter.into_iter().filter(|&c| c != EMPTY_SET).collect();
        symbols.sort_unstable();
        symbols.dedup();
        Self { symbols }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, symbol) in self.symbols.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", display(&symbol.to_string()))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon() {
        assert!(is_epsilon(EPSILON));
        assert!(!is_epsilon(0));
        assert!(!is_epsilon(100));
    }

    #[test]
    fn test_normalise_special_symbols() {
        assert_eq!(normalise("∪"), "|");
        assert_eq!(normalise("ε"), "");
        assert_eq!(normalise("∅"), "∅");
        assert_eq!(normalise("a∪bε"), "a|b");
        assert_eq!(normalise("x"), "x");
    }

    #[test]
    fn test_normalise_idempotent() {
        for input in ["∪", "ε", "∅", "a", "(a∪b)*ε", "", "|", "a|b"] {
            let once = normalise(input);
            assert_eq!(normalise(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(display(""), "ε");
        assert_eq!(display("|"), "∪");
        assert_eq!(display("a|b"), "a∪b");
        assert_eq!(display("∅"), "∅");
        assert_eq!(normalise(&display("a|b")), "a|b");
    }

    #[test]
    fn test_alphabet_sorted_and_deduplicated() {
        let alphabet = Alphabet::new("cabbaε");
        assert_eq!(alphabet.iter().collect::<String>(), "abc");
        assert_eq!(alphabet.id_of('a'), Some(0));
        assert_eq!(alphabet.id_of('c'), Some(2));
        assert_eq!(alphabet.id_of('d'), None);
        assert_eq!(alphabet.symbol(1), Some('b'));
        assert_eq!(alphabet.symbol(EPSILON), None);
    }

    #[test]
    fn test_infer() {
        let alphabet = Alphabet::infer("(a∪b)*c^12?");
        assert_eq!(alphabet.iter().collect::<String>(), "abc");
        assert!(Alphabet::infer("ε").is_empty());
        assert!(Alphabet::infer("a∅").contains('a'));
        assert!(!Alphabet::infer("a∅").contains(EMPTY_SET));
    }

    #[test]
    fn test_from_symbols() {
        let alphabet = Alphabet::from_symbols(["b", "a", "ε"]).unwrap();
        assert_eq!(alphabet.len(), 2);
        assert!(Alphabet::from_symbols(["ab"]).is_err());
    }

    #[test]
    fn test_encode_and_union() {
        let ab = Alphabet::new("ab");
        assert_eq!(ab.encode("ba"), Some(vec![1, 0]));
        assert_eq!(ab.encode("bc"), None);
        let abc = ab.union(&Alphabet::new("cb"));
        assert_eq!(abc.to_string(), "{a, b, c}");
    }
}
