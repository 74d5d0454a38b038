//! Regex to NFA compilation.

use crate::alphabet::{Alphabet, display, normalise};
use crate::ast::Ast;
use crate::automaton::Nfa;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::grammar::{Grammar, Parser, regex_grammar};

/// Compiles regexes over one alphabet.
///
/// The grammar is built once in the constructor and shared by every
/// compilation.
#[derive(Debug, Clone)]
pub struct RegexCompiler {
    alphabet: Alphabet,
    grammar: Grammar,
    config: EngineConfig,
}

impl RegexCompiler {
    pub fn new(alphabet: Alphabet) -> Result<Self> {
        Self::with_config(alphabet, EngineConfig::default())
    }

    pub fn with_config(alphabet: Alphabet, config: EngineConfig) -> Result<Self> {
        let grammar = regex_grammar(&alphabet)?;
        Ok(Self {
            alphabet,
            grammar,
            config,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse a regex into its AST.
    ///
    /// Fails with `InvalidFormat` when the regex has no parse, and with
    /// `AmbiguousGrammar` when it has several.
    pub fn parse(&self, regex: &str) -> Result<Ast> {
        let canonical = normalise(regex);
        let trees = Parser::new(&self.grammar).parse(&canonical);
        match trees.as_slice() {
            [] => Err(EngineError::invalid(format!(
                "\"{}\" is not a valid regex over {}",
                display(&canonical),
                self.alphabet
            ))),
            [tree] => Ast::from_parse_tree(tree),
            _ => {
                let message = format!(
                    "\"{}\" has {} parse trees over {}",
                    display(&canonical),
                    trees.len(),
                    self.alphabet
                );
                log::error!("{message}");
                Err(EngineError::AmbiguousGrammar(message))
            }
        }
    }

    /// Compile a regex into an automaton.
    pub fn compile(&self, regex: &str) -> Result<Nfa> {
        let ast = self.parse(regex)?;
        let nfa = self.reduce(&ast)?;
        log::debug!(
            "compiled \"{regex}\" ({} AST nodes) into {} states",
            ast.size(),
            nfa.num_states()
        );
        Ok(nfa)
    }

    /// Build the automaton for an AST.
    pub fn reduce(&self, ast: &Ast) -> Result<Nfa> {
        let nfa = match ast {
            Ast::Terminal(c) => Nfa::literal(self.alphabet.clone(), *c)?,
            Ast::Empty => Nfa::empty_string(self.alphabet.clone()),
            Ast::EmptyUnion(x) | Ast::Option(x) => self.reduce(x)?.optional(),
            Ast::Union(a, b) => self.reduce(a)?.union(&self.reduce(b)?),
            Ast::Concatenation(a, b) => self.reduce(a)?.concat(&self.reduce(b)?),
            Ast::Star(x) => self.reduce(x)?.star(),
            Ast::Plus(x) => self.reduce(x)?.plus(),
            Ast::Paren(x) => self.reduce(x)?,
            Ast::Repetition(x, count) => {
                let count = self.repetition_count(count)?;
                let operand = self.reduce(x)?;
                let states = u64::from(operand.num_states()) * u64::from(count);
                if states > u64::from(self.config.max_states) {
                    return Err(self.too_large());
                }
                operand.repeat(count)
            }
            Ast::Digits(digits) => {
                return Err(EngineError::invalid(format!(
                    "count \"{digits}\" must follow '^'"
                )));
            }
        };
        if nfa.num_states() > self.config.max_states {
            return Err(self.too_large());
        }
        Ok(nfa)
    }

    fn repetition_count(&self, count: &Ast) -> Result<u32> {
        let Ast::Digits(digits) = count else {
            return Err(EngineError::invalid("'^' must be followed by a count"));
        };
        let max = self.config.max_repetition;
        match digits.parse::<u32>() {
            Ok(count) if count <= max => Ok(count),
            _ => Err(EngineError::invalid(format!(
                "repetition count {digits} exceeds the limit of {max}"
            ))),
        }
    }

    fn too_large(&self) -> EngineError {
        EngineError::invalid(format!(
            "automaton would exceed {} states",
            self.config.max_states
        ))
    }
}

/// Compile `regex` into an automaton.
///
/// The alphabet is given as a string of symbols; when omitted it is
/// inferred from the regex itself.
pub fn regex_to_nfa(regex: &str, alphabet: Option<&str>) -> Result<Nfa> {
    let alphabet = alphabet.map(Alphabet::new);
    regex_to_nfa_with(regex, alphabet, EngineConfig::default())
}

/// [`regex_to_nfa`] with an explicit configuration.
pub fn regex_to_nfa_with(
    regex: &str,
    alphabet: Option<Alphabet>,
    config: EngineConfig,
) -> Result<Nfa> {
    let alphabet = alphabet.unwrap_or_else(|| Alphabet::infer(regex));
    RegexCompiler::with_config(alphabet, config)?.compile(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(regex: &str, alphabet: &str) -> Nfa {
        regex_to_nfa(regex, Some(alphabet)).unwrap()
    }

    #[test]
    fn test_union() {
        let nfa = compile("a|b", "ab");
        assert!(nfa.accepts("a"));
        assert!(nfa.accepts("b"));
        assert!(!nfa.accepts("c"));
        assert!(!nfa.accepts(""));
    }

    #[test]
    fn test_star() {
        let nfa = compile("a*", "a");
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaaa"));
    }

    #[test]
    fn test_repetition() {
        let nfa = compile("a^3", "a");
        assert!(nfa.accepts("aaa"));
        assert!(!nfa.accepts("aa"));
        assert!(!nfa.accepts("aaaa"));

        let zero = compile("ba^0", "ab");
        assert!(zero.accepts("b"));
        assert!(!zero.accepts("ba"));
    }

    #[test]
    fn test_classic() {
        let nfa = compile("(a|b)*abb", "ab");
        assert!(nfa.accepts("aabb"));
        assert!(nfa.accepts("abb"));
        assert!(nfa.accepts("babb"));
        assert!(!nfa.accepts("abba"));
    }

    #[test]
    fn test_empty_forms() {
        let empty = compile("", "a");
        assert!(empty.accepts(""));
        assert!(!empty.accepts("a"));

        let leading = compile("|a", "a");
        assert!(leading.accepts(""));
        assert!(leading.accepts("a"));

        let trailing = compile("a|", "a");
        assert!(trailing.accepts(""));
        assert!(trailing.accepts("a"));
    }

    #[test]
    fn test_display_symbols() {
        let nfa = compile("a∪ε", "a");
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("a"));
        assert!(!nfa.accepts("aa"));
    }

    #[test]
    fn test_inferred_alphabet() {
        let nfa = regex_to_nfa("(xy)+z?", None).unwrap();
        assert_eq!(nfa.alphabet(), &Alphabet::new("xyz"));
        assert!(nfa.accepts("xyxyz"));
        assert!(!nfa.accepts("z"));
    }

    #[test]
    fn test_invalid_format() {
        for regex in ["(a", "a)", "*a", "a^", "c", "a∅"] {
            let err = regex_to_nfa(regex, Some("ab")).unwrap_err();
            assert!(err.is_user_facing(), "{regex}: {err}");
        }
        assert!(regex_to_nfa("∅", None).unwrap_err().is_user_facing());
    }

    #[test]
    fn test_repetition_limits() {
        let config = EngineConfig {
            max_repetition: 10,
            ..EngineConfig::default()
        };
        let alphabet = Some(Alphabet::new("a"));
        assert!(regex_to_nfa_with("a^10", alphabet.clone(), config).is_ok());
        assert!(regex_to_nfa_with("a^11", alphabet.clone(), config).is_err());
        assert!(regex_to_nfa("a^99999999999", Some("a")).is_err());
    }

    #[test]
    fn test_state_limit() {
        let config = EngineConfig {
            max_states: 100,
            ..EngineConfig::default()
        };
        let err = regex_to_nfa_with("(a^10)^10", Some(Alphabet::new("a")), config).unwrap_err();
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_ambiguous_alphabet() {
        let err = regex_to_nfa("a*", Some("a*")).unwrap_err();
        assert!(matches!(err, EngineError::AmbiguousGrammar(_)));
    }

    #[test]
    fn test_compiler_reuse() {
        let compiler = RegexCompiler::new(Alphabet::new("ab")).unwrap();
        assert!(compiler.compile("ab").unwrap().accepts("ab"));
        assert!(compiler.compile("b+").unwrap().accepts("bbb"));
        assert_eq!(compiler.parse("a?").unwrap(), Ast::Option(Box::new(Ast::Terminal('a'))));
    }
}
