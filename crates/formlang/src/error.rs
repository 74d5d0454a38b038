//! Error type for the engine.

use thiserror::Error;

/// Errors raised while compiling regexes or loading automata.
///
/// Equivalence checking never fails; only construction does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed regex or automaton specification. Safe to show to the
    /// person who wrote the input.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// The grammar produced more than one parse tree, or failed its
    /// construction checks. Signals a grammar/alphabet defect.
    #[error("ambiguous grammar: {0}")]
    AmbiguousGrammar(String),
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }

    /// Whether the error describes a problem with user input rather than
    /// with the engine itself.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing() {
        assert!(EngineError::invalid("unbalanced parenthesis").is_user_facing());
        assert!(!EngineError::AmbiguousGrammar("2 trees".into()).is_user_facing());
    }

    #[test]
    fn test_display() {
        let err = EngineError::invalid("no parse for \"a(\"");
        assert_eq!(err.to_string(), "invalid format: no parse for \"a(\"");
    }
}
