//! Engine limits.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Limits applied while building automata.
///
/// Missing fields take their defaults when deserialized, so a config
/// file only needs to name the limits it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest count accepted by the `^` operator.
    pub max_repetition: u32,
    /// Largest automaton the compiler will build.
    pub max_states: u32,
}

impl EngineConfig {
    pub const DEFAULT_MAX_REPETITION: u32 = 1_000_000;
    pub const DEFAULT_MAX_STATES: u32 = 4_000_000;

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::invalid(format!("config: {e}")))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_repetition: Self::DEFAULT_MAX_REPETITION,
            max_states: Self::DEFAULT_MAX_STATES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(r#"{ "max_repetition": 50 }"#).unwrap();
        assert_eq!(config.max_repetition, 50);
        assert_eq!(config.max_states, EngineConfig::DEFAULT_MAX_STATES);
    }

    #[test]
    fn test_bad_json() {
        let err = EngineConfig::from_json("{ max_states: }").unwrap_err();
        assert!(err.is_user_facing());
    }
}
