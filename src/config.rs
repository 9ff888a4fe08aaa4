//! Agent configuration, loadable from TOML.
//!
//! ```toml
//! seed = 42        # omit for an entropy-seeded agent
//! max_turns = 50   # play_out cap
//! ```

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default cap on [`Agent::play_out`](crate::Agent::play_out) iterations.
pub const DEFAULT_MAX_TURNS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Seed for the candidate-ordering RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Maximum number of `play` calls made by `play_out`.
    pub max_turns: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl AgentConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(content)?;
        if config.max_turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.max_turns, 50);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AgentConfig::from_toml_str("").unwrap(), AgentConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = AgentConfig::from_toml_str("seed = 7").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_turns, DEFAULT_MAX_TURNS);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AgentConfig::from_toml_str("max_turns = 0"),
            Err(ConfigError::ZeroTurns)
        ));
        assert!(matches!(
            AgentConfig::from_toml_str("max_turns = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
