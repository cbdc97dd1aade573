//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum trimmed length of the body content, in characters
    pub min_content_length: usize,

    /// Author values treated as no author at all (compared lowercased,
    /// without surrounding punctuation)
    pub author_placeholders: Vec<String>,

    /// Whether a record without an author fails
    pub require_author: bool,

    /// Whether genus must be a single token
    pub single_token_genus: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_content_length: 50,
            author_placeholders: vec!["spp".to_string()],
            require_author: true,
            single_token_genus: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (missing authors and short bodies pass)
    pub fn permissive() -> Self {
        Self {
            min_content_length: 0,
            require_author: false,
            ..Self::default()
        }
    }

    /// Create a strict configuration (longer bodies, more placeholders)
    pub fn strict() -> Self {
        Self {
            min_content_length: 200,
            author_placeholders: vec![
                "spp".to_string(),
                "sp".to_string(),
                "auct".to_string(),
                "unknown".to_string(),
            ],
            require_author: true,
            single_token_genus: true,
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self
            .author_placeholders
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err(GatekeeperError::Config(
                "author_placeholders must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.min_content_length, 50);
        assert_eq!(config.author_placeholders, vec!["spp"]);
        assert!(config.require_author);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = ValidationConfig::permissive();
        assert!(!config.require_author);
        assert_eq!(config.min_content_length, 0);
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert!(config.author_placeholders.iter().any(|p| p == "auct"));
        assert_eq!(config.min_content_length, 200);
    }

    #[test]
    fn test_empty_placeholder_is_invalid() {
        let config = ValidationConfig {
            author_placeholders: vec![" ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
