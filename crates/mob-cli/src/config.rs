//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use mob_extractor::{Extractor, ExtractorConfig};
use mob_gatekeeper::{Gatekeeper, ValidationConfig};
use mob_registry::{Mappings, RuleRegistry, TomlRuleStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rule file (one table per book plus `default`)
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// Status vocabulary and book catalog
    #[serde(default = "default_mappings_path")]
    pub mappings_path: PathBuf,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Corpus tunings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Validation Gate thresholds
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and REPL history.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".mob-scraper"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from a file; a missing file gives the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Rule store at the configured path.
    pub fn rule_store(&self) -> TomlRuleStore {
        TomlRuleStore::new(&self.rules_path)
    }

    /// Load the rule registry along with the store it came from.
    pub fn open_registry(&self) -> Result<(RuleRegistry, TomlRuleStore)> {
        let store = self.rule_store();
        let registry = RuleRegistry::load(&store)?;
        Ok((registry, store))
    }

    /// Build an extractor from the configured thresholds and mappings.
    pub fn build_extractor(&self) -> Result<Extractor> {
        self.validation
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.extractor.validate().map_err(CliError::Config)?;

        let mappings = Mappings::load(&self.mappings_path)?;
        let gatekeeper = Gatekeeper::new(self.validation.clone());
        Ok(Extractor::new(gatekeeper, self.extractor.clone())
            .with_vocabulary(mappings.vocabulary())
            .with_catalog(mappings.catalog()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_path: default_rules_path(),
            mappings_path: default_mappings_path(),
            settings: Settings::default(),
            extractor: ExtractorConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("config/rules.toml")
}

fn default_mappings_path() -> PathBuf {
    PathBuf::from("config/mappings.toml")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rules_path, PathBuf::from("config/rules.toml"));
        assert!(config.settings.color);
        assert!(config.validation.require_author);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
rules_path = "/srv/mob/rules.toml"

[validation]
min_content_length = 10
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rules_path, PathBuf::from("/srv/mob/rules.toml"));
        assert_eq!(config.validation.min_content_length, 10);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.extractor.authority, "Holloway");
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.settings.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_open_missing_registry_is_empty() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            rules_path: temp.path().join("rules.toml"),
            ..Config::default()
        };
        let (registry, _store) = config.open_registry().unwrap();
        assert_eq!(registry.books().count(), 0);
    }

    #[test]
    fn test_invalid_extractor_config_rejected() {
        let mut config = Config::default();
        config.extractor.cdn_base_url = "https://cdn.example.org/".to_string();
        assert!(matches!(config.build_extractor(), Err(CliError::Config(_))));
    }
}
