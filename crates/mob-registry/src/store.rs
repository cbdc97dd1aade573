//! TOML file implementation of [`RuleStore`]

use crate::RegistryError;
use mob_domain::traits::RuleStore;
use mob_domain::RuleSet;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rule configuration kept in a single TOML file
///
/// Each top-level table is a book identifier (plus `default`). Saving writes
/// a sibling temp file and renames it over the original, so readers never
/// observe a half-written rule set.
#[derive(Debug, Clone)]
pub struct TomlRuleStore {
    path: PathBuf,
}

impl TomlRuleStore {
    /// Store backed by the file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleStore for TomlRuleStore {
    type Error = RegistryError;

    fn load_rules(&self) -> Result<BTreeMap<String, RuleSet>, Self::Error> {
        if !self.path.exists() {
            debug!("Rule file {} does not exist yet", self.path.display());
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn save_rules(&self, rules: &BTreeMap<String, RuleSet>) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(rules)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        info!("Saved {} rule set(s) to {}", rules.len(), self.path.display());
        Ok(())
    }
}

/// In-memory store, handy for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: std::sync::Mutex<BTreeMap<String, RuleSet>>,
}

impl MemoryRuleStore {
    /// Store pre-seeded with rule sets
    pub fn with_rules(rules: BTreeMap<String, RuleSet>) -> Self {
        Self {
            rules: std::sync::Mutex::new(rules),
        }
    }
}

impl RuleStore for MemoryRuleStore {
    type Error = RegistryError;

    fn load_rules(&self) -> Result<BTreeMap<String, RuleSet>, Self::Error> {
        let guard = self
            .rules
            .lock()
            .map_err(|e| RegistryError::Poisoned(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save_rules(&self, rules: &BTreeMap<String, RuleSet>) -> Result<(), Self::Error> {
        let mut guard = self
            .rules
            .lock()
            .map_err(|e| RegistryError::Poisoned(e.to_string()))?;
        *guard = rules.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryRuleStore::default();
        let mut rules = BTreeMap::new();
        rules.insert("seven".to_string(), RuleSet::default());
        store.save_rules(&rules).unwrap();
        assert_eq!(store.load_rules().unwrap(), rules);
    }

    #[test]
    fn test_poisoned_memory_store_reports_error() {
        let store = Arc::new(MemoryRuleStore::default());
        let writer = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = writer.rules.lock().unwrap();
            panic!("writer crashed while holding the lock");
        })
        .join();

        assert!(matches!(store.load_rules(), Err(RegistryError::Poisoned(_))));
        assert!(matches!(
            store.save_rules(&BTreeMap::new()),
            Err(RegistryError::Poisoned(_))
        ));
    }
}
