//! MoB Rule Registry
//!
//! Holds the per-book rule sets the extractor runs with.
//!
//! # Architecture
//!
//! - [`RuleRegistry`]: immutable, versioned snapshot; `commit` returns a new one
//! - [`TomlRuleStore`]: the `rules.toml` file behind the registry
//! - [`Mappings`]: status vocabulary and book catalog from `mappings.toml`
//!
//! # Examples
//!
//! ```
//! use mob_registry::RuleRegistry;
//!
//! let registry = RuleRegistry::from_toml(r#"
//! [default.name]
//! selector = "b"
//! index = 0
//! method = "full_text"
//! "#).unwrap();
//!
//! assert!(registry.rules_for("eleven").is_ok());
//! ```

#![warn(missing_docs)]

mod error;
mod mappings;
mod registry;
mod store;

pub use error::RegistryError;
pub use mappings::Mappings;
pub use registry::RuleRegistry;
pub use store::{MemoryRuleStore, TomlRuleStore};
