//! MoB Gatekeeper
//!
//! Validation Gate: decides whether an assembled record is plausible enough
//! to be persisted without operator review.
//!
//! The Gatekeeper checks:
//! - Name and genus (not empty, not "Unknown", not a status tag)
//! - Genus is a single token
//! - Author is present and not a placeholder abbreviation
//! - Body content has no leftover markup and a minimum length
//!
//! # Examples
//!
//! ```
//! use mob_domain::ScrapedRecord;
//! use mob_gatekeeper::{Gatekeeper, ValidationStatus};
//!
//! let gatekeeper = Gatekeeper::default_config();
//! let record = ScrapedRecord {
//!     name: "Unknown".to_string(),
//!     ..Default::default()
//! };
//!
//! let result = gatekeeper.validate(&record);
//! assert_eq!(result.status, ValidationStatus::Rejected);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
