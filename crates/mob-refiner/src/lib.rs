//! MoB Refiner
//!
//! Interactive rule refinement as an explicit state machine.
//!
//! # Overview
//!
//! A [`RefinementSession`] starts from a document whose record failed the
//! Validation Gate. It walks the failing fields one at a time, offering the
//! current value and ranked selector suggestions to an [`Operator`]. The
//! operator's answers build up a provisional rule set; once every field has
//! been visited the record is re-extracted and re-validated. The registry is
//! only updated when the whole record passes (or the operator forces it).
//!
//! # Architecture
//!
//! ```text
//!             ┌──── Choose/Custom ───► AwaitingConfirmation ──┐
//!             │                              │ Accept         │ Drop
//!   Suggesting ◄─────────────────────────────┼────────────────┘
//!      │  Accept/Drop (queue empty)          │ (queue empty)
//!      ▼                                     ▼
//!   Revalidating ── valid ──► Committed
//!      │
//!      └─ invalid ──► Suggesting (new failing fields)
//!
//!   Abandon (any open state) ──► Abandoned
//!   Force   (any open state) ──► Committed
//! ```
//!
//! # Example Usage
//!
//! ```
//! use mob_domain::{Field, FieldRule};
//! use mob_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use mob_gatekeeper::{Gatekeeper, ValidationConfig};
//! use mob_refiner::{OperatorResponse, RefinementSession, RefinementState};
//! use mob_registry::RuleRegistry;
//!
//! let registry = RuleRegistry::from_toml("[default.name]\nselector = \"i\"\n").unwrap();
//! let extractor = Extractor::new(
//!     Gatekeeper::new(ValidationConfig::permissive()),
//!     ExtractorConfig::default(),
//! );
//! let request = ExtractionRequest::new("<b>Cyana albipuncta</b>", "seven", "Cyana");
//!
//! let mut session = RefinementSession::new(&extractor, registry, request).unwrap();
//! assert_eq!(session.current_field(), Some(Field::Name));
//!
//! session
//!     .respond(OperatorResponse::Custom { rule: FieldRule::new("b", 0) })
//!     .unwrap();
//! let state = session.respond(OperatorResponse::Accept).unwrap();
//! assert_eq!(state, RefinementState::Committed);
//! ```

#![warn(missing_docs)]

mod error;
mod operator;
mod session;

pub use error::RefinerError;
pub use operator::{run_session, Operator, OperatorResponse, Prompt};
pub use session::{RefinementSession, RefinementState, SessionOutcome};
