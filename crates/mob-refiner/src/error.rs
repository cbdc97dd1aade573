//! Error types for the Refiner

use crate::RefinementState;
use mob_domain::Field;
use mob_registry::RegistryError;
use thiserror::Error;

/// Errors that can occur while refining rules
#[derive(Error, Debug)]
pub enum RefinerError {
    /// The response is not valid in the current state
    #[error("Cannot apply '{response}' while {state}")]
    InvalidTransition {
        /// State the session was in
        state: RefinementState,
        /// The rejected response
        response: String,
    },

    /// Suggestion index out of range
    #[error("No suggestion {index} for field '{field}' ({available} available)")]
    InvalidSuggestion {
        /// Field being refined
        field: Field,
        /// Requested index
        index: usize,
        /// Number of suggestions offered
        available: usize,
    },

    /// The book has no rule set to start from
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The operator failed to answer
    #[error("Operator error: {0}")]
    Operator(String),

    /// The session ended without an outcome
    #[error("Session ended without committing or abandoning")]
    Unfinished,
}
