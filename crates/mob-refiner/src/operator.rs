//! The operator seam: whoever answers the refinement prompts

use crate::{RefinementSession, RefinementState, RefinerError, SessionOutcome};
use mob_domain::{Field, FieldRule, Method};
use mob_extractor::{AuthorPolicy, Suggestion};
use std::fmt;
use tracing::warn;

/// An operator's answer to a [`Prompt`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorResponse {
    /// Keep the current rule, or confirm the previewed candidate
    Accept,

    /// Preview one of the offered suggestions with a method
    Choose {
        /// Index into [`Prompt::suggestions`]
        suggestion: usize,
        /// Method to apply to the suggested selector
        method: Method,
    },

    /// Preview a rule typed in by the operator
    Custom {
        /// The rule to try
        rule: FieldRule,
    },

    /// Remove the field's rule, or discard the previewed candidate
    Drop,

    /// Commit the provisional rules even though the record fails
    Force,

    /// End the session without committing
    Abandon,
}

impl fmt::Display for OperatorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorResponse::Accept => f.write_str("accept"),
            OperatorResponse::Choose { suggestion, method } => {
                write!(f, "choose #{} with {}", suggestion, method)
            }
            OperatorResponse::Custom { rule } => {
                write!(f, "custom '{}' [{}] {}", rule.selector, rule.index, rule.method)
            }
            OperatorResponse::Drop => f.write_str("drop"),
            OperatorResponse::Force => f.write_str("force"),
            OperatorResponse::Abandon => f.write_str("abandon"),
        }
    }
}

/// Everything an operator needs to answer for one field
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Session state the prompt was rendered in
    pub state: RefinementState,
    /// Field under refinement
    pub field: Field,
    /// Active provisional rule for the field
    pub current_rule: Option<FieldRule>,
    /// Value the active rule produces
    pub current_value: String,
    /// Rule being previewed
    pub candidate_rule: Option<FieldRule>,
    /// Value the previewed rule produces
    pub candidate_value: Option<String>,
    /// Every field the record currently fails on
    pub failing_fields: Vec<Field>,
    /// Why this field fails
    pub reasons: Vec<String>,
    /// Ranked selector suggestions for the field
    pub suggestions: Vec<Suggestion>,
}

/// Source of operator responses (terminal, form, script)
pub trait Operator {
    /// Error type for failing to obtain an answer
    type Error: fmt::Display;

    /// Answer a prompt
    fn choose(&mut self, prompt: &Prompt) -> Result<OperatorResponse, Self::Error>;
}

/// Drive a session to its end with `operator`
///
/// Responses the session rejects are logged and the operator is asked again.
pub fn run_session<P, O>(
    mut session: RefinementSession<'_, P>,
    operator: &mut O,
) -> Result<SessionOutcome, RefinerError>
where
    P: AuthorPolicy,
    O: Operator,
{
    while let Some(prompt) = session.render() {
        let response = operator
            .choose(&prompt)
            .map_err(|e| RefinerError::Operator(e.to_string()))?;

        match session.respond(response) {
            Ok(_) => {}
            Err(e @ (RefinerError::InvalidSuggestion { .. } | RefinerError::InvalidTransition { .. })) => {
                warn!("{}", e);
            }
            Err(e) => return Err(e),
        }
    }
    session.into_outcome().ok_or(RefinerError::Unfinished)
}
