//! Refinement session state machine

use crate::operator::{OperatorResponse, Prompt};
use crate::RefinerError;
use mob_domain::{Field, FieldRule, RuleSet, ScrapedRecord};
use mob_extractor::{
    suggest_selectors, AuthorPolicy, CorpusAuthorPolicy, Document, ExtractionRequest,
    ExtractionResult, Extractor, Suggestion,
};
use mob_registry::RuleRegistry;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use tracing::{debug, info};

/// Refinement states
///
/// `Revalidating` is passed through whenever the field queue runs dry; a
/// caller only ever observes it in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementState {
    /// Offering the current field's value and suggestions
    Suggesting,

    /// A candidate rule was previewed and awaits confirmation
    AwaitingConfirmation,

    /// Re-extracting and re-validating under the provisional rules
    Revalidating,

    /// The provisional rules were written to the registry
    Committed,

    /// The session ended without changes
    Abandoned,
}

impl RefinementState {
    /// Whether the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, RefinementState::Committed | RefinementState::Abandoned)
    }
}

impl fmt::Display for RefinementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefinementState::Suggesting => "suggesting",
            RefinementState::AwaitingConfirmation => "awaiting confirmation",
            RefinementState::Revalidating => "revalidating",
            RefinementState::Committed => "committed",
            RefinementState::Abandoned => "abandoned",
        };
        f.write_str(name)
    }
}

/// How a session ended
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// The rules were committed
    Committed {
        /// Registry snapshot containing the new rules
        registry: RuleRegistry,
        /// The committed rule set
        rules: RuleSet,
        /// Whether the operator committed a record that still fails the gate
        forced: bool,
    },

    /// The operator gave up; the registry is unchanged
    Abandoned,
}

/// A candidate rule together with the value it produces
#[derive(Debug, Clone)]
struct Candidate {
    rule: FieldRule,
    value: String,
}

/// One refinement of one book's rules against one document
pub struct RefinementSession<'a, P = CorpusAuthorPolicy>
where
    P: AuthorPolicy,
{
    extractor: &'a Extractor<P>,
    registry: RuleRegistry,
    request: ExtractionRequest,
    document: Document,
    suggestions: BTreeMap<Field, Vec<Suggestion>>,
    provisional: RuleSet,
    latest: ExtractionResult,
    queue: VecDeque<Field>,
    candidate: Option<Candidate>,
    state: RefinementState,
    outcome: Option<SessionOutcome>,
}

impl<'a, P> RefinementSession<'a, P>
where
    P: AuthorPolicy,
{
    /// Start a session from the book's active rules
    ///
    /// A document whose record already passes starts out committed, with
    /// the registry unchanged.
    pub fn new(
        extractor: &'a Extractor<P>,
        registry: RuleRegistry,
        request: ExtractionRequest,
    ) -> Result<Self, RefinerError> {
        let provisional = registry.rules_for(&request.book)?.clone();
        let document = Document::parse(&request.html);
        let suggestions = suggest_selectors(&document);
        let latest = extractor.extract_document(&document, &provisional, &request);

        let mut session = Self {
            extractor,
            registry,
            request,
            document,
            suggestions,
            provisional,
            latest,
            queue: VecDeque::new(),
            candidate: None,
            state: RefinementState::Suggesting,
            outcome: None,
        };

        if session.latest.validation.is_valid() {
            info!("Record for '{}' already passes, nothing to refine", session.request.book);
            session.state = RefinementState::Committed;
            session.outcome = Some(SessionOutcome::Committed {
                registry: session.registry.clone(),
                rules: session.provisional.clone(),
                forced: false,
            });
        } else {
            session.queue = session.latest.validation.failing_fields.iter().copied().collect();
            debug!("Refining fields {:?}", session.queue);
        }
        Ok(session)
    }

    /// Current state
    pub fn state(&self) -> RefinementState {
        self.state
    }

    /// Field being refined, if the session is open
    pub fn current_field(&self) -> Option<Field> {
        if self.state.is_terminal() {
            None
        } else {
            self.queue.front().copied()
        }
    }

    /// The rules as refined so far
    pub fn provisional_rules(&self) -> &RuleSet {
        &self.provisional
    }

    /// Latest extraction under the provisional rules
    pub fn latest(&self) -> &ExtractionResult {
        &self.latest
    }

    /// How the session ended, once it has
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// Consume the session, returning its outcome
    pub fn into_outcome(self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// What to show the operator, while the session is open
    pub fn render(&self) -> Option<Prompt> {
        let field = self.current_field()?;
        let validation = &self.latest.validation;
        Some(Prompt {
            state: self.state,
            field,
            current_rule: self.provisional.get(field).cloned(),
            current_value: field_value(&self.latest.record, field),
            candidate_rule: self.candidate.as_ref().map(|c| c.rule.clone()),
            candidate_value: self.candidate.as_ref().map(|c| c.value.clone()),
            failing_fields: validation.failing_fields.iter().copied().collect(),
            reasons: validation
                .reasons
                .iter()
                .filter(|reason| reason.field() == field)
                .map(ToString::to_string)
                .collect(),
            suggestions: self.suggestions.get(&field).cloned().unwrap_or_default(),
        })
    }

    /// Apply an operator response, returning the new state
    pub fn respond(&mut self, response: OperatorResponse) -> Result<RefinementState, RefinerError> {
        let Some(field) = self.current_field() else {
            return Err(self.invalid(&response));
        };
        let from = self.state;

        match (self.state, response) {
            (RefinementState::Suggesting | RefinementState::AwaitingConfirmation, OperatorResponse::Abandon) => {
                self.state = RefinementState::Abandoned;
                self.outcome = Some(SessionOutcome::Abandoned);
                info!("Refinement of '{}' abandoned", self.request.book);
            }
            (RefinementState::Suggesting | RefinementState::AwaitingConfirmation, OperatorResponse::Force) => {
                if let Some(candidate) = self.candidate.take() {
                    self.provisional.set(field, candidate.rule);
                }
                self.commit(true);
            }
            (RefinementState::Suggesting | RefinementState::AwaitingConfirmation, OperatorResponse::Choose { suggestion, method }) => {
                let offered = self.suggestions.get(&field).map(Vec::as_slice).unwrap_or_default();
                let chosen = offered.get(suggestion).ok_or(RefinerError::InvalidSuggestion {
                    field,
                    index: suggestion,
                    available: offered.len(),
                })?;
                let rule = chosen.rule.clone().with_method(method);
                self.preview(field, rule);
            }
            (RefinementState::Suggesting | RefinementState::AwaitingConfirmation, OperatorResponse::Custom { rule }) => {
                self.preview(field, rule);
            }
            (RefinementState::Suggesting, OperatorResponse::Accept) => {
                self.next_field();
            }
            (RefinementState::Suggesting, OperatorResponse::Drop) => {
                self.provisional.remove(field);
                self.next_field();
            }
            (RefinementState::AwaitingConfirmation, OperatorResponse::Accept) => {
                if let Some(candidate) = self.candidate.take() {
                    self.provisional.set(field, candidate.rule);
                }
                self.next_field();
            }
            (RefinementState::AwaitingConfirmation, OperatorResponse::Drop) => {
                self.candidate = None;
                self.state = RefinementState::Suggesting;
            }
            (_, response) => return Err(self.invalid(&response)),
        }

        debug!("Refinement {} -> {} on '{}'", from, self.state, field);
        Ok(self.state)
    }

    fn invalid(&self, response: &OperatorResponse) -> RefinerError {
        RefinerError::InvalidTransition {
            state: self.state,
            response: response.to_string(),
        }
    }

    /// Re-extract with `rule` in place for `field` and hold it as candidate
    fn preview(&mut self, field: Field, rule: FieldRule) {
        let mut rules = self.provisional.clone();
        rules.set(field, rule.clone());
        let result = self.extractor.extract_document(&self.document, &rules, &self.request);
        let value = field_value(&result.record, field);
        debug!("Candidate {} for '{}' yields '{}'", rule.selector, field, value);

        self.candidate = Some(Candidate { rule, value });
        self.state = RefinementState::AwaitingConfirmation;
    }

    fn next_field(&mut self) {
        self.candidate = None;
        self.queue.pop_front();
        if self.queue.is_empty() {
            self.revalidate();
        } else {
            self.state = RefinementState::Suggesting;
        }
    }

    fn revalidate(&mut self) {
        self.state = RefinementState::Revalidating;
        debug!("Revalidating '{}' under provisional rules", self.request.book);
        self.latest = self
            .extractor
            .extract_document(&self.document, &self.provisional, &self.request);

        if self.latest.validation.is_valid() {
            self.commit(false);
        } else {
            self.queue = self.latest.validation.failing_fields.iter().copied().collect();
            self.state = RefinementState::Suggesting;
            info!(
                "Record still fails on {:?}, continuing refinement",
                self.latest.validation.failing_fields
            );
        }
    }

    fn commit(&mut self, forced: bool) {
        let registry = self.registry.commit(&self.request.book, self.provisional.clone());
        self.state = RefinementState::Committed;
        self.outcome = Some(SessionOutcome::Committed {
            registry,
            rules: self.provisional.clone(),
            forced,
        });
    }
}

/// The value a record holds for a field, as shown to the operator
fn field_value(record: &ScrapedRecord, field: Field) -> String {
    match field {
        Field::Name => record.name.clone(),
        Field::Genus => record.genus.clone(),
        Field::Author => record.author.clone().unwrap_or_default(),
        Field::Citation => record.citations.join("\n"),
        Field::Content => record.body_content.clone(),
    }
}
