//! Integration tests for refinement sessions

use mob_domain::{Field, FieldRule, Method};
use mob_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
use mob_gatekeeper::{Gatekeeper, ValidationConfig};
use mob_refiner::{
    run_session, Operator, OperatorResponse, Prompt, RefinementSession, RefinementState,
    RefinerError, SessionOutcome,
};
use mob_registry::RuleRegistry;
use std::collections::VecDeque;

const PAGE: &str = "<html><body><b>Cyana albipuncta</b></body></html>";

/// Operator answering from a fixed script, recording what it was shown
struct ScriptedOperator {
    script: VecDeque<OperatorResponse>,
    seen: Vec<Prompt>,
}

impl ScriptedOperator {
    fn new(script: impl IntoIterator<Item = OperatorResponse>) -> Self {
        Self {
            script: script.into_iter().collect(),
            seen: Vec::new(),
        }
    }
}

impl Operator for ScriptedOperator {
    type Error = String;

    fn choose(&mut self, prompt: &Prompt) -> Result<OperatorResponse, String> {
        self.seen.push(prompt.clone());
        self.script
            .pop_front()
            .ok_or_else(|| format!("script exhausted at {}", prompt.field))
    }
}

fn permissive_extractor() -> Extractor {
    Extractor::new(Gatekeeper::new(ValidationConfig::permissive()), ExtractorConfig::default())
}

fn broken_registry() -> RuleRegistry {
    RuleRegistry::from_toml("[default.name]\nselector = \"span\"\n").unwrap()
}

fn request() -> ExtractionRequest {
    ExtractionRequest::new(PAGE, "seven", "Cyana")
}

#[test]
fn test_valid_record_starts_committed() {
    let extractor = permissive_extractor();
    let registry = RuleRegistry::from_toml("[seven.name]\nselector = \"b\"\n").unwrap();

    let session = RefinementSession::new(&extractor, registry, request()).unwrap();
    assert_eq!(session.state(), RefinementState::Committed);
    assert!(session.render().is_none());

    match session.into_outcome() {
        Some(SessionOutcome::Committed { registry, forced, .. }) => {
            assert_eq!(registry.version(), 0);
            assert!(!forced);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_choose_suggestion_and_commit() {
    let extractor = permissive_extractor();
    let mut session = RefinementSession::new(&extractor, broken_registry(), request()).unwrap();

    let prompt = session.render().unwrap();
    assert_eq!(prompt.field, Field::Name);
    assert_eq!(prompt.current_value, "Unknown");
    assert_eq!(prompt.suggestions[0].rule, FieldRule::new("b", 0));

    let state = session
        .respond(OperatorResponse::Choose { suggestion: 0, method: Method::FullText })
        .unwrap();
    assert_eq!(state, RefinementState::AwaitingConfirmation);
    assert_eq!(session.render().unwrap().candidate_value.as_deref(), Some("albipuncta"));

    assert_eq!(session.respond(OperatorResponse::Accept).unwrap(), RefinementState::Committed);
    match session.outcome() {
        Some(SessionOutcome::Committed { registry, rules, forced }) => {
            assert_eq!(registry.version(), 1);
            assert_eq!(registry.book_rules("seven"), Some(rules));
            assert_eq!(rules.get(Field::Name), Some(&FieldRule::new("b", 0)));
            assert!(!forced);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_abandon_leaves_registry_alone() {
    let extractor = permissive_extractor();
    let mut session = RefinementSession::new(&extractor, broken_registry(), request()).unwrap();

    assert_eq!(session.respond(OperatorResponse::Abandon).unwrap(), RefinementState::Abandoned);
    assert!(matches!(session.outcome(), Some(SessionOutcome::Abandoned)));

    let err = session.respond(OperatorResponse::Accept).unwrap_err();
    assert!(matches!(
        err,
        RefinerError::InvalidTransition { state: RefinementState::Abandoned, .. }
    ));
}

#[test]
fn test_drop_candidate_returns_to_suggesting() {
    let extractor = permissive_extractor();
    let mut session = RefinementSession::new(&extractor, broken_registry(), request()).unwrap();

    session
        .respond(OperatorResponse::Custom { rule: FieldRule::new("b", 0) })
        .unwrap();
    assert_eq!(session.respond(OperatorResponse::Drop).unwrap(), RefinementState::Suggesting);

    let prompt = session.render().unwrap();
    assert!(prompt.candidate_rule.is_none());
    assert_eq!(session.provisional_rules().get(Field::Name), Some(&FieldRule::new("span", 0)));
}

#[test]
fn test_still_failing_loops_until_forced() {
    let extractor = Extractor::new(Gatekeeper::default_config(), ExtractorConfig::default());
    let mut session = RefinementSession::new(&extractor, broken_registry(), request()).unwrap();
    assert_eq!(session.current_field(), Some(Field::Name));

    session
        .respond(OperatorResponse::Custom { rule: FieldRule::new("b", 0) })
        .unwrap();
    session.respond(OperatorResponse::Accept).unwrap();
    assert_eq!(session.current_field(), Some(Field::Author));
    session.respond(OperatorResponse::Accept).unwrap();
    session.respond(OperatorResponse::Accept).unwrap();

    // Author and content still fail after revalidation
    assert_eq!(session.state(), RefinementState::Suggesting);
    assert_eq!(session.current_field(), Some(Field::Author));
    assert_eq!(session.latest().record.name, "albipuncta");

    assert_eq!(session.respond(OperatorResponse::Force).unwrap(), RefinementState::Committed);
    assert!(matches!(
        session.outcome(),
        Some(SessionOutcome::Committed { forced: true, .. })
    ));
}

#[test]
fn test_run_session_retries_bad_suggestion() {
    let extractor = permissive_extractor();
    let session = RefinementSession::new(&extractor, broken_registry(), request()).unwrap();
    let mut operator = ScriptedOperator::new([
        OperatorResponse::Choose { suggestion: 42, method: Method::FullText },
        OperatorResponse::Choose { suggestion: 0, method: Method::FullText },
        OperatorResponse::Accept,
    ]);

    let outcome = run_session(session, &mut operator).unwrap();
    assert!(matches!(outcome, SessionOutcome::Committed { forced: false, .. }));
    assert_eq!(operator.seen.len(), 3);
    assert_eq!(operator.seen[2].state, RefinementState::AwaitingConfirmation);
}

#[test]
fn test_operator_failure_propagates() {
    let extractor = permissive_extractor();
    let session = RefinementSession::new(&extractor, broken_registry(), request()).unwrap();
    let mut operator = ScriptedOperator::new(Vec::<OperatorResponse>::new());

    let err = run_session(session, &mut operator).unwrap_err();
    assert!(matches!(err, RefinerError::Operator(_)));
}

#[test]
fn test_missing_rules_is_registry_error() {
    let extractor = permissive_extractor();
    let registry = RuleRegistry::from_toml("[nine.name]\nselector = \"b\"\n").unwrap();

    let result = RefinementSession::new(&extractor, registry, request());
    assert!(matches!(result, Err(RefinerError::Registry(_))));
}
