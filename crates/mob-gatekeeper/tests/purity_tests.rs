//! Property tests: the gate is a pure function of its input

use mob_domain::{Field, ScrapedRecord};
use mob_gatekeeper::{Gatekeeper, ValidationConfig};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = ScrapedRecord> {
    (
        "(Unknown|sp\\. n\\.|[a-z]{0,10}|sp\\. [0-9])",
        "(Unknown|[A-Z][a-z]{0,8}( [A-Z][a-z]{1,6})?)",
        prop::option::of("(spp\\.|SPP|Holloway|Moore|)"),
        "[a-zA-Z<> .]{0,120}",
    )
        .prop_map(|(name, genus, author, body_content)| ScrapedRecord {
            name,
            genus,
            author,
            body_content,
            ..Default::default()
        })
}

proptest! {
    /// Property: validating the same record twice yields the same verdict
    #[test]
    fn test_validation_is_deterministic(record in record_strategy()) {
        let gatekeeper = Gatekeeper::default_config();
        let first = gatekeeper.validate(&record);
        let second = gatekeeper.validate(&record.clone());
        prop_assert_eq!(first, second);
    }

    /// Property: every failing field has a reason and vice versa
    #[test]
    fn test_failing_fields_match_reasons(record in record_strategy()) {
        let result = Gatekeeper::new(ValidationConfig::strict()).validate(&record);
        for reason in &result.reasons {
            prop_assert!(result.failing_fields.contains(&reason.field()));
        }
        prop_assert_eq!(result.is_valid(), result.failing_fields.is_empty());
        prop_assert!(!result.failing_fields.contains(&Field::Citation));
    }
}

#[test]
fn test_spp_author_fails() {
    let record = ScrapedRecord {
        name: "species".to_string(),
        genus: "Genus".to_string(),
        author: Some("spp.".to_string()),
        body_content: "x".repeat(80),
        ..Default::default()
    };
    let result = Gatekeeper::default_config().validate(&record);
    assert_eq!(
        result.failing_fields.into_iter().collect::<Vec<_>>(),
        vec![Field::Author]
    );
}
