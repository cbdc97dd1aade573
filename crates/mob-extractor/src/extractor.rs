//! Core Extractor implementation

use crate::assemble::{resolve_identity, RawFields};
use crate::citation::{scrape_citation, CitationParser};
use crate::config::ExtractorConfig;
use crate::content::extract_content;
use crate::error::ExtractorError;
use crate::images::scrape_images;
use crate::methods;
use crate::policy::{AuthorPolicy, CorpusAuthorPolicy};
use crate::query::{element_text, Document};
use crate::types::{ExtractionMetadata, ExtractionRequest, ExtractionResult};
use mob_domain::{BookCatalog, Field, Method, RuleSet, ScrapedRecord, StatusVocabulary};
use mob_gatekeeper::Gatekeeper;
use mob_registry::RuleRegistry;
use tracing::{debug, info};

/// The Extractor turns a species page into a validated record
///
/// It is stateless between calls: every request builds a fresh record from
/// the document and the rule set it is given.
pub struct Extractor<P = CorpusAuthorPolicy>
where
    P: AuthorPolicy,
{
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
    vocabulary: StatusVocabulary,
    catalog: BookCatalog,
    policy: P,
    citations: CitationParser,
}

impl Extractor<CorpusAuthorPolicy> {
    /// Create a new Extractor with the corpus author policy
    pub fn new(gatekeeper: Gatekeeper, config: ExtractorConfig) -> Self {
        let policy = CorpusAuthorPolicy::new(config.authority.clone());
        Self::with_policy(gatekeeper, config, policy)
    }
}

impl<P> Extractor<P>
where
    P: AuthorPolicy,
{
    /// Create a new Extractor with a custom author policy
    pub fn with_policy(gatekeeper: Gatekeeper, config: ExtractorConfig, policy: P) -> Self {
        let citations = CitationParser::new(&config.exclusion_phrases);
        Self {
            gatekeeper,
            config,
            vocabulary: StatusVocabulary::default(),
            catalog: BookCatalog::default(),
            policy,
            citations,
        }
    }

    /// Use a status vocabulary other than the built-in one
    ///
    /// The gatekeeper is switched to the same vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: StatusVocabulary) -> Self {
        self.gatekeeper = self.gatekeeper.with_vocabulary(vocabulary.clone());
        self.vocabulary = vocabulary;
        self
    }

    /// Use a book catalog other than the built-in one
    pub fn with_catalog(mut self, catalog: BookCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The gate records are checked against
    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    /// Status vocabulary in use
    pub fn vocabulary(&self) -> &StatusVocabulary {
        &self.vocabulary
    }

    /// Extract a record using the registry's rules for the request's book
    ///
    /// Fails only when neither the book nor `default` has a rule set.
    pub fn extract(
        &self,
        registry: &RuleRegistry,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractorError> {
        let rules = registry.rules_for(&request.book)?;
        let used_default_rules = registry.book_rules(&request.book).is_none();
        if used_default_rules {
            info!("Using default rules for book '{}'", request.book);
        }

        let mut result = self.extract_with_rules(rules, request);
        result.metadata.used_default_rules = used_default_rules;
        result.metadata.registry_version = registry.version();
        Ok(result)
    }

    /// Extract a record with an explicit rule set
    pub fn extract_with_rules(&self, rules: &RuleSet, request: &ExtractionRequest) -> ExtractionResult {
        let document = Document::parse(&request.html);
        self.extract_document(&document, rules, request)
    }

    /// Extract a record from an already parsed document
    pub fn extract_document(
        &self,
        document: &Document,
        rules: &RuleSet,
        request: &ExtractionRequest,
    ) -> ExtractionResult {
        let record = self.build_record(document, rules, request);
        let validation = self.gatekeeper.validate(&record);

        ExtractionResult {
            record,
            validation,
            metadata: ExtractionMetadata {
                book: request.book.clone(),
                used_default_rules: false,
                registry_version: 0,
            },
        }
    }

    fn build_record(&self, document: &Document, rules: &RuleSet, request: &ExtractionRequest) -> ScrapedRecord {
        let resolve = |field: Field| {
            rules
                .get(field)
                .map(|rule| document.resolve(rule))
                .unwrap_or_default()
        };
        let raw = RawFields {
            name: resolve(Field::Name),
            genus: resolve(Field::Genus),
            author: resolve(Field::Author),
        };
        debug!(
            "Resolved name '{}', genus '{}', author '{}'",
            raw.name, raw.genus, raw.author
        );

        let identity = resolve_identity(
            rules,
            &raw,
            &request.genus_fallback,
            &self.vocabulary,
            &self.policy,
        );

        let body_content = rules
            .get(Field::Content)
            .map(|rule| extract_content(document, rule, rules.options))
            .unwrap_or_default();

        let citations: Vec<String> = self
            .citation_text(document, rules, &request.source)
            .into_iter()
            .filter(|citation| !citation.is_empty())
            .collect();

        let images = scrape_images(document, &request.book, &self.catalog, &self.config);

        ScrapedRecord {
            name: identity.name,
            author: identity.author,
            genus: identity.genus,
            taxonomic_status: identity.taxonomic_status,
            body_content,
            citations,
            scraped_genus_raw: identity.scraped_genus_raw,
            plates: images.plates,
            genitalia: images.genitalia,
            misc_images: images.misc,
        }
    }

    fn citation_text(&self, document: &Document, rules: &RuleSet, source: &str) -> Option<String> {
        let rule = rules.get(Field::Citation)?;
        let (matched, element) = document.resolve_rule(rule)?;
        if matched.method == Method::BuildCitationString {
            Some(scrape_citation(element, &self.citations, source))
        } else {
            let text = element_text(element);
            Some(methods::apply(&matched.method, &text, &self.vocabulary))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mob_domain::FieldRule;
    use mob_gatekeeper::ValidationConfig;

    fn create_test_extractor() -> Extractor {
        Extractor::new(Gatekeeper::new(ValidationConfig::permissive()), ExtractorConfig::default())
    }

    #[test]
    fn test_extract_empty_document() {
        let extractor = create_test_extractor();
        let rules = RuleSet::default().with(Field::Name, FieldRule::new("b", 0));
        let request = ExtractionRequest::new("<html></html>", "seven", "Cyana");

        let result = extractor.extract_with_rules(&rules, &request);
        assert_eq!(result.record.name, "Unknown");
        assert_eq!(result.record.genus, "Cyana");
        assert!(result.record.citations.is_empty());
        assert_eq!(result.record.plates.len(), 1);
    }

    #[test]
    fn test_plain_citation_method() {
        let extractor = create_test_extractor();
        let rules = RuleSet::default().with(
            Field::Citation,
            FieldRule::new("p", 0).with_method(Method::FirstWord),
        );
        let request = ExtractionRequest::new("<p>Cyana, 1976</p>", "seven", "Cyana");

        let result = extractor.extract_with_rules(&rules, &request);
        assert_eq!(result.record.citations, vec!["Cyana,"]);
    }
}
