// src/extractors/document.rs
use crate::extractors::claims::extract_claims;
use crate::extractors::classification::extract_classifications;
use crate::extractors::clean_text;
use crate::extractors::fragment::FragmentScanner;
use crate::extractors::kind::patent_type;
use crate::extractors::party::PartyExtractor;
use crate::extractors::paths::PathTable;
use crate::markup::MarkupTree;
use crate::patent::dialect::Dialect;
use crate::patent::models::{GrantInfo, PatentDocument};
use crate::utils::error::ExtractError;

/// Builds [`PatentDocument`]s for one dialect, driven entirely by its path table.
///
/// Extraction is eager and stateless: the same fragment always produces the
/// same record, and no fragment can fail. Missing elements fall back to each
/// field's default.
#[derive(Debug, Clone, Copy)]
pub struct DocumentExtractor {
    dialect: Dialect,
    paths: &'static PathTable,
}

impl DocumentExtractor {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            paths: dialect.path_table(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn extract(&self, fragment: &str) -> PatentDocument {
        let tree = MarkupTree::parse(fragment);
        let paths = self.paths;

        // Kind code is needed twice: stored verbatim and classified
        let kind_code = paths.kind_code.text(&tree);
        let claims = extract_claims(&tree, &paths.claims);
        let parties = PartyExtractor::new(&paths.party).extract_roles(&tree, &paths.roles);
        // Grant info is dropped entirely when neither field is present
        let grant_info = paths.grant_info.as_ref().and_then(|gi| {
            let info = GrantInfo {
                disclaimer: clean_text(tree.query_one(&gi.disclaimer)),
                term_extension: clean_text(tree.query_one(&gi.term_extension)),
            };
            (!info.is_empty()).then_some(info)
        });

        let document = PatentDocument {
            doc_family: self.dialect.family(),
            schema_version: self.dialect.schema(),
            doc_number: paths.doc_number.text(&tree),
            patent_type: patent_type(&kind_code),
            kind_code,
            publication_date: paths.publication_date.text(&tree),
            country: paths.country.text(&tree),
            application_number: paths.application_number.text(&tree),
            filing_date: paths.filing_date.text(&tree),
            series_code: paths
                .series_code
                .as_ref()
                .map(|rule| rule.text(&tree))
                .filter(|code| !code.is_empty()),
            title: paths.title.text(&tree),
            abstract_text: paths.abstract_text.text(&tree),
            description: paths.description.text(&tree),
            classifications: extract_classifications(&tree, &paths.classifications),
            claims: claims.claims,
            declared_claim_count: claims.declared_count,
            observed_claim_count: claims.observed_count,
            exemplary_claim: claims.exemplary,
            parties,
            grant_info,
        };

        tracing::debug!(
            "Extracted {} document {} ({}), {} claims",
            self.dialect,
            document.doc_number,
            document.kind_code,
            document.claims.len()
        );
        document
    }

    /// Scans a whole bundle held in memory and extracts every matched document.
    pub fn extract_bundle<'a>(
        &'a self,
        scanner: &'a FragmentScanner,
        text: &'a str,
    ) -> impl Iterator<Item = PatentDocument> + 'a {
        scanner.fragments(text).map(move |fragment| self.extract(fragment))
    }
}

/// Convenience for one-off use: builds the scanner and extractor for `dialect`
/// and collects every document in `text`.
pub fn extract_all(dialect: Dialect, text: &str) -> Result<Vec<PatentDocument>, ExtractError> {
    let scanner = FragmentScanner::for_dialect(dialect)?;
    let extractor = DocumentExtractor::new(dialect);
    Ok(extractor.extract_bundle(&scanner, text).collect())
}
