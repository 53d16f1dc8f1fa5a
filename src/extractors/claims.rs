// src/extractors/claims.rs
use crate::extractors::paths::ClaimPaths;
use crate::extractors::{clean_text, leading_integer};
use crate::markup::MarkupTree;
use crate::patent::models::Claim;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+").expect("Failed to compile DIGIT_RUN_RE")
});

/// Claims of one document together with both claim counts.
///
/// `declared_count` comes from the document's metadata and `observed_count`
/// from counting claim elements. They are reported side by side and are
/// allowed to disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedClaims {
    pub claims: Vec<Claim>,
    pub declared_count: u32,
    pub observed_count: usize,
    pub exemplary: Option<u32>,
}

/// Claim number from an identifier such as `CLM-00012`: the first digit run.
pub fn claim_number(identifier: &str) -> Option<u32> {
    DIGIT_RUN_RE
        .find(identifier)
        .and_then(|m| m.as_str().parse().ok())
}

pub fn extract_claims(tree: &MarkupTree, paths: &ClaimPaths) -> ExtractedClaims {
    // Declared count comes from metadata; 0 when the schema or document has none
    let declared_count = paths
        .declared_count
        .as_ref()
        .map(|rule| rule.integer(tree))
        .unwrap_or(0);
    let exemplary = paths
        .exemplary
        .as_ref()
        .and_then(|p| clean_text(tree.query_one(p)))
        .and_then(|text| leading_integer(&text));

    // Claim elements are only looked for inside the first claims container
    let elements = tree
        .query_one(&paths.container)
        .map(|container| container.query_all(&paths.claim))
        .unwrap_or_default();

    let mut claims = Vec::with_capacity(elements.len());
    for element in &elements {
        // Identifier is optional; text survives even when the number does not parse
        let number = element.attribute(paths.id_attribute).and_then(claim_number);
        let text = element.text().trim().to_string();
        if text.is_empty() && number.is_none() {
            tracing::trace!("Skipping empty claim element without identifier");
            continue;
        }
        claims.push(Claim { number, text });
    }

    // Both counts are reported as-is, a mismatch is only logged
    if declared_count != 0 && declared_count as usize != elements.len() {
        tracing::debug!(
            "Declared claim count {} differs from {} claim elements",
            declared_count,
            elements.len()
        );
    }

    ExtractedClaims {
        claims,
        declared_count,
        observed_count: elements.len(),
        exemplary,
    }
}
