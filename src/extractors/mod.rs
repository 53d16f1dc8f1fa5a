// src/extractors/mod.rs
pub mod classification;
pub mod claims;
pub mod document;
pub mod fragment;
pub mod kind;
pub mod party;
pub mod paths;

use crate::markup::MarkupNode;

// Re-export key extraction types for convenience
pub use document::DocumentExtractor;
pub use fragment::{FragmentScanner, StreamingFragments};
pub use kind::patent_type;

/// Trimmed text of `node`, or `None` when the node is missing or whitespace-only.
pub(crate) fn clean_text(node: Option<MarkupNode<'_>>) -> Option<String> {
    let text = node?.text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Leading decimal digits of `text` after trimming (`"20 claims"` → 20).
pub(crate) fn leading_integer(text: &str) -> Option<u32> {
    let text = text.trim();
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    text[..end].parse().ok()
}
