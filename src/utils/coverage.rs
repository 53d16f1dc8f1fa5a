// src/utils/coverage.rs
use crate::extractors::FragmentScanner;
use serde::Serialize;

const PREVIEW_CHARS: usize = 80;

/// A stretch of bundle text that no fragment covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapSpan {
    pub start: usize,
    pub end: usize,
    pub preview: String,
}

/// Finds the non-whitespace text between (and around) matched fragments.
///
/// Boundary misses are skipped silently during extraction; this is the only
/// place they become visible, for debugging malformed bundles.
pub fn find_gaps(text: &str, scanner: &FragmentScanner) -> Vec<GapSpan> {
    let mut gaps = Vec::new();
    let mut last_end = 0;

    let mut push_gap = |start: usize, end: usize| {
        let slice = &text[start..end];
        if slice.trim().is_empty() {
            return;
        }
        let preview: String = slice.trim().chars().take(PREVIEW_CHARS).collect();
        gaps.push(GapSpan { start, end, preview });
    };

    for span in scanner.spans(text) {
        if span.start > last_end {
            push_gap(last_end, span.start);
        }
        last_end = span.end;
    }
    if last_end < text.len() {
        push_gap(last_end, text.len());
    }

    if !gaps.is_empty() {
        tracing::debug!("Found {} uncovered spans", gaps.len());
    }
    gaps
}
