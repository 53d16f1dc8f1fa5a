// src/markup/mod.rs
//! Lenient tag-tree adapter.
//!
//! Bulk patent files are frequently malformed SGML/XML, so fragments are built
//! into a tree with scraper's HTML parser, which repairs nesting instead of
//! failing and lower-cases every tag and attribute name. This is the only
//! module that touches scraper; extractors see [`MarkupTree`], [`MarkupNode`]
//! and [`TagPath`].

use crate::utils::error::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// A compiled path query.
///
/// Paths are written as lower-case tag names separated by `/` (child step).
/// An empty step (`a//b`) means "any depth below", and `|` separates
/// alternatives whose matches are merged in document order. Every path is
/// anchored anywhere below the node it is evaluated against.
#[derive(Debug, Clone)]
pub struct TagPath {
    source: String,
    selector: Selector,
}

impl TagPath {
    pub fn parse(path: &str) -> Result<Self, ExtractError> {
        let mut alternatives = Vec::new();
        for alternative in path.split('|') {
            alternatives.push(Self::to_css(path, alternative)?);
        }
        let css = alternatives.join(", ");

        let selector = Selector::parse(&css).map_err(|e| ExtractError::InvalidPath {
            path: path.to_string(),
            reason: format!("{:?}", e),
        })?;

        Ok(Self {
            source: path.trim().to_string(),
            selector,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn to_css(path: &str, alternative: &str) -> Result<String, ExtractError> {
        let mut css = String::new();
        let mut combinator = "";
        for step in alternative.split('/') {
            let step = step.trim();
            if step.is_empty() {
                if !css.is_empty() {
                    combinator = " ";
                }
                continue;
            }
            if !is_tag_name(step) {
                return Err(ExtractError::InvalidPath {
                    path: path.to_string(),
                    reason: format!("'{}' is not a tag name", step),
                });
            }
            css.push_str(combinator);
            css.push_str(&step.to_ascii_lowercase());
            combinator = " > ";
        }

        if css.is_empty() {
            return Err(ExtractError::InvalidPath {
                path: path.to_string(),
                reason: "empty path".to_string(),
            });
        }
        Ok(css)
    }
}

fn is_tag_name(step: &str) -> bool {
    let mut chars = step.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// One fragment parsed into a navigable tree.
pub struct MarkupTree {
    html: Html,
}

impl MarkupTree {
    /// Builds a tree from raw markup. Never fails; broken nesting is repaired.
    pub fn parse(fragment: &str) -> Self {
        let html = Html::parse_document(fragment);
        if !html.errors.is_empty() {
            tracing::trace!("Markup repaired with {} parse errors", html.errors.len());
        }
        Self { html }
    }

    pub fn query_one(&self, path: &TagPath) -> Option<MarkupNode<'_>> {
        self.html.select(&path.selector).next().map(MarkupNode)
    }

    pub fn query_all(&self, path: &TagPath) -> Vec<MarkupNode<'_>> {
        self.html.select(&path.selector).map(MarkupNode).collect()
    }
}

/// A borrowed element inside a [`MarkupTree`].
#[derive(Debug, Clone, Copy)]
pub struct MarkupNode<'a>(ElementRef<'a>);

impl<'a> MarkupNode<'a> {
    /// First match strictly below this node.
    pub fn query_one(&self, path: &TagPath) -> Option<MarkupNode<'a>> {
        self.0.select(&path.selector).next().map(MarkupNode)
    }

    /// All matches strictly below this node, in document order.
    pub fn query_all(&self, path: &TagPath) -> Vec<MarkupNode<'a>> {
        self.0.select(&path.selector).map(MarkupNode).collect()
    }

    /// Full descendant text, untrimmed.
    pub fn text(&self) -> String {
        self.0.text().collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(&name.to_ascii_lowercase())
    }

    pub fn name(&self) -> &'a str {
        self.0.value().name()
    }
}
