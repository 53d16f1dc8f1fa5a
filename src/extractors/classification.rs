// src/extractors/classification.rs
use crate::extractors::clean_text;
use crate::extractors::paths::{ClassificationPaths, SchemePaths, SymbolPaths};
use crate::markup::{MarkupNode, MarkupTree, TagPath};
use crate::patent::models::{ClassificationSet, Classifications};

/// Probes the domestic and international schemes independently.
///
/// A container that is present always produces a set, even when every class
/// entry in it is blank; only an absent container leaves the scheme out.
pub fn extract_classifications(tree: &MarkupTree, paths: &ClassificationPaths) -> Classifications {
    Classifications {
        domestic: paths.domestic.as_ref().and_then(|p| extract_scheme(tree, p)),
        international: paths.international.as_ref().and_then(|p| extract_scheme(tree, p)),
    }
}

fn extract_scheme(tree: &MarkupTree, paths: &SchemePaths) -> Option<ClassificationSet> {
    // No container means the scheme is absent, not empty
    let container = tree.query_one(&paths.container)?;
    let symbol = paths.symbol.as_ref();
    Some(ClassificationSet {
        main_classes: class_strings(container, &paths.main, symbol),
        sub_classes: class_strings(container, &paths.sub, symbol),
        country: paths.country.as_ref().and_then(|p| clean_text(container.query_one(p))),
    })
}

fn class_strings(container: MarkupNode<'_>, path: &TagPath, symbol: Option<&SymbolPaths>) -> Vec<String> {
    container
        .query_all(path)
        .into_iter()
        // Blank entries are dropped; structured entries are rendered before falling back to raw text
        .filter_map(|node| symbol.and_then(|s| structured_symbol(node, s)).or_else(|| clean_text(Some(node))))
        .collect()
}

/// Renders a structured entry, or `None` when it carries none of the prefix parts
/// (plain-text entries then fall back to their whole text).
fn structured_symbol(entry: MarkupNode<'_>, paths: &SymbolPaths) -> Option<String> {
    let prefix: String = paths
        .prefix
        .iter()
        .filter_map(|p| clean_text(entry.query_one(p)))
        .collect();
    if prefix.is_empty() {
        return None;
    }

    // Group and subgroup are optional on older records
    let group = clean_text(entry.query_one(&paths.group));
    let subgroup = clean_text(entry.query_one(&paths.subgroup));
    Some(match (group, subgroup) {
        (Some(group), Some(subgroup)) => format!("{} {}/{}", prefix, group, subgroup),
        (Some(group), None) => format!("{} {}", prefix, group),
        _ => prefix,
    })
}
