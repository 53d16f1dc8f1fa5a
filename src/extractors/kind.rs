// src/extractors/kind.rs
use crate::patent::models::PatentType;
use once_cell::sync::Lazy;
use regex::Regex;

// WIPO ST.16: one letter plus one digit. These letter groups denote utility publications.
static UTILITY_KIND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ABCUYZ][0-9]$").expect("Failed to compile UTILITY_KIND_RE")
});

/// Coarse category of a document from its kind code.
pub fn patent_type(kind_code: &str) -> PatentType {
    if UTILITY_KIND_RE.is_match(kind_code.trim()) {
        PatentType::Utility
    } else {
        PatentType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utility_kinds() {
        for kind in ["A1", "a1", "B2", "C1", "U1", "Y2", "z9", " B1 "] {
            assert_eq!(patent_type(kind), PatentType::Utility, "kind {:?}", kind);
        }
    }

    #[test]
    fn test_other_kinds() {
        for kind in ["D1", "", "S1", "E1", "P2", "A", "A12", "1A", "XA1"] {
            assert_eq!(patent_type(kind), PatentType::Other, "kind {:?}", kind);
        }
    }
}
