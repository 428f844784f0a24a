// Normalized bibliographic record for one paper

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Year used when the publication date is missing or malformed
pub const UNKNOWN_YEAR: &str = "N/A";

/// Author fallback when no author entry yields a name
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Abstract placeholder when the abstract section is absent or empty
pub const NO_ABSTRACT: &str = "No abstract available.";

/// Metadata extracted from a single structured document.
///
/// Every field has a fallback, so a constructed record never carries an
/// absent value. Records are not mutated after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub year: String,
    /// Surname token of the first author
    pub primary_author: String,
    /// Comma separated author names in document order
    pub full_authors: String,
    pub abstract_text: String,
    /// Lowercased, trimmed titles of cited works
    pub reference_titles: BTreeSet<String>,
    pub source_filename: String,
}

impl PaperRecord {
    /// Label made of the first `words` whitespace separated title tokens
    pub fn short_title(&self, words: usize) -> String {
        self.title
            .split_whitespace()
            .take(words)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of shared reference titles with another record
    pub fn shared_references(&self, other: &PaperRecord) -> usize {
        self.reference_titles
            .intersection(&other.reference_titles)
            .count()
    }
}

/// Normalize a cited title: lowercase and trim; blank titles are dropped
pub fn normalize_reference(raw: &str) -> Option<String> {
    let normalized = raw.to_lowercase().trim().to_string();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
pub(crate) fn record_with_refs(title: &str, refs: &[&str]) -> PaperRecord {
    PaperRecord {
        title: title.to_string(),
        year: UNKNOWN_YEAR.to_string(),
        primary_author: UNKNOWN_AUTHOR.to_string(),
        full_authors: UNKNOWN_AUTHOR.to_string(),
        abstract_text: NO_ABSTRACT.to_string(),
        reference_titles: refs.iter().filter_map(|r| normalize_reference(r)).collect(),
        source_filename: format!("{}.grobid.tei.xml", title.to_lowercase().replace(' ', "_")),
    }
}
