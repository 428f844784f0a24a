// TEI document parser using roxmltree
//
// Reads the bibliographic parts of a GROBID TEI file: title statement,
// publication date, source description authors, abstract and the
// bibliography list.

use crate::error::{Error, Result};
use crate::extract::record::{
    normalize_reference, PaperRecord, NO_ABSTRACT, UNKNOWN_AUTHOR, UNKNOWN_YEAR,
};
use roxmltree::{Document, Node};
use std::collections::BTreeSet;
use std::path::Path;

/// Namespace of every element in a structured document
pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";

/// Number of leading abstract characters inspected for noise
const NOISE_WINDOW: usize = 50;

/// Parser for TEI structured documents
#[derive(Debug, Default, Clone, Copy)]
pub struct TeiParser;

impl TeiParser {
    /// Create a new TEI parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a structured document from disk
    pub fn parse_file(&self, path: &Path) -> Result<PaperRecord> {
        let source =
            std::fs::read_to_string(path).map_err(|e| Error::parse(path, e.to_string()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse_str(&source, &filename)
    }

    /// Parse a structured document held in memory
    pub fn parse_str(&self, source: &str, filename: &str) -> Result<PaperRecord> {
        let doc = Document::parse(source).map_err(|e| Error::parse(filename, e.to_string()))?;
        let root = doc.root_element();

        let title = extract_title(root).unwrap_or_else(|| filename.to_string());
        let year = extract_year(publication_date(root));

        let authors = extract_authors(root);
        let primary_author = authors
            .first()
            .and_then(|name| name.split_whitespace().next_back())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string();
        let full_authors = if authors.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            authors.join(", ")
        };

        let abstract_text = match extract_abstract(root) {
            Some(text) if !text.is_empty() => text,
            _ => NO_ABSTRACT.to_string(),
        };

        Ok(PaperRecord {
            title,
            year,
            primary_author,
            full_authors,
            abstract_text,
            reference_titles: extract_references(root),
            source_filename: filename.to_string(),
        })
    }
}

fn is_tei(node: &Node, name: &str) -> bool {
    node.is_element() && node.has_tag_name((TEI_NS, name))
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is_tei(n, name))
}

fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().filter(move |n| is_tei(n, name))
}

/// Concatenate every text node below `node`
fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// First `title` child of any `titleStmt`
fn extract_title(root: Node) -> Option<String> {
    descendants_named(root, "titleStmt")
        .flat_map(|stmt| children_named(stmt, "title"))
        .map(|title| text_content(title).trim().to_string())
        .next()
        .filter(|t| !t.is_empty())
}

/// `when` attribute of the first `date` under a `publicationStmt`
fn publication_date<'a>(root: Node<'a, '_>) -> Option<&'a str> {
    descendants_named(root, "publicationStmt")
        .flat_map(|stmt| children_named(stmt, "date"))
        .next()
        .and_then(|date| date.attribute("when"))
}

/// Four digit year from an ISO-like date, or "N/A"
pub fn extract_year(when: Option<&str>) -> String {
    match when {
        Some(value) => {
            let year: String = value.chars().take(4).collect();
            if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
                year
            } else {
                UNKNOWN_YEAR.to_string()
            }
        }
        None => UNKNOWN_YEAR.to_string(),
    }
}

/// "forename surname" for every author in the source description
fn extract_authors(root: Node) -> Vec<String> {
    let mut authors = Vec::new();

    for source_desc in descendants_named(root, "sourceDesc") {
        for author in descendants_named(source_desc, "author") {
            let Some(pers_name) = children_named(author, "persName").next() else {
                continue;
            };

            let part = |name: &str| {
                children_named(pers_name, name)
                    .next()
                    .map(text_content)
                    .unwrap_or_default()
            };

            let full_name = format!("{} {}", part("forename"), part("surname"))
                .trim()
                .to_string();
            if !full_name.is_empty() {
                authors.push(full_name);
            }
        }
    }

    authors
}

/// Abstract text, preferring paragraphs over the raw section text
fn extract_abstract(root: Node) -> Option<String> {
    let section = descendants_named(root, "abstract").next()?;

    let paragraphs: Vec<String> = descendants_named(section, "p")
        .map(|p| text_content(p).trim().to_string())
        .collect();

    let raw = if paragraphs.is_empty() {
        text_content(section)
    } else {
        paragraphs.join(" ")
    };

    Some(clean_abstract(raw.trim()))
}

/// Drop a leading link or figure caption sentence from an abstract.
///
/// Applies when the text starts with "http" or mentions "figure" within its
/// first 50 characters; everything up to the first ". " is removed. Text
/// without a ". " separator is returned unchanged.
pub fn clean_abstract(text: &str) -> String {
    let head: String = text.chars().take(NOISE_WINDOW).collect::<String>().to_lowercase();
    let noisy = head.starts_with("http") || head.contains("figure");

    if noisy {
        if let Some((_, rest)) = text.split_once(". ") {
            return rest.to_string();
        }
    }

    text.to_string()
}

/// Normalized titles of every bibliography entry
fn extract_references(root: Node) -> BTreeSet<String> {
    descendants_named(root, "listBibl")
        .flat_map(|list| descendants_named(list, "title"))
        .filter_map(|title| normalize_reference(&text_content(title)))
        .collect()
}
