//! Substring search over the document corpus.

use folio_content::{DocSection, walk_documents};
use serde::Serialize;

/// One search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Section path of the matching document.
    pub section: String,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SearchHit {
    /// Site route of the document (`/section/slug`).
    pub fn path(&self) -> String {
        format!("/{}/{}", self.section, self.slug)
    }
}

#[derive(Debug)]
struct IndexEntry {
    hit: SearchHit,
    title: String,
    description: String,
    content: String,
}

impl IndexEntry {
    fn matches(&self, needle: &str) -> bool {
        self.title.contains(needle)
            || self.description.contains(needle)
            || self.content.contains(needle)
    }
}

/// Case-insensitive substring index.
///
/// Entries keep discovery order: per section its items, then its subsections
/// depth-first. Haystacks are lowercased once, at build time.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    /// Index every document in the forest.
    pub fn build(sections: &[DocSection]) -> Self {
        let mut entries = Vec::new();
        walk_documents(sections, |entry| {
            let doc = entry.document;
            entries.push(IndexEntry {
                hit: SearchHit {
                    section: entry.section_path.to_owned(),
                    slug: doc.slug.clone(),
                    title: doc.title().to_owned(),
                    description: doc.description().map(str::to_owned),
                },
                title: doc.title().to_lowercase(),
                description: doc.description().unwrap_or_default().to_lowercase(),
                content: doc.content.to_lowercase(),
            });
        });
        Self { entries }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Documents whose title, description or body contain `query`.
    ///
    /// The query is matched verbatim (surrounding whitespace included); an
    /// empty query matches nothing. `limit` keeps the first `n` hits.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<SearchHit> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.matches(&needle))
            .take(limit.unwrap_or(usize::MAX))
            .map(|entry| entry.hit.clone())
            .collect()
    }
}
