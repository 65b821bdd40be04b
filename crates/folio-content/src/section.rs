//! Section nodes and tree traversal helpers.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::document::DocContent;

/// Top-level section directory names: two digits, a dash, a non-empty rest.
static SECTION_DIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{2}-.+$").unwrap());

/// Leading ordering prefix such as `04-`.
static ORDER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+-").unwrap());

/// A directory-derived node in the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocSection {
    /// Display title from section metadata or humanized from the slug.
    pub title: String,
    /// Directory name with the ordering prefix stripped.
    pub slug: String,
    /// Optional description from section metadata.
    pub description: Option<String>,
    /// On-disk directory name.
    pub dir_name: String,
    /// Documents directly inside this directory, sorted by `(order, slug)`.
    pub items: Vec<DocContent>,
    /// Child sections, sorted by slug.
    pub subsections: Vec<DocSection>,
}

impl DocSection {
    /// Create an empty section for a directory name.
    pub fn new(dir_name: impl Into<String>) -> Self {
        let dir_name = dir_name.into();
        let slug = strip_order_prefix(&dir_name).to_owned();
        Self {
            title: humanize(&slug),
            slug,
            description: None,
            dir_name,
            items: Vec::new(),
            subsections: Vec::new(),
        }
    }

    /// Whether the section has no items and no subsections.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.subsections.is_empty()
    }

    /// Direct item with the given slug.
    pub fn item(&self, slug: &str) -> Option<&DocContent> {
        self.items.iter().find(|doc| doc.slug == slug)
    }

    /// Direct subsection with the given slug.
    pub fn subsection(&self, slug: &str) -> Option<&DocSection> {
        self.subsections.iter().find(|s| s.slug == slug)
    }

    /// Number of documents in this section and all subsections.
    pub fn document_count(&self) -> usize {
        self.items.len()
            + self
                .subsections
                .iter()
                .map(DocSection::document_count)
                .sum::<usize>()
    }

    /// Sort direct items and subsections (not recursive).
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            a.front_matter
                .order
                .cmp(&b.front_matter.order)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        sort_sections(&mut self.subsections);
    }
}

/// Sort sibling sections by slug, breaking ties by directory name.
pub(crate) fn sort_sections(sections: &mut [DocSection]) {
    sections.sort_by(|a, b| a.slug.cmp(&b.slug).then_with(|| a.dir_name.cmp(&b.dir_name)));
}

/// A document together with the slash-joined slug path of its section.
#[derive(Clone, Copy, Debug)]
pub struct DocumentEntry<'a> {
    /// Section path such as `web-development/react`.
    pub section_path: &'a str,
    /// The document.
    pub document: &'a DocContent,
}

/// Visit every document in discovery order.
///
/// Order: per section, its items first, then its subsections depth-first.
/// The callback receives the section path and the document.
pub fn walk_documents<F>(sections: &[DocSection], mut visit: F)
where
    F: FnMut(DocumentEntry<'_>),
{
    let mut path = String::new();
    for section in sections {
        walk_section(section, &mut path, &mut visit);
    }
}

fn walk_section<F>(section: &DocSection, path: &mut String, visit: &mut F)
where
    F: FnMut(DocumentEntry<'_>),
{
    let parent_len = path.len();
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(&section.slug);
    for document in &section.items {
        visit(DocumentEntry {
            section_path: path.as_str(),
            document,
        });
    }
    for child in &section.subsections {
        walk_section(child, path, visit);
    }
    path.truncate(parent_len);
}

/// Whether a top-level directory name qualifies as a section (`NN-<slug>`).
pub fn is_section_dir_name(name: &str) -> bool {
    SECTION_DIR_RE.is_match(name)
}

/// Strip a leading numeric ordering prefix (`04-web-development` → `web-development`).
///
/// Names that would become empty are returned unchanged.
pub fn strip_order_prefix(name: &str) -> &str {
    match ORDER_PREFIX_RE.find(name) {
        Some(m) if m.end() < name.len() => &name[m.end()..],
        _ => name,
    }
}

/// Human-readable title from a slug: words split on `-`, `_` or spaces,
/// each capitalized.
pub fn humanize(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(slug: &str, order: i64) -> DocContent {
        let text = format!("---\norder: {order}\n---\nbody");
        DocContent::from_source(slug, format!("{slug}.md"), &text).unwrap()
    }

    #[test]
    fn test_is_section_dir_name() {
        assert!(is_section_dir_name("01-intro"));
        assert!(is_section_dir_name("04-web-development"));
        assert!(!is_section_dir_name("1-intro"));
        assert!(!is_section_dir_name("001-intro"));
        assert!(!is_section_dir_name("01-"));
        assert!(!is_section_dir_name("intro"));
        assert!(!is_section_dir_name("README.md"));
    }

    #[test]
    fn test_strip_order_prefix() {
        assert_eq!(strip_order_prefix("04-web-development"), "web-development");
        assert_eq!(strip_order_prefix("1-basics"), "basics");
        assert_eq!(strip_order_prefix("react"), "react");
        assert_eq!(strip_order_prefix("2024"), "2024");
        assert_eq!(strip_order_prefix("01-"), "01-");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("web-development"), "Web Development");
        assert_eq!(humanize("getting_started"), "Getting Started");
        assert_eq!(humanize("api"), "Api");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_new_section_from_dir_name() {
        let section = DocSection::new("02-web-development");
        assert_eq!(section.slug, "web-development");
        assert_eq!(section.title, "Web Development");
        assert_eq!(section.dir_name, "02-web-development");
        assert!(section.is_empty());
    }

    #[test]
    fn test_sort_items_by_order_then_slug() {
        let mut section = DocSection::new("01-intro");
        section.items = vec![doc("c", 2), doc("a", 0), doc("b", 1)];
        section.sort();
        let slugs: Vec<_> = section.items.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_items_same_order_by_slug() {
        let mut section = DocSection::new("01-intro");
        section.items = vec![doc("zeta", 0), doc("alpha", 0), doc("first", -1)];
        section.sort();
        let slugs: Vec<_> = section.items.iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "alpha", "zeta"]);
    }

    #[test]
    fn test_sort_subsections_by_slug() {
        let mut section = DocSection::new("01-intro");
        section.subsections = vec![
            DocSection::new("2-zebra"),
            DocSection::new("1-zebra"),
            DocSection::new("apple"),
        ];
        section.sort();
        let dirs: Vec<_> = section.subsections.iter().map(|s| s.dir_name.as_str()).collect();
        assert_eq!(dirs, vec!["apple", "1-zebra", "2-zebra"]);
    }

    #[test]
    fn test_walk_documents_discovery_order() {
        let mut react = DocSection::new("react");
        react.items = vec![doc("hooks", 0)];
        let mut web = DocSection::new("02-web");
        web.items = vec![doc("overview", 0)];
        web.subsections = vec![react];
        let mut intro = DocSection::new("01-intro");
        intro.items = vec![doc("start", 0)];

        let sections = vec![intro, web];
        let mut visited = Vec::new();
        walk_documents(&sections, |entry| {
            visited.push(format!("{}/{}", entry.section_path, entry.document.slug));
        });

        assert_eq!(visited, vec!["intro/start", "web/overview", "web/react/hooks"]);
    }

    #[test]
    fn test_document_count_is_transitive() {
        let mut child = DocSection::new("child");
        child.items = vec![doc("a", 0), doc("b", 0)];
        let mut parent = DocSection::new("01-parent");
        parent.items = vec![doc("c", 0)];
        parent.subsections = vec![child];
        assert_eq!(parent.document_count(), 3);
        assert_eq!(parent.subsection("child").unwrap().item("b").unwrap().slug, "b");
        assert!(parent.item("missing").is_none());
    }
}
