//! Section tree construction.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::document::DocumentLoader;
use crate::error::ContentError;
use crate::meta::parse_section_meta;
use crate::scanner::Scanner;
use crate::section::{DocSection, is_section_dir_name, sort_sections, walk_documents};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Tree building options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Section metadata file name looked up in every section directory.
    pub meta_filename: String,
    /// Keep sections with no documents anywhere beneath them.
    pub keep_empty_sections: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            meta_filename: "meta.yaml".to_owned(),
            keep_empty_sections: false,
        }
    }
}

/// Built section forest plus the files that were left out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContentTree {
    /// Top-level sections sorted by slug.
    pub sections: Vec<DocSection>,
    /// One entry per excluded file or directory.
    pub diagnostics: Vec<Diagnostic>,
}

impl ContentTree {
    /// Total number of documents in the tree.
    pub fn document_count(&self) -> usize {
        self.sections.iter().map(DocSection::document_count).sum()
    }

    /// Every `(section path, document slug)` pair in discovery order.
    pub fn routes(&self) -> Vec<(String, String)> {
        let mut routes = Vec::new();
        walk_documents(&self.sections, |entry| {
            routes.push((entry.section_path.to_owned(), entry.document.slug.clone()));
        });
        routes
    }
}

/// Builds a [`ContentTree`] from a content root directory.
///
/// Only top-level directories named `NN-<slug>` become sections. Below that,
/// every markdown file is a document and every directory a subsection.
pub struct SectionTreeBuilder {
    root: PathBuf,
    config: TreeConfig,
}

impl SectionTreeBuilder {
    /// Create a builder with default options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: TreeConfig::default(),
        }
    }

    /// Replace the tree building options.
    #[must_use]
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the content root and build the tree.
    ///
    /// Files that cannot be loaded are excluded and reported in
    /// [`ContentTree::diagnostics`]; they never fail the build.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] if the root does not exist and
    /// [`ContentError::Io`] if it cannot be listed.
    pub fn build(&self) -> Result<ContentTree, ContentError> {
        let start = Instant::now();
        let mut walk = Walk {
            scanner: Scanner::new(self.config.meta_filename.as_str()),
            loader: DocumentLoader::new(&self.root),
            keep_empty: self.config.keep_empty_sections,
            diagnostics: Vec::new(),
        };

        let listing = walk.scanner.list(&self.root)?;
        let mut sections: Vec<DocSection> = listing
            .directories
            .into_iter()
            .filter(|(name, _)| is_section_dir_name(name))
            .filter_map(|(name, path)| walk.build_section(name, &path))
            .collect();
        walk.dedupe_sections(&mut sections, &self.root);

        let tree = ContentTree {
            sections,
            diagnostics: walk.diagnostics,
        };

        tracing::info!(
            root = %self.root.display(),
            sections = tree.sections.len(),
            documents = tree.document_count(),
            diagnostics = tree.diagnostics.len(),
            elapsed_ms = elapsed_ms(start),
            "Content tree built"
        );
        Ok(tree)
    }
}

/// State of one build pass.
struct Walk {
    scanner: Scanner,
    loader: DocumentLoader,
    keep_empty: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Walk {
    /// Build the section for one directory, or `None` if it is excluded.
    fn build_section(&mut self, dir_name: String, path: &Path) -> Option<DocSection> {
        let listing = match self.scanner.list(path) {
            Ok(listing) => listing,
            Err(e) => {
                self.record(&e);
                return None;
            }
        };

        let mut section = DocSection::new(dir_name);
        if let Some(meta_path) = &listing.meta_path {
            self.apply_meta(&mut section, meta_path);
        }

        let mut seen = HashSet::new();
        for doc_path in &listing.documents {
            match self.loader.load(doc_path) {
                Ok(doc) if seen.contains(&doc.slug) => {
                    self.push(Diagnostic::invalid(
                        doc_path,
                        format!("duplicate document slug '{}'", doc.slug),
                    ));
                }
                Ok(doc) => {
                    seen.insert(doc.slug.clone());
                    section.items.push(doc);
                }
                Err(e) => self.record(&e),
            }
        }

        for (name, child_path) in listing.directories {
            if let Some(child) = self.build_section(name, &child_path) {
                section.subsections.push(child);
            }
        }

        section.sort();
        self.dedupe_sections(&mut section.subsections, path);

        if section.is_empty() && !self.keep_empty {
            tracing::debug!(path = %path.display(), "Dropping empty section");
            return None;
        }
        Some(section)
    }

    fn apply_meta(&mut self, section: &mut DocSection, meta_path: &Path) {
        let meta = fs::read_to_string(meta_path)
            .map_err(|e| ContentError::from_io(e, meta_path))
            .and_then(|content| {
                parse_section_meta(&content).map_err(|e| {
                    ContentError::invalid(meta_path, format!("invalid section metadata: {e}"))
                })
            });
        match meta {
            Ok(meta) => {
                if let Some(title) = meta.title {
                    section.title = title;
                }
                section.description = meta.description;
            }
            Err(e) => self.record(&e),
        }
    }

    /// Sort sibling sections and drop later ones whose slug is already taken.
    fn dedupe_sections(&mut self, sections: &mut Vec<DocSection>, parent: &Path) {
        sort_sections(sections);
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        sections.retain(|s| {
            let first = seen.insert(s.slug.clone());
            if !first {
                duplicates.push(Diagnostic::invalid(
                    parent.join(&s.dir_name),
                    format!("duplicate section slug '{}'", s.slug),
                ));
            }
            first
        });
        for diagnostic in duplicates {
            self.push(diagnostic);
        }
    }

    fn record(&mut self, err: &ContentError) {
        self.push(Diagnostic::from(err));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            path = %diagnostic.path.display(),
            error = %diagnostic.message,
            "Skipping content"
        );
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diagnostic::DiagnosticKind;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn slugs(section: &DocSection) -> Vec<&str> {
        section.items.iter().map(|d| d.slug.as_str()).collect()
    }

    #[test]
    fn test_build_intro_scenario() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-intro/overview.md", "---\ntitle: Intro\norder: 0\n---\nWelcome");
        write(temp_dir.path(), "01-intro/advanced.md", "---\norder: 1\n---\nDeep dive");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(tree.sections.len(), 1);
        let intro = &tree.sections[0];
        assert_eq!(intro.slug, "intro");
        assert_eq!(intro.title, "Intro");
        assert_eq!(slugs(intro), vec!["overview", "advanced"]);
        assert_eq!(intro.items[0].title(), "Intro");
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_build_sorts_items_by_order_then_slug() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-s/c.md", "---\norder: 2\n---\n");
        write(temp_dir.path(), "01-s/a.md", "---\norder: 0\n---\n");
        write(temp_dir.path(), "01-s/b.md", "---\norder: 1\n---\n");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(slugs(&tree.sections[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_build_sorts_sections_by_slug() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-zeta/doc.md", "z");
        write(temp_dir.path(), "02-alpha/doc.md", "a");
        write(temp_dir.path(), "02-alpha/web/z-last/doc.md", "x");
        write(temp_dir.path(), "02-alpha/web/a-first/doc.md", "x");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        let top: Vec<_> = tree.sections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(top, vec!["alpha", "zeta"]);
        let web = tree.sections[0].subsection("web").unwrap();
        let nested: Vec<_> = web.subsections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(nested, vec!["a-first", "z-last"]);
    }

    #[test]
    fn test_build_ignores_non_section_top_level_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "README.md", "# Readme");
        write(temp_dir.path(), "drafts/idea.md", "idea");
        write(temp_dir.path(), "1-short/doc.md", "x");
        write(temp_dir.path(), "03-real/doc.md", "x");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        let top: Vec<_> = tree.sections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(top, vec!["real"]);
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_build_subsections_any_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "02-web-development/react/hooks.mdx", "Hooks");
        write(temp_dir.path(), "02-web-development/01-basics/html.md", "HTML");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        let web = &tree.sections[0];
        assert_eq!(web.slug, "web-development");
        assert!(web.items.is_empty());
        let subs: Vec<_> = web.subsections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(subs, vec!["basics", "react"]);
        assert_eq!(slugs(web.subsection("react").unwrap()), vec!["hooks"]);
    }

    #[test]
    fn test_build_malformed_file_becomes_diagnostic() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-s/good-one.md", "---\ntitle: One\n---\n");
        write(temp_dir.path(), "01-s/good-two.md", "Two");
        write(temp_dir.path(), "01-s/bad.md", "---\ntags: {not: a list}\n---\n");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(slugs(&tree.sections[0]), vec!["good-one", "good-two"]);
        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::InvalidDocument);
        assert!(tree.diagnostics[0].path.ends_with("bad.md"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-a/x.md", "---\ntags: [b, a]\n---\nbody");
        write(temp_dir.path(), "01-a/sub/y.md", "more body");
        write(temp_dir.path(), "02-b/z.md", "---\nbroken: [\n---\n");

        let builder = SectionTreeBuilder::new(temp_dir.path());
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_build_drops_empty_sections_by_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-full/doc.md", "x");
        write(temp_dir.path(), "01-full/empty-child/notes.txt", "not markdown");
        fs::create_dir_all(temp_dir.path().join("02-empty/deeper/still-empty")).unwrap();

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(tree.sections.len(), 1);
        assert!(tree.sections[0].subsections.is_empty());
    }

    #[test]
    fn test_build_keeps_empty_sections_when_configured() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-full/doc.md", "x");
        fs::create_dir_all(temp_dir.path().join("02-empty/deeper")).unwrap();

        let config = TreeConfig {
            keep_empty_sections: true,
            ..TreeConfig::default()
        };
        let tree = SectionTreeBuilder::new(temp_dir.path())
            .with_config(config)
            .build()
            .unwrap();

        assert_eq!(tree.sections.len(), 2);
        let empty = &tree.sections[0];
        assert_eq!(empty.slug, "empty");
        assert_eq!(empty.document_count(), 0);
        assert!(empty.subsection("deeper").unwrap().is_empty());
    }

    #[test]
    fn test_build_reads_section_meta() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            temp_dir.path(),
            "01-web/meta.yaml",
            "title: Web Platform\ndescription: Browsers and friends",
        );
        write(temp_dir.path(), "01-web/doc.md", "x");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(tree.sections[0].title, "Web Platform");
        assert_eq!(
            tree.sections[0].description.as_deref(),
            Some("Browsers and friends")
        );
    }

    #[test]
    fn test_build_bad_section_meta_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-web-dev/meta.yaml", "title: [oops");
        write(temp_dir.path(), "01-web-dev/doc.md", "x");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(tree.sections[0].title, "Web Dev");
        assert_eq!(tree.diagnostics.len(), 1);
        assert!(tree.diagnostics[0].path.ends_with("meta.yaml"));
    }

    #[test]
    fn test_build_duplicate_document_slug() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-s/page.md", "markdown");
        write(temp_dir.path(), "01-s/page.mdx", "mdx");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(tree.sections[0].items.len(), 1);
        assert_eq!(tree.sections[0].items[0].content, "markdown");
        assert_eq!(tree.diagnostics.len(), 1);
        assert!(tree.diagnostics[0].path.ends_with("page.mdx"));
    }

    #[test]
    fn test_build_duplicate_section_slug() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-guide/a.md", "x");
        write(temp_dir.path(), "02-guide/b.md", "x");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(tree.sections.len(), 1);
        assert_eq!(tree.sections[0].dir_name, "01-guide");
        assert_eq!(tree.diagnostics.len(), 1);
        assert!(tree.diagnostics[0].path.ends_with("02-guide"));
    }

    #[test]
    fn test_build_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = SectionTreeBuilder::new(temp_dir.path().join("missing")).build();
        assert!(matches!(result, Err(ContentError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_unreadable_entries_are_io_diagnostics() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-docs/ok.md", "# Ok");
        write(temp_dir.path(), "01-docs/locked.md", "# Locked");
        write(temp_dir.path(), "01-docs/open/page.md", "# Page");
        write(temp_dir.path(), "01-docs/private/inner.md", "# Inner");
        let locked = temp_dir.path().join("01-docs/locked.md");
        let private = temp_dir.path().join("01-docs/private");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root.
        let privileged = fs::read_to_string(&locked).is_ok();
        let tree = SectionTreeBuilder::new(temp_dir.path()).build();

        fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        if privileged {
            return;
        }

        let tree = tree.unwrap();
        let docs = &tree.sections[0];
        assert_eq!(slugs(docs), vec!["ok"]);
        let subsections: Vec<_> = docs.subsections.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(subsections, vec!["open"]);

        assert_eq!(tree.diagnostics.len(), 2);
        assert!(tree.diagnostics.iter().all(|d| d.kind == DiagnosticKind::Io));
        assert!(tree.diagnostics[0].path.ends_with("locked.md"));
        assert!(tree.diagnostics[1].path.ends_with("private"));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_dangling_link_is_not_found_diagnostic() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-docs/ok.md", "# Ok");
        std::os::unix::fs::symlink(
            temp_dir.path().join("01-docs/gone.md"),
            temp_dir.path().join("01-docs/ghost.md"),
        )
        .unwrap();

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        assert_eq!(slugs(&tree.sections[0]), vec!["ok"]);
        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::NotFound);
        assert!(tree.diagnostics[0].path.ends_with("ghost.md"));
    }

    #[test]
    fn test_routes_in_discovery_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "01-intro/overview.md", "x");
        write(temp_dir.path(), "02-web/index-page.md", "x");
        write(temp_dir.path(), "02-web/react/hooks.md", "x");

        let tree = SectionTreeBuilder::new(temp_dir.path()).build().unwrap();

        let routes = tree.routes();
        let expected = vec![
            ("intro".to_owned(), "overview".to_owned()),
            ("web".to_owned(), "index-page".to_owned()),
            ("web/react".to_owned(), "hooks".to_owned()),
        ];
        assert_eq!(routes, expected);
    }
}
