//! Immutable site snapshot.
//!
//! A [`Site`] wraps a built section forest after the publication policy has
//! been applied, together with the build diagnostics and a search index. It
//! is never mutated; rebuilding produces a new snapshot (see
//! [`SiteLoader`](crate::SiteLoader)).

use std::path::{Path, PathBuf};
use std::time::Instant;

use folio_content::{
    ContentError, ContentTree, Diagnostic, DocContent, DocSection, SectionTreeBuilder, TreeConfig,
    walk_documents,
};
use folio_renderer::{CompileError, ContentCompiler, RenderTree, TocEntry, error_panel, render_html};
use serde::Serialize;

use crate::navigation::Navigation;
use crate::search::{SearchHit, SearchIndex};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Error returned by site lookups and page compilation.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No section at this slug path.
    #[error("Section not found: {0}")]
    SectionNotFound(String),
    /// Section exists but has no such document.
    #[error("Document not found: {section}/{slug}")]
    DocumentNotFound { section: String, slug: String },
    /// Content root could not be read.
    #[error(transparent)]
    Content(#[from] ContentError),
    /// Document body failed to compile.
    #[error("Compile error in {path}: {source}")]
    Compile {
        path: String,
        #[source]
        source: CompileError,
    },
}

impl SiteError {
    /// Whether this is one of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SectionNotFound(_)
                | Self::DocumentNotFound { .. }
                | Self::Content(ContentError::NotFound(_))
        )
    }
}

/// Configuration for [`Site`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteConfig {
    /// Section tree options.
    pub tree: TreeConfig,
    /// Keep documents with `published: false`.
    pub include_unpublished: bool,
    /// Cap on search results (`None` = no cap).
    pub max_results: Option<usize>,
}

/// Addressable `(section path, document slug)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Slash-joined section slug path.
    pub section: String,
    pub slug: String,
}

impl Route {
    /// URL path (`/web-development/react/hooks`).
    pub fn path(&self) -> String {
        format!("/{}/{}", self.section, self.slug)
    }
}

/// A compiled document.
#[derive(Clone, Debug)]
pub struct CompiledPage {
    pub route: Route,
    pub title: String,
    pub description: Option<String>,
    pub reading_time: usize,
    pub word_count: usize,
    pub tree: RenderTree,
}

/// A document rendered to an HTML fragment.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    pub route: Route,
    pub title: String,
    /// Page HTML, or an error panel when compilation failed.
    pub html: String,
    pub toc: Vec<TocEntry>,
    /// Set when `html` is an error panel.
    pub error: Option<CompileError>,
}

/// Immutable snapshot of the documentation site.
#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    sections: Vec<DocSection>,
    diagnostics: Vec<Diagnostic>,
    index: SearchIndex,
    max_results: Option<usize>,
}

impl Site {
    /// Build a snapshot from a content root directory.
    ///
    /// Per-file failures become diagnostics; only an unusable root fails.
    pub fn build(root: impl Into<PathBuf>, config: &SiteConfig) -> Result<Self, SiteError> {
        let start = Instant::now();
        let root = root.into();
        let tree = SectionTreeBuilder::new(root.clone())
            .with_config(config.tree.clone())
            .build()?;
        let site = Self::from_tree(root, tree, config);
        tracing::info!(
            root = %site.root.display(),
            document_count = site.document_count(),
            diagnostic_count = site.diagnostics.len(),
            elapsed_ms = elapsed_ms(start),
            "Site built"
        );
        Ok(site)
    }

    /// Wrap an already-built tree, applying the publication policy.
    pub fn from_tree(root: impl Into<PathBuf>, tree: ContentTree, config: &SiteConfig) -> Self {
        let ContentTree {
            mut sections,
            diagnostics,
        } = tree;
        if !config.include_unpublished {
            let hidden = drop_unpublished(&mut sections, config.tree.keep_empty_sections);
            if hidden > 0 {
                tracing::debug!(hidden, "Unpublished documents hidden");
            }
        }
        let index = SearchIndex::build(&sections);
        Self {
            root: root.into(),
            sections,
            diagnostics,
            index,
            max_results: config.max_results,
        }
    }

    /// Content root this snapshot was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Top-level sections.
    pub fn sections(&self) -> &[DocSection] {
        &self.sections
    }

    /// Number of documents in the snapshot.
    pub fn document_count(&self) -> usize {
        self.sections.iter().map(DocSection::document_count).sum()
    }

    /// Diagnostics recorded while building the tree.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Section at a slash-joined slug path (`web-development/react`).
    pub fn section(&self, path: &str) -> Result<&DocSection, SiteError> {
        let not_found = || SiteError::SectionNotFound(path.to_owned());
        let mut slugs = path.split('/').filter(|s| !s.is_empty());
        let first = slugs.next().ok_or_else(not_found)?;
        let mut section = self
            .sections
            .iter()
            .find(|s| s.slug == first)
            .ok_or_else(not_found)?;
        for slug in slugs {
            section = section.subsection(slug).ok_or_else(not_found)?;
        }
        Ok(section)
    }

    /// Document by section path and slug.
    pub fn document(&self, section_path: &str, slug: &str) -> Result<&DocContent, SiteError> {
        self.section(section_path)?
            .item(slug)
            .ok_or_else(|| SiteError::DocumentNotFound {
                section: section_path.to_owned(),
                slug: slug.to_owned(),
            })
    }

    /// Compile a document body into a render tree.
    ///
    /// `.mdx` sources are compiled with MDX handling, `.md` sources without.
    /// Relative document links are resolved against the section path.
    pub fn compile(&self, section_path: &str, slug: &str) -> Result<CompiledPage, SiteError> {
        let start = Instant::now();
        let doc = self.document(section_path, slug)?;
        let route = route(section_path, slug);
        let tree = ContentCompiler::new()
            .with_base_path(route.section.clone())
            .with_mdx(is_mdx(&doc.source_path))
            .compile(&doc.content)
            .map_err(|source| SiteError::Compile {
                path: route.path(),
                source,
            })?;
        tracing::debug!(
            path = %route.path(),
            block_count = tree.blocks.len(),
            elapsed_ms = elapsed_ms(start),
            "Page compiled"
        );
        Ok(CompiledPage {
            title: doc.title().to_owned(),
            description: doc.description().map(str::to_owned),
            reading_time: doc.reading_time,
            word_count: doc.word_count,
            route,
            tree,
        })
    }

    /// Render a document to HTML.
    ///
    /// A compile error does not fail: the page HTML becomes an error panel
    /// and the error is attached to the result. Not-found lookups still fail.
    pub fn render(&self, section_path: &str, slug: &str) -> Result<RenderedPage, SiteError> {
        match self.compile(section_path, slug) {
            Ok(page) => Ok(RenderedPage {
                html: render_html(&page.tree),
                toc: page.tree.toc,
                route: page.route,
                title: page.title,
                error: None,
            }),
            Err(SiteError::Compile { path, source }) => {
                tracing::warn!(path = %path, error = %source, "Page failed to compile");
                let doc = self.document(section_path, slug)?;
                Ok(RenderedPage {
                    route: route(section_path, slug),
                    title: doc.title().to_owned(),
                    html: error_panel(&source),
                    toc: Vec::new(),
                    error: Some(source),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Every route in discovery order.
    pub fn routes(&self) -> Vec<Route> {
        let mut routes = Vec::new();
        walk_documents(&self.sections, |entry| {
            routes.push(Route {
                section: entry.section_path.to_owned(),
                slug: entry.document.slug.clone(),
            });
        });
        routes
    }

    /// Sidebar navigation for the whole site.
    pub fn navigation(&self) -> Navigation {
        Navigation::build(&self.sections)
    }

    /// Search titles, descriptions and bodies, capped by `max_results`.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.index.search(query, self.max_results)
    }

    /// Search with an explicit cap instead of the configured one.
    pub fn search_with_limit(&self, query: &str, limit: Option<usize>) -> Vec<SearchHit> {
        self.index.search(query, limit)
    }
}

fn route(section_path: &str, slug: &str) -> Route {
    Route {
        section: section_path.trim_matches('/').to_owned(),
        slug: slug.to_owned(),
    }
}

fn is_mdx(source_path: &Path) -> bool {
    source_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mdx"))
}

/// Remove unpublished documents, returning how many were removed.
///
/// Sections left without documents are removed too unless `keep_empty`.
fn drop_unpublished(sections: &mut Vec<DocSection>, keep_empty: bool) -> usize {
    let mut hidden = 0;
    for section in sections.iter_mut() {
        let before = section.items.len();
        section.items.retain(|doc| doc.front_matter.published);
        hidden += before - section.items.len();
        hidden += drop_unpublished(&mut section.subsections, keep_empty);
    }
    if !keep_empty {
        sections.retain(|section| section.document_count() > 0);
    }
    hidden
}
