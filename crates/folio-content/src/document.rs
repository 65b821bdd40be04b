//! Loading single documents from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ContentError;
use crate::frontmatter::{DocFrontMatter, parse_front_matter};

/// Reading speed used for [`reading_time`].
pub const WORDS_PER_MINUTE: usize = 200;

/// Recognized document extensions (compared case-insensitively).
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// A loaded document. Immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocContent {
    /// File name without extension; unique among siblings.
    pub slug: String,
    /// Typed front matter.
    pub front_matter: DocFrontMatter,
    /// Markdown/MDX body with the front matter block removed.
    pub content: String,
    /// Estimated reading time in minutes, at least 1.
    pub reading_time: usize,
    /// Whitespace-delimited tokens in the body.
    pub word_count: usize,
    /// Path relative to the content root.
    pub source_path: PathBuf,
}

impl DocContent {
    /// Build a document from raw file text.
    ///
    /// `source_path` is only recorded for diagnostics and link resolution;
    /// nothing is read from it.
    pub fn from_source(
        slug: impl Into<String>,
        source_path: impl Into<PathBuf>,
        text: &str,
    ) -> Result<Self, ContentError> {
        let slug = slug.into();
        let source_path = source_path.into();
        if slug.is_empty() {
            return Err(ContentError::invalid(source_path, "empty document slug"));
        }

        let parsed = parse_front_matter(text)
            .map_err(|e| ContentError::invalid(&source_path, e.to_string()))?;
        let front_matter = DocFrontMatter::from_metadata(&parsed.metadata, &slug)
            .map_err(|e| ContentError::invalid(&source_path, e.to_string()))?;
        let word_count = word_count(parsed.body);

        Ok(Self {
            slug,
            front_matter,
            content: parsed.body.to_owned(),
            reading_time: reading_time(word_count),
            word_count,
            source_path,
        })
    }

    /// Document title (never empty).
    pub fn title(&self) -> &str {
        &self.front_matter.title
    }

    /// Optional description from front matter.
    pub fn description(&self) -> Option<&str> {
        self.front_matter.description.as_deref()
    }
}

/// Reads markdown files beneath a content root.
#[derive(Clone, Debug)]
pub struct DocumentLoader {
    root: PathBuf,
}

impl DocumentLoader {
    /// Create a loader for the given content root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root this loader resolves relative paths against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load one document.
    ///
    /// Relative paths are resolved against the content root. The recorded
    /// `source_path` is relative to the root when the file lives beneath it.
    ///
    /// # Errors
    ///
    /// - [`ContentError::NotFound`] if the file does not exist
    /// - [`ContentError::InvalidDocument`] for a non-markdown path, an empty
    ///   slug, content that is not UTF-8, or unusable front matter
    /// - [`ContentError::Io`] for other read failures
    pub fn load(&self, path: &Path) -> Result<DocContent, ContentError> {
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        if !is_markdown_file(&full_path) {
            return Err(ContentError::invalid(&full_path, "not a markdown file"));
        }
        let slug = document_slug(&full_path)
            .ok_or_else(|| ContentError::invalid(&full_path, "empty document slug"))?;

        let text =
            fs::read_to_string(&full_path).map_err(|e| ContentError::from_io(e, &full_path))?;

        let source_path = full_path
            .strip_prefix(&self.root)
            .map_or_else(|_| full_path.clone(), Path::to_path_buf);

        let doc = DocContent::from_source(slug, source_path, &text).map_err(|e| match e {
            // Report the on-disk path rather than the relative one.
            ContentError::InvalidDocument { reason, .. } => {
                ContentError::invalid(&full_path, reason)
            }
            other => other,
        })?;

        tracing::debug!(
            path = %full_path.display(),
            slug = %doc.slug,
            words = doc.word_count,
            "Loaded document"
        );
        Ok(doc)
    }
}

/// Whether the path has a markdown extension (`.md` or `.mdx`, any case).
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Slug for a document file: its name without the extension.
///
/// Returns `None` when the result would be empty (e.g. a file named `.md`).
pub fn document_slug(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    };
    (!stem.is_empty()).then(|| stem.to_owned())
}

/// Number of whitespace-delimited tokens.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Reading time in whole minutes, rounded up and never below 1.
pub fn reading_time(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}
