//! Content discovery and section trees for Folio.
//!
//! This crate turns a directory of markdown files into an ordered forest of
//! [`DocSection`] nodes:
//!
//! - [`parse_front_matter`] splits a file into its YAML metadata block and body
//! - [`DocumentLoader`] reads one file into a [`DocContent`] record
//! - [`SectionTreeBuilder`] walks the content root and assembles a [`ContentTree`]
//!
//! # Layout
//!
//! Top-level sections are directories named `NN-<slug>` (two digits and a dash).
//! Inside a section, every `.md`/`.mdx` file is a document and every child
//! directory is a subsection:
//!
//! ```text
//! content/
//! ├── 01-intro/
//! │   ├── meta.yaml        # optional: title, description
//! │   ├── overview.md
//! │   └── advanced.md
//! └── 02-web-development/
//!     └── react/
//!         └── hooks.mdx
//! ```
//!
//! Files that fail to load never abort the build. They are left out of the
//! tree and reported in [`ContentTree::diagnostics`].
//!
//! # Example
//!
//! ```no_run
//! use folio_content::SectionTreeBuilder;
//!
//! let tree = SectionTreeBuilder::new("content").build()?;
//! for section in &tree.sections {
//!     println!("{} ({} documents)", section.title, section.document_count());
//! }
//! for diagnostic in &tree.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), folio_content::ContentError>(())
//! ```

mod diagnostic;
mod document;
mod error;
mod frontmatter;
mod meta;
mod scanner;
mod section;
mod tree;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use document::{
    DocContent, DocumentLoader, WORDS_PER_MINUTE, document_slug, is_markdown_file, reading_time,
    word_count,
};
pub use error::ContentError;
pub use frontmatter::{DocFrontMatter, FrontMatterError, ParsedFile, parse_front_matter};
pub use section::{
    DocSection, DocumentEntry, humanize, is_section_dir_name, strip_order_prefix, walk_documents,
};
pub use tree::{ContentTree, SectionTreeBuilder, TreeConfig};

pub use serde_yaml::{Mapping, Value};
