//! Markdown/MDX compilation with pluggable render backends.
//!
//! Compilation and rendering are separate steps:
//!
//! - [`ContentCompiler`] parses a document body into a format-independent
//!   [`RenderTree`]: blocks, inline markup, code languages, heading anchors
//!   and a table of contents. MDX component tags are checked for balance and
//!   top-level `import`/`export` statements become [`Block::Esm`] nodes.
//! - [`MarkdownRenderer`] walks a tree and produces markup, delegating
//!   format-specific elements to a [`RenderBackend`] such as [`HtmlBackend`].
//!
//! # Example
//!
//! ```
//! use folio_renderer::{ContentCompiler, render_html};
//!
//! let tree = ContentCompiler::new().compile("# Hello\n\n**Bold** text")?;
//! assert_eq!(
//!     render_html(&tree),
//!     r#"<h1 id="hello">Hello</h1><p><strong>Bold</strong> text</p>"#
//! );
//! # Ok::<(), folio_renderer::CompileError>(())
//! ```

mod anchor;
mod backend;
mod compiler;
mod error;
mod html;
mod language;
mod link;
mod mdx;
mod renderer;
mod tree;
mod util;

pub use anchor::{AnchorSet, slugify};
pub use backend::{AlertKind, RenderBackend};
pub use compiler::ContentCompiler;
pub use error::CompileError;
pub use html::{HtmlBackend, error_panel};
pub use language::{Language, detect};
pub use renderer::MarkdownRenderer;
pub use tree::{
    Block, CodeBlock, ColumnAlign, Definition, Inline, ListItem, RenderTree, Table, TocEntry,
    inline_text,
};
pub use util::escape_html;

/// Render a tree to HTML with [`HtmlBackend`].
#[must_use]
pub fn render_html(tree: &RenderTree) -> String {
    MarkdownRenderer::<HtmlBackend>::new().render(tree)
}
