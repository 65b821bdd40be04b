//! Format-independent render tree.

use crate::backend::AlertKind;
use crate::language::Language;

/// Compiled document body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderTree {
    /// Top-level blocks in source order.
    pub blocks: Vec<Block>,
    /// One entry per heading, in source order.
    pub toc: Vec<TocEntry>,
}

impl RenderTree {
    /// Whether the body produced no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Anchors of all headings, in source order.
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.toc.iter().map(|entry| entry.id.as_str())
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Block-level node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Inline content without a paragraph wrapper (tight list items).
    Plain(Vec<Inline>),
    Heading {
        level: u8,
        anchor: String,
        content: Vec<Inline>,
    },
    CodeBlock(CodeBlock),
    BlockQuote(Vec<Block>),
    /// GitHub-style alert (`> [!NOTE]`).
    Alert {
        kind: AlertKind,
        children: Vec<Block>,
    },
    List {
        /// Start number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Table(Table),
    DefinitionList(Vec<Definition>),
    Rule,
    /// Raw HTML or JSX block, passed through.
    Html(String),
    /// Top-level MDX `import`/`export` statement. Never rendered.
    Esm(String),
}

/// Fenced or indented code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    /// Resolved language, `None` for unknown or undetectable code.
    pub language: Option<Language>,
    /// First word of the fence info string, lowercased.
    pub declared: Option<String>,
    /// Whether `language` was guessed from the content.
    pub detected: bool,
    /// Code text.
    pub code: String,
}

/// List item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    /// Task list state: `Some(checked)` for `- [ ]`/`- [x]` items.
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

/// Table column alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnAlign {
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for ColumnAlign {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Self::None,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// GFM table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub alignments: Vec<ColumnAlign>,
    /// Header cells.
    pub head: Vec<Vec<Inline>>,
    /// Body rows of cells.
    pub rows: Vec<Vec<Vec<Inline>>>,
}

/// Definition list entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Definition {
    Term(Vec<Inline>),
    Details(Vec<Block>),
}

/// Inline node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    Link {
        url: String,
        title: String,
        content: Vec<Inline>,
    },
    Image {
        url: String,
        title: String,
        alt: Vec<Inline>,
    },
    SoftBreak,
    HardBreak,
    /// Inline HTML or JSX tag, passed through.
    Html(String),
}

/// Plain text of inline content (markup and HTML dropped, breaks as spaces).
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    push_text(inlines, &mut text);
    text
}

fn push_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(s) | Inline::Code(s) => out.push_str(s),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Superscript(children)
            | Inline::Subscript(children)
            | Inline::Link {
                content: children, ..
            }
            | Inline::Image { alt: children, .. } => push_text(children, out),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html(_) => {}
        }
    }
}
