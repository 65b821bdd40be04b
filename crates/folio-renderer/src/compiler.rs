//! Markdown/MDX to render tree compilation.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::anchor::AnchorSet;
use crate::backend::AlertKind;
use crate::error::CompileError;
use crate::language::{Language, detect};
use crate::link::resolve_link;
use crate::mdx::{check_components, is_esm};
use crate::tree::{
    Block, CodeBlock, ColumnAlign, Definition, Inline, ListItem, RenderTree, Table, TocEntry,
    inline_text,
};
use crate::util::heading_level_to_num;

/// Compiles document bodies into [`RenderTree`]s.
///
/// Compilation is pure: it reads nothing but the source string.
///
/// # Example
///
/// ```
/// use folio_renderer::{Block, ContentCompiler};
///
/// let tree = ContentCompiler::new()
///     .with_base_path("web-development")
///     .compile("## Setup\n\nSee [hooks](react/hooks.mdx).")
///     .unwrap();
/// assert_eq!(tree.toc[0].id, "setup");
/// assert!(matches!(tree.blocks[0], Block::Heading { level: 2, .. }));
/// ```
#[derive(Clone, Debug)]
pub struct ContentCompiler {
    base_path: Option<String>,
    mdx: bool,
}

impl ContentCompiler {
    /// Create a compiler with MDX handling enabled and no link rewriting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_path: None,
            mdx: true,
        }
    }

    /// Rewrite relative `.md`/`.mdx` links against this section path.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Enable or disable MDX handling (component tag checks and ESM nodes).
    #[must_use]
    pub fn with_mdx(mut self, enabled: bool) -> Self {
        self.mdx = enabled;
        self
    }

    /// Parser options: GFM tables, strikethrough, task lists, alerts and
    /// definition lists.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
            | Options::ENABLE_DEFINITION_LIST
    }

    /// Compile a document body.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] for an unclosed or mismatched component tag
    /// (MDX mode) or a body whose structure cannot be assembled into a tree.
    pub fn compile(&self, source: &str) -> Result<RenderTree, CompileError> {
        let events: Vec<(Event<'_>, Range<usize>)> =
            Parser::new_ext(source, Self::parser_options())
                .into_offset_iter()
                .collect();

        if self.mdx {
            check_components(source, &code_ranges(&events))?;
        }

        let mut builder = TreeBuilder::new(source, self.base_path.as_deref(), self.mdx);
        for (event, range) in events {
            builder.event(event, range)?;
        }
        builder.finish()
    }
}

impl Default for ContentCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte ranges of code blocks and code spans.
fn code_ranges(events: &[(Event<'_>, Range<usize>)]) -> Vec<Range<usize>> {
    events
        .iter()
        .filter(|(event, _)| {
            matches!(event, Event::Start(Tag::CodeBlock(_)) | Event::Code(_))
        })
        .map(|(_, range)| range.clone())
        .collect()
}

/// First word of a fence info string, lowercased (`rust,ignore` → `rust`).
fn declared_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
            .next()
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase),
        CodeBlockKind::Indented => None,
    }
}

fn code_block(declared: Option<String>, code: String) -> CodeBlock {
    match declared {
        Some(name) => CodeBlock {
            language: Language::from_name(&name),
            declared: Some(name),
            detected: false,
            code,
        },
        None => {
            let language = detect(&code);
            CodeBlock {
                language,
                declared: None,
                detected: language.is_some(),
                code,
            }
        }
    }
}

/// Append an inline, merging adjacent text runs.
fn push_merged(inlines: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(last)), Inline::Text(text)) = (inlines.last_mut(), &inline) {
        last.push_str(text);
        return;
    }
    inlines.push(inline);
}

/// Move loose inline content into a `Plain` block.
fn flush_pending(blocks: &mut Vec<Block>, pending: &mut Vec<Inline>) {
    if !pending.is_empty() {
        blocks.push(Block::Plain(std::mem::take(pending)));
    }
}

enum BlockKind {
    Root,
    BlockQuote(Option<AlertKind>),
    Item(Option<bool>),
    Definition,
    Footnote,
}

enum InlineKind {
    Paragraph,
    Heading(u8),
    Cell,
    Term,
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
    Link { url: String, title: String },
    Image { url: String, title: String },
}

/// Open container while the event stream is folded into a tree.
enum Frame {
    Blocks {
        kind: BlockKind,
        blocks: Vec<Block>,
        pending: Vec<Inline>,
    },
    Inlines {
        kind: InlineKind,
        inlines: Vec<Inline>,
    },
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Table(Table),
    Row {
        head: bool,
        cells: Vec<Vec<Inline>>,
    },
    DefinitionList(Vec<Definition>),
    Code {
        declared: Option<String>,
        code: String,
    },
    HtmlBlock(String),
    Skip,
}

impl Frame {
    fn blocks(kind: BlockKind) -> Self {
        Self::Blocks {
            kind,
            blocks: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn inlines(kind: InlineKind) -> Self {
        Self::Inlines {
            kind,
            inlines: Vec::new(),
        }
    }

    /// Whether `end` closes this frame.
    fn closes(&self, end: &TagEnd) -> bool {
        use InlineKind as I;

        match self {
            Self::Inlines { kind, .. } => matches!(
                (kind, end),
                (I::Paragraph, TagEnd::Paragraph)
                    | (I::Heading(_), TagEnd::Heading(_))
                    | (I::Cell, TagEnd::TableCell)
                    | (I::Term, TagEnd::DefinitionListTitle)
                    | (I::Emphasis, TagEnd::Emphasis)
                    | (I::Strong, TagEnd::Strong)
                    | (I::Strikethrough, TagEnd::Strikethrough)
                    | (I::Superscript, TagEnd::Superscript)
                    | (I::Subscript, TagEnd::Subscript)
                    | (I::Link { .. }, TagEnd::Link)
                    | (I::Image { .. }, TagEnd::Image)
            ),
            Self::Blocks { kind, .. } => matches!(
                (kind, end),
                (BlockKind::BlockQuote(_), TagEnd::BlockQuote(_))
                    | (BlockKind::Item(_), TagEnd::Item)
                    | (BlockKind::Definition, TagEnd::DefinitionListDefinition)
                    | (BlockKind::Footnote, TagEnd::FootnoteDefinition)
            ),
            Self::List { .. } => matches!(end, TagEnd::List(_)),
            Self::Table(_) => matches!(end, TagEnd::Table),
            Self::Row { head: true, .. } => matches!(end, TagEnd::TableHead),
            Self::Row { head: false, .. } => matches!(end, TagEnd::TableRow),
            Self::DefinitionList(_) => matches!(end, TagEnd::DefinitionList),
            Self::Code { .. } => matches!(end, TagEnd::CodeBlock),
            Self::HtmlBlock(_) => matches!(end, TagEnd::HtmlBlock),
            Self::Skip => matches!(end, TagEnd::MetadataBlock(_)),
        }
    }
}

/// Folds parser events into a [`RenderTree`] with a stack of open frames.
struct TreeBuilder<'a> {
    source: &'a str,
    base_path: Option<&'a str>,
    mdx: bool,
    stack: Vec<Frame>,
    anchors: AnchorSet,
    toc: Vec<TocEntry>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, base_path: Option<&'a str>, mdx: bool) -> Self {
        Self {
            source,
            base_path,
            mdx,
            stack: vec![Frame::blocks(BlockKind::Root)],
            anchors: AnchorSet::new(),
            toc: Vec::new(),
        }
    }

    fn error(&self, offset: usize, message: &str) -> CompileError {
        let rest = self.source.get(offset..).unwrap_or_default();
        let fragment = rest.lines().next().unwrap_or_default();
        CompileError::at(self.source, offset, fragment, message)
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), CompileError> {
        match event {
            Event::Start(tag) => {
                self.start(tag);
                Ok(())
            }
            Event::End(tag) => self.end(&tag, range),
            Event::Text(text) => self.text(text, range.start),
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string()), range.start),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push_inline(Inline::Code(math.into_string()), range.start)
            }
            Event::Html(html) => {
                if let Some(Frame::HtmlBlock(buffer)) = self.stack.last_mut() {
                    buffer.push_str(&html);
                    return Ok(());
                }
                self.push_inline(Inline::Html(html.into_string()), range.start)
            }
            Event::InlineHtml(html) => {
                self.push_inline(Inline::Html(html.into_string()), range.start)
            }
            Event::FootnoteReference(label) => {
                self.push_inline(Inline::Text(format!("[^{label}]")), range.start)
            }
            Event::SoftBreak => self.push_inline(Inline::SoftBreak, range.start),
            Event::HardBreak => self.push_inline(Inline::HardBreak, range.start),
            Event::Rule => self.push_block(Block::Rule, range.start),
            Event::TaskListMarker(checked) => {
                self.mark_task(checked);
                Ok(())
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::inlines(InlineKind::Paragraph),
            Tag::Heading { level, .. } => {
                Frame::inlines(InlineKind::Heading(heading_level_to_num(level)))
            }
            Tag::BlockQuote(kind) => Frame::blocks(BlockKind::BlockQuote(kind.map(AlertKind::from))),
            Tag::CodeBlock(kind) => Frame::Code {
                declared: declared_language(&kind),
                code: String::new(),
            },
            Tag::HtmlBlock => Frame::HtmlBlock(String::new()),
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::blocks(BlockKind::Item(None)),
            Tag::FootnoteDefinition(_) => Frame::blocks(BlockKind::Footnote),
            Tag::DefinitionList => Frame::DefinitionList(Vec::new()),
            Tag::DefinitionListTitle => Frame::inlines(InlineKind::Term),
            Tag::DefinitionListDefinition => Frame::blocks(BlockKind::Definition),
            Tag::Table(alignments) => Frame::Table(Table {
                alignments: alignments.into_iter().map(ColumnAlign::from).collect(),
                ..Table::default()
            }),
            Tag::TableHead => Frame::Row {
                head: true,
                cells: Vec::new(),
            },
            Tag::TableRow => Frame::Row {
                head: false,
                cells: Vec::new(),
            },
            Tag::TableCell => Frame::inlines(InlineKind::Cell),
            Tag::Emphasis => Frame::inlines(InlineKind::Emphasis),
            Tag::Strong => Frame::inlines(InlineKind::Strong),
            Tag::Strikethrough => Frame::inlines(InlineKind::Strikethrough),
            Tag::Superscript => Frame::inlines(InlineKind::Superscript),
            Tag::Subscript => Frame::inlines(InlineKind::Subscript),
            Tag::Link {
                dest_url, title, ..
            } => Frame::inlines(InlineKind::Link {
                url: self.resolve(&dest_url),
                title: title.into_string(),
            }),
            Tag::Image {
                dest_url, title, ..
            } => Frame::inlines(InlineKind::Image {
                url: dest_url.into_string(),
                title: title.into_string(),
            }),
            Tag::MetadataBlock(_) => Frame::Skip,
        };
        self.stack.push(frame);
    }

    fn resolve(&self, url: &CowStr<'_>) -> String {
        match self.base_path {
            Some(base) => resolve_link(url, base),
            None => url.to_string(),
        }
    }

    fn end(&mut self, tag: &TagEnd, range: Range<usize>) -> Result<(), CompileError> {
        if self.stack.len() <= 1 {
            return Err(self.error(range.start, "unexpected end of element"));
        }
        let Some(frame) = self.stack.pop() else {
            return Err(self.error(range.start, "unexpected end of element"));
        };
        if !frame.closes(tag) {
            return Err(self.error(range.start, "mismatched element structure"));
        }

        match frame {
            Frame::Inlines { kind, inlines } => self.finish_inlines(kind, inlines, range),
            Frame::Blocks {
                kind,
                mut blocks,
                mut pending,
            } => {
                flush_pending(&mut blocks, &mut pending);
                self.finish_blocks(kind, blocks, range.start)
            }
            Frame::List { start, items } => self.push_block(Block::List { start, items }, range.start),
            Frame::Table(table) => self.push_block(Block::Table(table), range.start),
            Frame::Row { head, cells } => {
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    if head {
                        table.head = cells;
                    } else {
                        table.rows.push(cells);
                    }
                    return Ok(());
                }
                Err(self.error(range.start, "table row outside table"))
            }
            Frame::DefinitionList(entries) => {
                self.push_block(Block::DefinitionList(entries), range.start)
            }
            Frame::Code { declared, code } => {
                self.push_block(Block::CodeBlock(code_block(declared, code)), range.start)
            }
            Frame::HtmlBlock(html) => self.push_block(Block::Html(html), range.start),
            Frame::Skip => Ok(()),
        }
    }

    fn finish_inlines(
        &mut self,
        kind: InlineKind,
        inlines: Vec<Inline>,
        range: Range<usize>,
    ) -> Result<(), CompileError> {
        let offset = range.start;
        match kind {
            InlineKind::Paragraph => {
                let raw = self.source.get(range).unwrap_or_default().trim_end();
                if self.mdx && self.stack.len() == 1 && is_esm(raw) {
                    self.push_block(Block::Esm(raw.to_owned()), offset)
                } else {
                    self.push_block(Block::Paragraph(inlines), offset)
                }
            }
            InlineKind::Heading(level) => {
                let text = inline_text(&inlines);
                let title = text.trim();
                let anchor = self.anchors.assign(title);
                self.toc.push(TocEntry {
                    level,
                    title: title.to_owned(),
                    id: anchor.clone(),
                });
                self.push_block(
                    Block::Heading {
                        level,
                        anchor,
                        content: inlines,
                    },
                    offset,
                )
            }
            InlineKind::Cell => {
                if let Some(Frame::Row { cells, .. }) = self.stack.last_mut() {
                    cells.push(inlines);
                    return Ok(());
                }
                Err(self.error(offset, "table cell outside row"))
            }
            InlineKind::Term => {
                if let Some(Frame::DefinitionList(entries)) = self.stack.last_mut() {
                    entries.push(Definition::Term(inlines));
                    return Ok(());
                }
                Err(self.error(offset, "definition term outside list"))
            }
            InlineKind::Emphasis => self.push_inline(Inline::Emphasis(inlines), offset),
            InlineKind::Strong => self.push_inline(Inline::Strong(inlines), offset),
            InlineKind::Strikethrough => self.push_inline(Inline::Strikethrough(inlines), offset),
            InlineKind::Superscript => self.push_inline(Inline::Superscript(inlines), offset),
            InlineKind::Subscript => self.push_inline(Inline::Subscript(inlines), offset),
            InlineKind::Link { url, title } => self.push_inline(
                Inline::Link {
                    url,
                    title,
                    content: inlines,
                },
                offset,
            ),
            InlineKind::Image { url, title } => self.push_inline(
                Inline::Image {
                    url,
                    title,
                    alt: inlines,
                },
                offset,
            ),
        }
    }

    fn finish_blocks(
        &mut self,
        kind: BlockKind,
        blocks: Vec<Block>,
        offset: usize,
    ) -> Result<(), CompileError> {
        match kind {
            BlockKind::Root => Err(self.error(offset, "unexpected end of document")),
            BlockKind::BlockQuote(None) => self.push_block(Block::BlockQuote(blocks), offset),
            BlockKind::BlockQuote(Some(kind)) => self.push_block(
                Block::Alert {
                    kind,
                    children: blocks,
                },
                offset,
            ),
            BlockKind::Item(task) => {
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem { task, blocks });
                    return Ok(());
                }
                Err(self.error(offset, "list item outside list"))
            }
            BlockKind::Definition => {
                if let Some(Frame::DefinitionList(entries)) = self.stack.last_mut() {
                    entries.push(Definition::Details(blocks));
                    return Ok(());
                }
                Err(self.error(offset, "definition outside list"))
            }
            BlockKind::Footnote => {
                for block in blocks {
                    self.push_block(block, offset)?;
                }
                Ok(())
            }
        }
    }

    fn text(&mut self, text: CowStr<'_>, offset: usize) -> Result<(), CompileError> {
        match self.stack.last_mut() {
            Some(Frame::Code { code, .. }) => {
                code.push_str(&text);
                return Ok(());
            }
            Some(Frame::HtmlBlock(html)) => {
                html.push_str(&text);
                return Ok(());
            }
            Some(Frame::Skip) => return Ok(()),
            _ => {}
        }
        self.push_inline(Inline::Text(text.into_string()), offset)
    }

    fn push_inline(&mut self, inline: Inline, offset: usize) -> Result<(), CompileError> {
        match self.stack.last_mut() {
            Some(Frame::Inlines { inlines, .. }) => {
                push_merged(inlines, inline);
                return Ok(());
            }
            Some(Frame::Blocks { pending, .. }) => {
                push_merged(pending, inline);
                return Ok(());
            }
            _ => {}
        }
        Err(self.error(offset, "inline content outside a block"))
    }

    fn push_block(&mut self, block: Block, offset: usize) -> Result<(), CompileError> {
        if let Some(Frame::Blocks {
            blocks, pending, ..
        }) = self.stack.last_mut()
        {
            flush_pending(blocks, pending);
            blocks.push(block);
            return Ok(());
        }
        Err(self.error(offset, "block element in inline context"))
    }

    fn mark_task(&mut self, checked: bool) {
        let item = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|frame| match frame {
                Frame::Blocks {
                    kind: BlockKind::Item(task),
                    ..
                } => Some(task),
                _ => None,
            });
        if let Some(task) = item {
            *task = Some(checked);
        }
    }

    fn finish(mut self) -> Result<RenderTree, CompileError> {
        if self.stack.len() != 1 {
            return Err(self.error(self.source.len(), "unterminated element"));
        }
        match self.stack.pop() {
            Some(Frame::Blocks {
                kind: BlockKind::Root,
                mut blocks,
                mut pending,
            }) => {
                flush_pending(&mut blocks, &mut pending);
                Ok(RenderTree {
                    blocks,
                    toc: self.toc,
                })
            }
            _ => Err(self.error(self.source.len(), "unterminated element")),
        }
    }
}
