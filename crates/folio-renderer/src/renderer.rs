//! Generic render tree walker with pluggable backend.

use std::fmt::Write;
use std::marker::PhantomData;

use crate::backend::RenderBackend;
use crate::tree::{Block, ColumnAlign, Definition, Inline, ListItem, RenderTree, Table, inline_text};
use crate::util::escape_html;

/// Renders a [`RenderTree`] to markup.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling common elements (tables, lists, inline formatting) generically.
/// ESM statements are never rendered.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            _backend: PhantomData,
        }
    }

    /// Render a tree, consuming the renderer's buffer.
    pub fn render(&mut self, tree: &RenderTree) -> String {
        self.output.clear();
        for block in &tree.blocks {
            self.block(block);
        }
        std::mem::take(&mut self.output)
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(inlines) => {
                self.output.push_str("<p>");
                self.inlines(inlines);
                self.output.push_str("</p>");
            }
            Block::Plain(inlines) => self.inlines(inlines),
            Block::Heading {
                level,
                anchor,
                content,
            } => {
                write!(self.output, r#"<h{level} id="{}">"#, escape_html(anchor)).unwrap();
                self.inlines(content);
                write!(self.output, "</h{level}>").unwrap();
            }
            Block::CodeBlock(code) => B::code_block(code, &mut self.output),
            Block::BlockQuote(children) => {
                B::blockquote_start(&mut self.output);
                self.blocks(children);
                B::blockquote_end(&mut self.output);
            }
            Block::Alert { kind, children } => {
                B::alert_start(*kind, &mut self.output);
                self.blocks(children);
                B::alert_end(*kind, &mut self.output);
            }
            Block::List { start, items } => self.list(*start, items),
            Block::Table(table) => self.table(table),
            Block::DefinitionList(entries) => {
                self.output.push_str("<dl>");
                for entry in entries {
                    match entry {
                        Definition::Term(inlines) => {
                            self.output.push_str("<dt>");
                            self.inlines(inlines);
                            self.output.push_str("</dt>");
                        }
                        Definition::Details(blocks) => {
                            self.output.push_str("<dd>");
                            self.blocks(blocks);
                            self.output.push_str("</dd>");
                        }
                    }
                }
                self.output.push_str("</dl>");
            }
            Block::Rule => B::horizontal_rule(&mut self.output),
            Block::Html(html) => self.output.push_str(html),
            Block::Esm(_) => {}
        }
    }

    fn list(&mut self, start: Option<u64>, items: &[ListItem]) {
        match start {
            Some(1) => self.output.push_str("<ol>"),
            Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
            None => self.output.push_str("<ul>"),
        }
        for item in items {
            self.output.push_str("<li>");
            if let Some(checked) = item.task {
                B::task_list_marker(checked, &mut self.output);
            }
            self.blocks(&item.blocks);
            self.output.push_str("</li>");
        }
        self.output
            .push_str(if start.is_some() { "</ol>" } else { "</ul>" });
    }

    fn table(&mut self, table: &Table) {
        self.output.push_str("<table><thead><tr>");
        for (index, cell) in table.head.iter().enumerate() {
            self.cell("th", alignment_style(table, index), cell);
        }
        self.output.push_str("</tr></thead><tbody>");
        for row in &table.rows {
            self.output.push_str("<tr>");
            for (index, cell) in row.iter().enumerate() {
                self.cell("td", alignment_style(table, index), cell);
            }
            self.output.push_str("</tr>");
        }
        self.output.push_str("</tbody></table>");
    }

    fn cell(&mut self, tag: &str, align: &str, inlines: &[Inline]) {
        write!(self.output, "<{tag}{align}>").unwrap();
        self.inlines(inlines);
        write!(self.output, "</{tag}>").unwrap();
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.output.push_str(&escape_html(text)),
            Inline::Code(code) => {
                write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
            }
            Inline::Emphasis(children) => self.wrap("em", children),
            Inline::Strong(children) => self.wrap("strong", children),
            Inline::Strikethrough(children) => self.wrap("del", children),
            Inline::Superscript(children) => self.wrap("sup", children),
            Inline::Subscript(children) => self.wrap("sub", children),
            Inline::Link {
                url,
                title,
                content,
            } => {
                write!(self.output, r#"<a href="{}""#, escape_html(url)).unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(title)).unwrap();
                }
                self.output.push('>');
                self.inlines(content);
                self.output.push_str("</a>");
            }
            Inline::Image { url, title, alt } => {
                B::image(url, &inline_text(alt), title, &mut self.output);
            }
            Inline::SoftBreak => self.output.push('\n'),
            Inline::HardBreak => B::hard_break(&mut self.output),
            Inline::Html(html) => self.output.push_str(html),
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Inline]) {
        write!(self.output, "<{tag}>").unwrap();
        self.inlines(children);
        write!(self.output, "</{tag}>").unwrap();
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn alignment_style(table: &Table, column: usize) -> &'static str {
    match table.alignments.get(column) {
        Some(ColumnAlign::Left) => r#" style="text-align:left""#,
        Some(ColumnAlign::Center) => r#" style="text-align:center""#,
        Some(ColumnAlign::Right) => r#" style="text-align:right""#,
        Some(ColumnAlign::None) | None => "",
    }
}
