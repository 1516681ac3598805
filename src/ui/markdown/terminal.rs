//! Styled terminal lines for a parsed [`Document`].
//!
//! All text passes through [`terminal_safe`] before it becomes a span, so
//! backend output cannot smuggle escape sequences into the terminal.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::node::{plain_text, Block, Document, Inline, List, ListKind, Table};
use crate::ui::theme::Theme;
use crate::utils::sanitize::terminal_safe;

const RULE_WIDTH: usize = 40;
const QUOTE_PREFIX: &str = "│ ";
const BULLET: &str = "• ";

pub fn render_lines(doc: &Document, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, block) in doc.blocks.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        render_block(block, theme, &mut lines);
    }
    lines
}

fn render_block(block: &Block, theme: &Theme, lines: &mut Vec<Line<'static>>) {
    let base = theme.assistant_text_style;
    match block {
        Block::Paragraph(content) => {
            lines.extend(InlineWriter::new(theme).write(content, base));
        }
        Block::Heading { level, content } => {
            let style = base.patch(theme.md_heading_style(*level));
            lines.extend(InlineWriter::new(theme).write(content, style));
        }
        Block::CodeBlock { code, .. } => {
            for line in code.split('\n') {
                lines.push(Line::from(Span::styled(
                    terminal_safe(line).into_owned(),
                    theme.md_codeblock_style,
                )));
            }
        }
        Block::Blockquote(content) => {
            let style = base.patch(theme.md_quote_style);
            for mut line in InlineWriter::new(theme).write(content, style) {
                line.spans
                    .insert(0, Span::styled(QUOTE_PREFIX, theme.md_quote_style));
                lines.push(line);
            }
        }
        Block::Rule => {
            lines.push(Line::from(Span::styled(
                "─".repeat(RULE_WIDTH),
                theme.md_rule_style,
            )));
        }
        Block::List(list) => render_list(list, theme, lines),
        Block::Table(table) => render_table(table, theme, lines),
    }
}

fn render_list(list: &List, theme: &Theme, lines: &mut Vec<Line<'static>>) {
    for (idx, item) in list.items.iter().enumerate() {
        let marker = match list.kind {
            ListKind::Unordered => BULLET.to_string(),
            ListKind::Ordered { start } => format!("{}. ", start.saturating_add(idx as u64)),
        };
        let indent = " ".repeat(marker.width());
        let rendered = InlineWriter::new(theme).write(item, theme.assistant_text_style);
        for (line_idx, mut line) in rendered.into_iter().enumerate() {
            let prefix = if line_idx == 0 {
                Span::styled(marker.clone(), theme.md_list_marker_style)
            } else {
                Span::raw(indent.clone())
            };
            line.spans.insert(0, prefix);
            lines.push(line);
        }
    }
}

/// Box-drawn table sized to the widest cell of each column. Rows shorter
/// than the widest row leave their missing cells blank.
fn render_table(table: &Table, theme: &Theme, lines: &mut Vec<Line<'static>>) {
    let header: Vec<String> = table
        .headers
        .iter()
        .map(|cell| terminal_safe(&plain_text(&cell.content)).into_owned())
        .collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| terminal_safe(&plain_text(&cell.content)).into_owned())
                .collect()
        })
        .collect();

    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let border = theme.md_table_border_style;
    let header_style = theme.assistant_text_style.patch(theme.md_table_header_style);
    lines.push(table_row(&header, &widths, header_style, border));
    lines.push(separator_row(&widths, border));
    for row in &rows {
        lines.push(table_row(row, &widths, theme.assistant_text_style, border));
    }
}

fn table_row(cells: &[String], widths: &[usize], style: Style, border: Style) -> Line<'static> {
    let mut spans = vec![Span::styled("│", border)];
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(UnicodeWidthStr::width(cell));
        spans.push(Span::styled(format!(" {cell}{} ", " ".repeat(pad)), style));
        spans.push(Span::styled("│", border));
    }
    Line::from(spans)
}

fn separator_row(widths: &[usize], border: Style) -> Line<'static> {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    Line::from(Span::styled(format!("├{}┤", segments.join("┼")), border))
}

/// Flattens inline nodes into spans, starting a new line at each soft break.
struct InlineWriter<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl<'t> InlineWriter<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            current: Vec::new(),
        }
    }

    fn write(mut self, inlines: &[Inline], style: Style) -> Vec<Line<'static>> {
        self.push_all(inlines, style);
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
        self.lines
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if !text.is_empty() {
            self.current
                .push(Span::styled(terminal_safe(text).into_owned(), style));
        }
    }

    fn push_all(&mut self, inlines: &[Inline], style: Style) {
        for inline in inlines {
            self.push(inline, style);
        }
    }

    fn push(&mut self, inline: &Inline, style: Style) {
        let theme = self.theme;
        match inline {
            Inline::Text(text) => self.push_text(text, style),
            Inline::Code(code) => self.push_text(code, style.patch(theme.md_inline_code_style)),
            Inline::Strong(children) => {
                self.push_all(children, style.add_modifier(Modifier::BOLD))
            }
            Inline::Emphasis(children) => {
                self.push_all(children, style.add_modifier(Modifier::ITALIC))
            }
            Inline::Strikethrough(children) => {
                self.push_all(children, style.add_modifier(Modifier::CROSSED_OUT))
            }
            Inline::Link { text, href } => {
                self.push_all(text, style.patch(theme.md_link_style));
                if plain_text(text).trim() != href.trim() {
                    self.push_text(&format!(" <{}>", href.trim()), theme.md_link_target_style);
                }
            }
            Inline::Image { alt, src } => {
                self.push_text(&format!("[image: {alt}]"), style.patch(theme.md_link_style));
                self.push_text(&format!(" <{}>", src.trim()), theme.md_link_target_style);
            }
            Inline::SoftBreak => {
                self.lines.push(Line::from(std::mem::take(&mut self.current)));
            }
        }
    }
}
