//! HTML output for a parsed [`Document`].
//!
//! Every piece of text and every attribute value goes through
//! [`escape_html`]; the only raw markup in the output is the fixed tags
//! written here. Link and image URLs are additionally restricted to a small
//! set of schemes, since escaping alone does not stop `javascript:` URLs.

use std::fmt::Write as _;

use super::node::{Block, Document, Inline, List, ListKind, Table, TableCell};

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Whether a URL may be emitted as `href`/`src`. URLs without a scheme
/// (relative paths, fragments) are allowed.
pub fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme.
    let compact: String = url
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .collect();
    let scheme_end = compact.find(|ch: char| matches!(ch, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(idx) if compact[idx..].starts_with(':') => {
            let scheme = compact[..idx].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

pub fn render_html(doc: &Document) -> String {
    let mut out = String::from("<div class=\"markdown-content\">");
    for block in &doc.blocks {
        write_block(&mut out, block);
    }
    out.push_str("</div>");
    out
}

/// Text that must not be interpreted as markdown (user input, error
/// notices), escaped, with line breaks kept.
pub fn render_plain_html(text: &str) -> String {
    let lines: Vec<String> = text.lines().map(escape_html).collect();
    format!("<p>{}</p>", lines.join("<br>"))
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(content) => {
            out.push_str("<p>");
            write_inlines(out, content);
            out.push_str("</p>");
        }
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 3);
            let _ = write!(out, "<h{level}>");
            write_inlines(out, content);
            let _ = write!(out, "</h{level}>");
        }
        Block::CodeBlock { language, code } => {
            match language {
                Some(lang) => {
                    let _ = write!(
                        out,
                        "<pre><code class=\"language-{}\">",
                        escape_html(lang)
                    );
                }
                None => out.push_str("<pre><code>"),
            }
            out.push_str(&escape_html(code));
            out.push_str("</code></pre>");
        }
        Block::Blockquote(content) => {
            out.push_str("<blockquote>");
            write_inlines(out, content);
            out.push_str("</blockquote>");
        }
        Block::Rule => out.push_str("<hr>"),
        Block::List(list) => write_list(out, list),
        Block::Table(table) => write_table(out, table),
    }
}

fn write_list(out: &mut String, list: &List) {
    let close = match list.kind {
        ListKind::Unordered => {
            out.push_str("<ul>");
            "</ul>"
        }
        ListKind::Ordered { start: 1 } => {
            out.push_str("<ol>");
            "</ol>"
        }
        ListKind::Ordered { start } => {
            let _ = write!(out, "<ol start=\"{start}\">");
            "</ol>"
        }
    };
    for item in &list.items {
        out.push_str("<li>");
        write_inlines(out, item);
        out.push_str("</li>");
    }
    out.push_str(close);
}

fn write_table(out: &mut String, table: &Table) {
    fn write_row(out: &mut String, cells: &[TableCell], tag: &str) {
        out.push_str("<tr>");
        for cell in cells {
            let _ = write!(out, "<{tag}>");
            write_inlines(out, &cell.content);
            let _ = write!(out, "</{tag}>");
        }
        out.push_str("</tr>");
    }

    out.push_str("<table><thead>");
    write_row(out, &table.headers, "th");
    out.push_str("</thead><tbody>");
    for row in &table.rows {
        write_row(out, row, "td");
    }
    out.push_str("</tbody></table>");
}

fn write_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        write_inline(out, inline);
    }
}

fn write_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(text) => out.push_str(&escape_html(text)),
        Inline::Code(code) => {
            out.push_str("<code class=\"inline-code\">");
            out.push_str(&escape_html(code));
            out.push_str("</code>");
        }
        Inline::Strong(children) => wrap(out, "strong", children),
        Inline::Emphasis(children) => wrap(out, "em", children),
        Inline::Strikethrough(children) => wrap(out, "del", children),
        Inline::Link { text, href } if is_safe_url(href) => {
            let _ = write!(
                out,
                "<a href=\"{}\" rel=\"noopener noreferrer\">",
                escape_html(href.trim())
            );
            write_inlines(out, text);
            out.push_str("</a>");
        }
        Inline::Link { text, .. } => write_inlines(out, text),
        Inline::Image { alt, src } if is_safe_url(src) => {
            let _ = write!(
                out,
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(src.trim()),
                escape_html(alt)
            );
        }
        Inline::Image { alt, .. } => out.push_str(&escape_html(alt)),
        Inline::SoftBreak => out.push_str("<br>\n"),
    }
}

fn wrap(out: &mut String, tag: &str, children: &[Inline]) {
    let _ = write!(out, "<{tag}>");
    write_inlines(out, children);
    let _ = write!(out, "</{tag}>");
}
