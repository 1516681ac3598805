use crate::ui::markdown::{parse, render_lines, Block, Document, Table};
use crate::ui::theme::Theme;

pub fn line_texts(markdown: &str) -> Vec<String> {
    render_lines(&parse(markdown), &Theme::monochrome())
        .iter()
        .map(|line| line.to_string())
        .collect()
}

pub fn tables(doc: &Document) -> Vec<&Table> {
    doc.blocks
        .iter()
        .filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
        .collect()
}

pub fn only_table(markdown: &str) -> Table {
    let doc = parse(markdown);
    let found = tables(&doc);
    assert_eq!(found.len(), 1, "expected exactly one table in {markdown:?}");
    found[0].clone()
}

/// Strip the fixed tags emitted by the HTML renderer, leaving whatever
/// came from the input. Used to check no input `<` survives unescaped.
pub fn strip_known_tags(html: &str) -> String {
    const TAGS: &[&str] = &[
        "div", "p", "h1", "h2", "h3", "pre", "code", "blockquote", "hr", "ul", "ol", "li",
        "table", "thead", "tbody", "tr", "th", "td", "strong", "em", "del", "a", "img", "br",
    ];
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(idx) = rest.find('<') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx + 1..];
        let name_start = tail.strip_prefix('/').unwrap_or(tail);
        let name: String = name_start
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric())
            .collect();
        let end = tail.find('>');
        match end {
            Some(end) if TAGS.contains(&name.as_str()) => rest = &tail[end + 1..],
            _ => {
                out.push('<');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
