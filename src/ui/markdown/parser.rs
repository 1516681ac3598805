//! Line-oriented block scanner.
//!
//! Table detection runs first over the whole input; the remaining text is
//! scanned line by line for fenced code, headings, quotes, rules, list items
//! and paragraphs. Inline syntax is handled by [`super::inline`].
//! Anything that does not fully match a construct stays literal text.

use super::inline::parse_inlines;
use super::node::{Block, Document, Inline, List, ListKind};
use super::table::{split_tables, Segment};

const FENCE: &str = "```";
const MAX_HEADING_LEVEL: usize = 3;

/// Parse untrusted text into a [`Document`]. Never fails.
pub fn parse(text: &str) -> Document {
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut blocks = Vec::new();
    for segment in split_tables(&lines) {
        match segment {
            Segment::Table(table) => blocks.push(Block::Table(table)),
            Segment::Text(run) => BlockScanner::new(&mut blocks).scan(&run),
        }
    }
    Document { blocks }
}

/// Marks every line that belongs to a terminated code fence, fence lines
/// included. An opening fence with no closing fence marks nothing.
pub(super) fn fence_mask(lines: &[&str]) -> Vec<bool> {
    let closes = next_fence_closes(lines);
    let mut mask = vec![false; lines.len()];
    let mut i = 0;
    while i < lines.len() {
        if fence_open(lines[i]).is_some() {
            if let Some(end) = closes[i + 1] {
                for flag in &mut mask[i..=end] {
                    *flag = true;
                }
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    mask
}

/// Returns the info string (possibly empty) of an opening fence line.
fn fence_open(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(FENCE).map(str::trim)
}

fn is_fence_close(line: &str) -> bool {
    line.trim() == FENCE
}

/// Entry `i` is the first closing fence line at or after line `i`; the
/// extra trailing entry is always `None`.
fn next_fence_closes(lines: &[&str]) -> Vec<Option<usize>> {
    let mut next = vec![None; lines.len() + 1];
    for idx in (0..lines.len()).rev() {
        next[idx] = if is_fence_close(lines[idx]) {
            Some(idx)
        } else {
            next[idx + 1]
        };
    }
    next
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }
    let rest = line[level..].strip_prefix(' ')?;
    Some((level as u8, rest.trim()))
}

fn quote_line(line: &str) -> Option<&str> {
    line.strip_prefix("> ")
}

fn is_rule(line: &str) -> bool {
    matches!(line.trim(), "---" | "***")
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Some((ListKind::Unordered, rest));
    }

    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = trimmed[digits..].strip_prefix(". ")?;
    let start = trimmed[..digits].parse().ok()?;
    Some((ListKind::Ordered { start }, rest))
}

/// Accumulates consecutive lines into paragraph, quote and list blocks.
struct BlockScanner<'b> {
    out: &'b mut Vec<Block>,
    paragraph: Vec<Inline>,
    quote: Vec<Inline>,
    list: Option<List>,
}

impl<'b> BlockScanner<'b> {
    fn new(out: &'b mut Vec<Block>) -> Self {
        Self {
            out,
            paragraph: Vec::new(),
            quote: Vec::new(),
            list: None,
        }
    }

    fn scan(mut self, lines: &[&str]) {
        let closes = next_fence_closes(lines);
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if let Some(info) = fence_open(line) {
                if let Some(end) = closes[i + 1] {
                    self.flush_all();
                    let language = info
                        .split_ascii_whitespace()
                        .next()
                        .map(str::to_string);
                    self.out.push(Block::CodeBlock {
                        language,
                        code: lines[i + 1..end].join("\n"),
                    });
                    i = end + 1;
                    continue;
                }
            }

            if line.trim().is_empty() {
                self.flush_all();
            } else if let Some((level, content)) = heading(line) {
                self.flush_all();
                self.out.push(Block::Heading {
                    level,
                    content: parse_inlines(content),
                });
            } else if let Some(content) = quote_line(line) {
                self.flush_paragraph();
                self.flush_list();
                append_line(&mut self.quote, content);
            } else if is_rule(line) {
                self.flush_all();
                self.out.push(Block::Rule);
            } else if let Some((kind, content)) = list_item(line) {
                self.flush_paragraph();
                self.flush_quote();
                self.push_list_item(kind, content);
            } else {
                self.flush_quote();
                self.flush_list();
                append_line(&mut self.paragraph, line);
            }
            i += 1;
        }
        self.flush_all();
    }

    fn push_list_item(&mut self, kind: ListKind, content: &str) {
        if self
            .list
            .as_ref()
            .is_some_and(|list| !list.kind.same_kind(kind))
        {
            self.flush_list();
        }
        let item = parse_inlines(content.trim());
        match self.list.as_mut() {
            Some(list) => list.items.push(item),
            None => {
                self.list = Some(List {
                    kind,
                    items: vec![item],
                })
            }
        }
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let content = std::mem::take(&mut self.paragraph);
            self.out.push(Block::Paragraph(content));
        }
    }

    fn flush_quote(&mut self) {
        if !self.quote.is_empty() {
            let content = std::mem::take(&mut self.quote);
            self.out.push(Block::Blockquote(content));
        }
    }

    fn flush_list(&mut self) {
        if let Some(list) = self.list.take() {
            self.out.push(Block::List(list));
        }
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_quote();
        self.flush_list();
    }
}

/// Append one source line to a running block, separated by a soft break.
fn append_line(target: &mut Vec<Inline>, line: &str) {
    if !target.is_empty() {
        target.push(Inline::SoftBreak);
    }
    target.extend(parse_inlines(line.trim()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_levels_one_to_three() {
        assert_eq!(heading("# Title"), Some((1, "Title")));
        assert_eq!(heading("### Deep  "), Some((3, "Deep")));
        assert_eq!(heading("#### Too deep"), None);
        assert_eq!(heading("#NoSpace"), None);
    }

    #[test]
    fn list_markers() {
        assert_eq!(list_item("- a"), Some((ListKind::Unordered, "a")));
        assert_eq!(list_item("  * b"), Some((ListKind::Unordered, "b")));
        assert_eq!(list_item("12. c"), Some((ListKind::Ordered { start: 12 }, "c")));
        assert_eq!(list_item("12.c"), None);
        assert_eq!(list_item("-a"), None);
        assert_eq!(list_item("99999999999999999999999. overflow"), None);
    }

    #[test]
    fn rules_are_exact() {
        assert!(is_rule("---"));
        assert!(is_rule("*** "));
        assert!(!is_rule("----"));
        assert!(!is_rule("- - -"));
    }

    #[test]
    fn next_close_index() {
        let lines = ["```", "a", "```", "```rust", "b"];
        assert_eq!(
            next_fence_closes(&lines),
            vec![Some(0), Some(2), Some(2), None, None, None]
        );
    }

    #[test]
    fn fence_mask_ignores_unterminated_fences() {
        let lines = ["```rust", "let x = 1;"];
        assert_eq!(fence_mask(&lines), vec![false, false]);

        let lines = ["a", "```", "b", "```", "c"];
        assert_eq!(fence_mask(&lines), vec![false, true, true, true, false]);
    }
}
