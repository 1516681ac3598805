//! Inline scanner: code spans, images, links, and emphasis.
//!
//! The scanner walks the text left to right. At each position it tries a
//! code span first, so nothing inside backticks is ever reinterpreted, then
//! images, links, and the emphasis markers. A construct only applies when
//! both of its delimiters are found; otherwise the opening characters are
//! kept as literal text. Closing delimiters inside a complete code span
//! never count, so emphasis or a link cannot end in the middle of code.

use std::collections::HashMap;
use std::ops::Range;

use super::node::Inline;

/// Checked in order, so `**` is tried before `*`.
const DELIMITERS: &[(&str, Emphasis)] = &[
    ("**", Emphasis::Strong),
    ("__", Emphasis::Strong),
    ("~~", Emphasis::Strike),
    ("*", Emphasis::Italic),
    ("_", Emphasis::Italic),
];

#[derive(Clone, Copy)]
enum Emphasis {
    Strong,
    Italic,
    Strike,
}

/// Links and emphasis nested deeper than this keep their inner text literal.
const MAX_NESTING: usize = 32;

pub(super) fn parse_inlines(text: &str) -> Vec<Inline> {
    InlineScanner::new(text, 0).run()
}

struct InlineScanner<'a> {
    src: &'a str,
    pos: usize,
    out: Vec<Inline>,
    text: String,
    depth: usize,
    brackets: Option<HashMap<usize, usize>>,
    code_spans: Option<Vec<Range<usize>>>,
    missing: MissingClosers,
}

/// Closers already known to be absent from the rest of the input. A search
/// that fails from one position fails from every later one, so repeated
/// unmatched markers keep the scan linear.
#[derive(Default)]
struct MissingClosers {
    code_runs: Vec<usize>,
    emphasis: [bool; DELIMITERS.len()],
    paren: bool,
}

impl<'a> InlineScanner<'a> {
    fn new(src: &'a str, depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            out: Vec::new(),
            text: String::new(),
            depth,
            brackets: None,
            code_spans: None,
            missing: MissingClosers::default(),
        }
    }

    fn run(mut self) -> Vec<Inline> {
        while let Some(ch) = self.src[self.pos..].chars().next() {
            let consumed = match ch {
                '`' => self.code_span(),
                '!' => self.image(),
                '[' => self.link(),
                '*' | '_' | '~' => self.emphasis(),
                _ => false,
            };
            if !consumed {
                self.text.push(ch);
                self.pos += ch.len_utf8();
            }
        }
        self.flush_text();
        self.out
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(std::mem::take(&mut self.text)));
        }
    }

    fn emit(&mut self, node: Inline, consumed: usize) {
        self.flush_text();
        self.out.push(node);
        self.pos += consumed;
    }

    fn nested(&self, inner: &str) -> Vec<Inline> {
        if self.depth >= MAX_NESTING {
            return vec![Inline::Text(inner.to_string())];
        }
        InlineScanner::new(inner, self.depth + 1).run()
    }

    fn code_spans(&mut self) -> &[Range<usize>] {
        let src = self.src;
        self.code_spans.get_or_insert_with(|| code_span_ranges(src))
    }

    /// Keep `literal` as text and move past it.
    fn skip_literal(&mut self, literal: &str) {
        self.text.push_str(literal);
        self.pos += literal.len();
    }

    fn code_span(&mut self) -> bool {
        let src = self.src;
        let rest = &src[self.pos..];
        let ticks = rest.bytes().take_while(|&b| b == b'`').count();
        let fence = &rest[..ticks];
        if self.missing.code_runs.contains(&ticks) {
            self.skip_literal(fence);
            return true;
        }
        let Some(close) = find_exact_run(&rest[ticks..], ticks) else {
            self.missing.code_runs.push(ticks);
            self.skip_literal(fence);
            return true;
        };
        let body = &rest[ticks..ticks + close];
        self.emit(Inline::Code(body.to_string()), ticks + close + ticks);
        true
    }

    fn image(&mut self) -> bool {
        if !self.src[self.pos..].starts_with("![") {
            return false;
        }
        match self.bracket_target(self.pos + 1) {
            Some(target) => {
                let node = Inline::Image {
                    alt: target.label.to_string(),
                    src: target.url.to_string(),
                };
                self.emit(node, target.end - self.pos);
                true
            }
            None => false,
        }
    }

    fn link(&mut self) -> bool {
        match self.bracket_target(self.pos) {
            Some(target) => {
                let node = Inline::Link {
                    text: self.nested(target.label),
                    href: target.url.to_string(),
                };
                self.emit(node, target.end - self.pos);
                true
            }
            None => false,
        }
    }

    /// Parse `[label](url)` whose `[` is at byte `open`.
    fn bracket_target(&mut self, open: usize) -> Option<BracketTarget<'a>> {
        let src = self.src;
        if self.brackets.is_none() {
            let pairs = match_brackets(src, self.code_spans());
            self.brackets = Some(pairs);
        }
        let close = *self.brackets.as_ref()?.get(&open)?;
        if !src[close + 1..].starts_with('(') || self.missing.paren {
            return None;
        }
        let url_start = close + 2;
        let Some(url_close) = find_outside(src, url_start, ")", self.code_spans()) else {
            self.missing.paren = true;
            return None;
        };
        let url = src[url_start..url_close].trim();
        if url.is_empty() {
            return None;
        }
        Some(BracketTarget {
            label: &src[open + 1..close],
            url,
            end: url_close + 1,
        })
    }

    fn emphasis(&mut self) -> bool {
        let src = self.src;
        let rest = &src[self.pos..];
        let Some((slot, &(marker, kind))) = DELIMITERS
            .iter()
            .enumerate()
            .find(|(_, (marker, _))| rest.starts_with(marker))
        else {
            return false;
        };

        let before = src[..self.pos].chars().next_back();
        if !can_open(marker, before, &rest[marker.len()..]) {
            self.skip_literal(marker);
            return true;
        }

        let body_start = self.pos + marker.len();
        let close = if self.missing.emphasis[slot] {
            None
        } else {
            find_closing(src, body_start, marker, self.code_spans())
        };
        let Some(close) = close else {
            self.missing.emphasis[slot] = true;
            self.skip_literal(marker);
            return true;
        };

        let children = self.nested(&src[body_start..close]);
        let node = match kind {
            Emphasis::Strong => Inline::Strong(children),
            Emphasis::Italic => Inline::Emphasis(children),
            Emphasis::Strike => Inline::Strikethrough(children),
        };
        let consumed = close + marker.len() - self.pos;
        self.emit(node, consumed);
        true
    }
}

fn marker_char(marker: &str) -> char {
    marker.chars().next().unwrap_or('*')
}

fn can_open(marker: &str, before: Option<char>, after: &str) -> bool {
    let Some(next) = after.chars().next() else {
        return false;
    };
    if next.is_whitespace() {
        return false;
    }
    if marker.len() == 1 && next == marker_char(marker) {
        return false;
    }
    // `_` inside a word (snake_case) is not emphasis.
    !(marker.starts_with('_') && before.is_some_and(char::is_alphanumeric))
}

/// Byte index in `src` of the delimiter closing an emphasis opened just
/// before `from`.
fn find_closing(src: &str, from: usize, marker: &str, code: &[Range<usize>]) -> Option<usize> {
    let m = marker_char(marker);
    let mut search = from;
    while let Some(idx) = find_outside(src, search, marker, code) {
        let before = src[..idx].chars().next_back();
        let after = src[idx + marker.len()..].chars().next();

        let non_empty = idx > from;
        let hugs_text = before.is_some_and(|ch| !ch.is_whitespace());
        let isolated = marker.len() > 1 || (before != Some(m) && after != Some(m));
        let word_end = !(m == '_' && after.is_some_and(char::is_alphanumeric));

        if non_empty && hugs_text && isolated && word_end {
            return Some(idx);
        }
        search = idx + m.len_utf8();
    }
    None
}

/// First occurrence of `pat` at or after `from` that is not inside a code span.
fn find_outside(src: &str, mut from: usize, pat: &str, code: &[Range<usize>]) -> Option<usize> {
    loop {
        let idx = from + src[from..].find(pat)?;
        match enclosing_span(code, idx) {
            Some(span) => from = span.end,
            None => return Some(idx),
        }
    }
}

fn enclosing_span(code: &[Range<usize>], idx: usize) -> Option<&Range<usize>> {
    let after = code.partition_point(|span| span.start <= idx);
    after
        .checked_sub(1)
        .map(|i| &code[i])
        .filter(|span| idx < span.end)
}

/// Byte ranges of complete code spans, backticks included, in source order.
/// Runs are paired left to right the same way [`InlineScanner::code_span`]
/// pairs them.
fn code_span_ranges(src: &str) -> Vec<Range<usize>> {
    let bytes = src.as_bytes();
    let mut spans = Vec::new();
    let mut unmatched: Vec<usize> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let ticks = bytes[i..].iter().take_while(|&&b| b == b'`').count();
        let body = i + ticks;
        let close = if unmatched.contains(&ticks) {
            None
        } else {
            find_exact_run(&src[body..], ticks)
        };
        match close {
            Some(close) => {
                let end = body + close + ticks;
                spans.push(i..end);
                i = end;
            }
            None => {
                unmatched.push(ticks);
                i = body;
            }
        }
    }
    spans
}

/// Offset (relative to `s`) of the first run of exactly `len` backticks.
fn find_exact_run(s: &str, len: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == len {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

struct BracketTarget<'a> {
    label: &'a str,
    url: &'a str,
    /// Byte offset just past the closing `)`.
    end: usize,
}

/// Map each `[` to the `]` that closes it, counting nested pairs. Brackets
/// inside code spans are ignored.
fn match_brackets(src: &str, code: &[Range<usize>]) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    for (idx, byte) in src.bytes().enumerate() {
        if matches!(byte, b'[' | b']') && enclosing_span(code, idx).is_some() {
            continue;
        }
        match byte {
            b'[' => open.push(idx),
            b']' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, idx);
                }
            }
            _ => {}
        }
    }
    pairs
}
