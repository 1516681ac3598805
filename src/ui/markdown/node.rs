//! Typed content produced by the markdown parser.
//!
//! Text is stored exactly as written. Nothing in this tree is markup; the
//! renderers in [`super::html`] and [`super::terminal`] escape every piece
//! of text for their target when they emit it.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Levels 1 to 3.
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Blockquote(Vec<Inline>),
    Rule,
    List(List),
    Table(Table),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { text: Vec<Inline>, href: String },
    Image { alt: String, src: String },
    SoftBreak,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered { start: u64 },
}

impl ListKind {
    /// Ordered lists match regardless of their start number.
    pub fn same_kind(self, other: ListKind) -> bool {
        matches!(
            (self, other),
            (ListKind::Unordered, ListKind::Unordered)
                | (ListKind::Ordered { .. }, ListKind::Ordered { .. })
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<Vec<Inline>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCell {
    /// Trimmed source text of the cell.
    pub text: String,
    pub content: Vec<Inline>,
}

/// Rows keep the cell count they were written with; they are neither padded
/// nor truncated to the header width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub fn header_texts(&self) -> Vec<&str> {
        self.headers.iter().map(|cell| cell.text.as_str()).collect()
    }

    pub fn row_texts(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.text.as_str()).collect())
            .collect()
    }
}

impl Inline {
    /// Visible text with all formatting removed.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children)
            | Inline::Link { text: children, .. } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak => out.push('\n'),
        }
    }
}

pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}
