//! Markdown rendering for backend replies.
//!
//! [`parse`] turns arbitrary text into a [`Document`] without ever failing.
//! The document holds raw text only; [`render_html`] and [`render_lines`]
//! escape it for their output, so untrusted input never becomes live
//! markup or terminal control sequences.

mod html;
mod inline;
mod node;
mod parser;
mod table;
mod terminal;

#[cfg(test)]
mod tests;

pub use html::{escape_html, is_safe_url, render_html, render_plain_html};
pub use node::{plain_text, Block, Document, Inline, List, ListKind, Table, TableCell};
pub use parser::parse;
pub use terminal::render_lines;

/// Parse and render to HTML in one step.
pub fn markdown_to_html(text: &str) -> String {
    render_html(&parse(text))
}
