//! Presentation of conversation messages.
//!
//! User text and failure notices are shown verbatim; only real assistant
//! replies go through the markdown engine.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::core::message::{Message, TranscriptRole};
use crate::ui::markdown::{self, escape_html, render_plain_html};
use crate::ui::theme::Theme;
use crate::utils::sanitize::terminal_safe;

pub const EMPTY_TRANSCRIPT: &str = "No messages yet";
const USER_PREFIX: &str = "You: ";

#[derive(Debug, Clone, Copy)]
pub struct TranscriptOptions {
    /// When false, assistant replies are shown as plain text.
    pub markdown: bool,
}

impl Default for TranscriptOptions {
    fn default() -> Self {
        Self { markdown: true }
    }
}

pub fn tool_note(tool: &str) -> String {
    format!("Tool used: {tool}")
}

pub fn message_lines(
    message: &Message,
    theme: &Theme,
    options: TranscriptOptions,
) -> Vec<Line<'static>> {
    let mut lines = match message.role {
        TranscriptRole::User => prefixed_lines(
            &message.content,
            Span::styled(USER_PREFIX, theme.user_prefix_style),
            theme.user_text_style,
        ),
        TranscriptRole::Assistant if message.is_error => {
            plain_lines(&message.content, theme.error_text_style)
        }
        TranscriptRole::Assistant if options.markdown && message.renders_as_markdown() => {
            markdown::render_lines(&markdown::parse(&message.content), theme)
        }
        TranscriptRole::Assistant => plain_lines(&message.content, theme.assistant_text_style),
    };

    if let Some(tool) = &message.tool_used {
        lines.push(Line::from(Span::styled(
            terminal_safe(&tool_note(tool)).into_owned(),
            theme.tool_note_style,
        )));
    }
    lines
}

/// All messages, separated by blank lines, or the empty-state line.
pub fn render_transcript(
    messages: &[Message],
    theme: &Theme,
    options: TranscriptOptions,
) -> Vec<Line<'static>> {
    if messages.is_empty() {
        return vec![Line::from(Span::styled(
            EMPTY_TRANSCRIPT,
            theme.placeholder_style,
        ))];
    }
    let mut lines = Vec::new();
    for (idx, message) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.extend(message_lines(message, theme, options));
    }
    lines
}

fn prefixed_lines(text: &str, prefix: Span<'static>, style: Style) -> Vec<Line<'static>> {
    let indent = " ".repeat(USER_PREFIX.len());
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let lead = if idx == 0 {
                prefix.clone()
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![lead, Span::styled(terminal_safe(line).into_owned(), style)])
        })
        .collect()
}

fn plain_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(Span::styled(terminal_safe(line).into_owned(), style)))
        .collect()
}

/// One message as an HTML fragment, with a class per role.
pub fn message_html(message: &Message, options: TranscriptOptions) -> String {
    let (class, body) = match message.role {
        TranscriptRole::User => ("message user", render_plain_html(&message.content)),
        TranscriptRole::Assistant if message.is_error => {
            ("message error", render_plain_html(&message.content))
        }
        TranscriptRole::Assistant if options.markdown => {
            ("message assistant", markdown::markdown_to_html(&message.content))
        }
        TranscriptRole::Assistant => ("message assistant", render_plain_html(&message.content)),
    };
    let footer = message
        .tool_used
        .as_deref()
        .map(|tool| format!("<div class=\"tool-used\">{}</div>", escape_html(&tool_note(tool))))
        .unwrap_or_default();
    format!("<div class=\"{class}\">{body}{footer}</div>")
}
