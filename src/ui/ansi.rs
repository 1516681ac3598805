//! Printing styled lines without a full-screen terminal.
//!
//! Span text is already sanitised by the renderers, so the only escape
//! sequences in the output are the style commands queued here.

use std::io::{self, Write};

use ratatui::crossterm::{
    queue,
    style::{
        Attribute as CAttribute, Color as CColor, Print, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

const ATTRIBUTES: &[(Modifier, CAttribute)] = &[
    (Modifier::BOLD, CAttribute::Bold),
    (Modifier::DIM, CAttribute::Dim),
    (Modifier::ITALIC, CAttribute::Italic),
    (Modifier::UNDERLINED, CAttribute::Underlined),
    (Modifier::REVERSED, CAttribute::Reverse),
    (Modifier::CROSSED_OUT, CAttribute::CrossedOut),
];

/// Queue one line without a trailing newline. Styled spans are followed by
/// an attribute reset when `color` is set; otherwise only the text is written.
pub fn write_line<W: Write>(w: &mut W, line: &Line<'_>, color: bool) -> io::Result<()> {
    for span in &line.spans {
        let style = line.style.patch(span.style);
        if color && is_styled(style) {
            queue_style(w, style)?;
            queue!(w, Print(span.content.as_ref()), SetAttribute(CAttribute::Reset))?;
        } else {
            queue!(w, Print(span.content.as_ref()))?;
        }
    }
    Ok(())
}

pub fn write_lines<W: Write>(w: &mut W, lines: &[Line<'_>], color: bool) -> io::Result<()> {
    for line in lines {
        write_line(w, line, color)?;
        queue!(w, Print('\n'))?;
    }
    Ok(())
}

/// [`write_line`] into a string.
pub fn line_to_ansi(line: &Line<'_>, color: bool) -> io::Result<String> {
    let mut buf = Vec::new();
    write_line(&mut buf, line, color)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn is_styled(style: Style) -> bool {
    let colored = |c: Option<Color>| c.is_some_and(|c| c != Color::Reset);
    colored(style.fg)
        || colored(style.bg)
        || ATTRIBUTES
            .iter()
            .any(|&(modifier, _)| style.add_modifier.contains(modifier))
}

fn queue_style<W: Write>(w: &mut W, style: Style) -> io::Result<()> {
    for &(modifier, attribute) in ATTRIBUTES {
        if style.add_modifier.contains(modifier) {
            queue!(w, SetAttribute(attribute))?;
        }
    }
    if let Some(fg) = style.fg {
        queue!(w, SetForegroundColor(CColor::from(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(w, SetBackgroundColor(CColor::from(bg)))?;
    }
    Ok(())
}
