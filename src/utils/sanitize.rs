//! Neutralise control characters before text reaches a terminal.
//!
//! Backend text can carry escape sequences (`ESC [ ...`) that would restyle
//! or rewrite the user's terminal. Every control character other than tab
//! is replaced with U+FFFD; tabs become four spaces.

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

pub fn terminal_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push_str("    "),
            ch if ch.is_control() => out.push(REPLACEMENT),
            ch => out.push(ch),
        }
    }
    Cow::Owned(out)
}
