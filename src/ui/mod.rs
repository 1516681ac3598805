//! Presentation layer.
//!
//! - [`markdown`]: parsing untrusted reply text and rendering it to HTML or
//!   styled terminal lines.
//! - [`transcript`]: how each conversation message is shown.
//! - [`theme`]: terminal styles; [`ansi`] prints styled lines to a plain
//!   terminal.

pub mod ansi;
pub mod markdown;
pub mod theme;
pub mod transcript;
