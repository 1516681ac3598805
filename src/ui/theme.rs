use ratatui::style::{Color, Modifier, Style};

pub const THEME_NAMES: &[&str] = &["dark", "light", "monochrome"];

#[derive(Debug, Clone)]
pub struct Theme {
    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub error_text_style: Style,
    pub tool_note_style: Style,
    pub placeholder_style: Style,

    // Markdown
    pub md_heading_styles: [Style; 3],
    pub md_inline_code_style: Style,
    pub md_codeblock_style: Style,
    pub md_link_style: Style,
    pub md_link_target_style: Style,
    pub md_quote_style: Style,
    pub md_rule_style: Style,
    pub md_list_marker_style: Style,
    pub md_table_border_style: Style,
    pub md_table_header_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),
            tool_note_style: Style::default().fg(Color::DarkGray),
            placeholder_style: Style::default().fg(Color::DarkGray),

            md_heading_styles: [
                Style::default()
                    .fg(Color::Rgb(255, 215, 100))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(240, 190, 90))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(220, 170, 80))
                    .add_modifier(Modifier::BOLD),
            ],
            md_inline_code_style: Style::default().fg(Color::LightRed),
            md_codeblock_style: Style::default()
                .fg(Color::Rgb(229, 231, 235))
                .bg(Color::Rgb(31, 41, 55)),
            md_link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            md_link_target_style: Style::default().fg(Color::DarkGray),
            md_quote_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            md_rule_style: Style::default().fg(Color::DarkGray),
            md_list_marker_style: Style::default().fg(Color::Yellow),
            md_table_border_style: Style::default().fg(Color::Gray),
            md_table_header_style: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    pub fn light() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            error_text_style: Style::default().fg(Color::Red),
            tool_note_style: Style::default().fg(Color::Gray),
            placeholder_style: Style::default().fg(Color::Gray),

            md_heading_styles: [
                Style::default()
                    .fg(Color::Rgb(31, 41, 55))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(55, 65, 81))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(75, 85, 99))
                    .add_modifier(Modifier::BOLD),
            ],
            md_inline_code_style: Style::default().fg(Color::Rgb(220, 38, 38)),
            md_codeblock_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(243, 244, 246)),
            md_link_style: Style::default()
                .fg(Color::Rgb(59, 130, 246))
                .add_modifier(Modifier::UNDERLINED),
            md_link_target_style: Style::default().fg(Color::Gray),
            md_quote_style: Style::default()
                .fg(Color::Rgb(107, 114, 128))
                .add_modifier(Modifier::ITALIC),
            md_rule_style: Style::default().fg(Color::Gray),
            md_list_marker_style: Style::default().fg(Color::Blue),
            md_table_border_style: Style::default().fg(Color::Gray),
            md_table_header_style: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    /// No colors; only modifiers. Used when output is not a terminal.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            user_prefix_style: bold,
            user_text_style: plain,
            assistant_text_style: plain,
            error_text_style: plain,
            tool_note_style: plain,
            placeholder_style: plain,

            md_heading_styles: [bold, bold, bold],
            md_inline_code_style: plain,
            md_codeblock_style: plain,
            md_link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            md_link_target_style: plain,
            md_quote_style: Style::default().add_modifier(Modifier::ITALIC),
            md_rule_style: plain,
            md_list_marker_style: plain,
            md_table_border_style: plain,
            md_table_header_style: bold,
        }
    }

    /// Look up a built-in theme by name.
    pub fn find(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" | "default-dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            "mono" | "monochrome" => Some(Self::monochrome()),
            _ => None,
        }
    }

    /// Like [`Theme::find`], falling back to the dark theme.
    pub fn from_name(name: &str) -> Self {
        Self::find(name).unwrap_or_else(Self::dark_default)
    }

    pub fn md_heading_style(&self, level: u8) -> Style {
        let idx = usize::from(level.clamp(1, 3)) - 1;
        self.md_heading_styles[idx]
    }
}
