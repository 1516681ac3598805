use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Client settings persisted in `config.toml`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the chat backend (e.g., "http://localhost:8000")
    pub api_base_url: Option<String>,
    /// Upper bound for one chat exchange, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Render assistant replies as markdown
    pub markdown: Option<bool>,
    /// Terminal theme name ("dark", "light", "monochrome")
    pub theme: Option<String>,
    /// Identity selected at startup when the backend lists it
    pub default_user: Option<String>,
    /// Model selected at startup when the backend lists it
    pub default_model: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn print_all(&self) {
        println!("parley configuration ({}):", path_display(Self::get_config_path()));
        println!("  api-base-url: {}", self.resolved_api_base_url(None));
        println!("  request-timeout-secs: {}", self.request_timeout().as_secs());
        println!("  markdown: {}", self.markdown_enabled());
        println!("  theme: {}", self.theme.as_deref().unwrap_or("dark"));
        println!(
            "  default-user: {}",
            self.default_user.as_deref().unwrap_or("(first listed)")
        );
        println!(
            "  default-model: {}",
            self.default_model.as_deref().unwrap_or("(first listed)")
        );
    }
}
