//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod render;
pub mod say;
pub mod settings;

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::backend::HttpBackend;
use crate::core::chat::{bootstrap, ApiStatus, StartupSelection};
use crate::core::config::Config;
use crate::core::conversation::ConversationState;
use crate::ui::theme::Theme;
use crate::ui::transcript::TranscriptOptions;
use crate::utils::logging::init_tracing;
use crate::utils::url::is_http_url;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "A terminal chat client for a multi-user, multi-model chat backend")]
#[command(
    long_about = "Parley talks to a chat backend that answers on behalf of a selected user \
identity and model. Replies are rendered as markdown in the terminal.\n\n\
Environment Variables:\n\
  PARLEY_API_URL    Backend base URL (defaults to http://localhost:8000)\n\
  RUST_LOG          Log filter (defaults to warn)\n\n\
Chat commands:\n\
  /user <id>        Switch identity (clears the conversation)\n\
  /model <id>       Switch model\n\
  /memory           Toggle sending history to the backend\n\
  /status           Show connection, identity, model and memory\n\
  /help             Show all commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Write diagnostics to this file instead of stderr
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Identity to select at startup
    #[arg(short = 'u', long, global = true)]
    pub user: Option<String>,

    /// Model to select at startup
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Terminal theme (dark, light, monochrome)
    #[arg(long, global = true)]
    pub theme: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Say {
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
        /// Print the reply as HTML
        #[arg(long)]
        html: bool,
    },
    /// Render markdown from a file (or stdin) without contacting the backend
    Render {
        file: Option<PathBuf>,
        /// Print HTML instead of terminal output
        #[arg(long)]
        html: bool,
    },
    /// Show local settings and the configuration offered by the backend
    Config,
    /// Set a local setting
    Set {
        key: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        value: Vec<String>,
    },
    /// Unset a local setting
    Unset { key: String },
}

/// Settings resolved from flags, environment and the settings file.
pub struct Context {
    pub config: Config,
    pub api_url: String,
    pub timeout: Duration,
    pub theme: Theme,
    pub options: TranscriptOptions,
    pub selection: StartupSelection,
    pub color: bool,
}

impl Context {
    pub fn resolve(args: &Args, config: Config) -> Result<Self, Box<dyn Error>> {
        let api_url = config.resolved_api_base_url(args.api_url.as_deref());
        if !is_http_url(&api_url) {
            return Err(format!("Invalid backend URL: {api_url} (expected http:// or https://)").into());
        }
        let (theme, color) = pick_theme(args, &config);
        Ok(Self {
            api_url,
            timeout: config.request_timeout(),
            theme,
            options: TranscriptOptions {
                markdown: config.markdown_enabled(),
            },
            selection: StartupSelection {
                user: args.user.clone().or_else(|| config.default_user.clone()),
                model: args.model.clone().or_else(|| config.default_model.clone()),
            },
            color,
            config,
        })
    }

    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(self.api_url.clone())
    }

    /// Fetch the backend config into a fresh conversation.
    pub async fn connect(&self, backend: &HttpBackend) -> (ConversationState, ApiStatus) {
        let mut state = ConversationState::new();
        let status = bootstrap(&mut state, backend, &self.selection).await;
        info!(api = %self.api_url, status = status.label(), "Connected");
        (state, status)
    }
}

/// Theme from the flag or settings; without either, colors only on a TTY.
pub fn pick_theme(args: &Args, config: &Config) -> (Theme, bool) {
    let color = std::io::stdout().is_terminal();
    let theme = match args.theme.as_deref().or(config.theme.as_deref()) {
        Some(name) => Theme::from_name(name),
        None if color => Theme::dark_default(),
        None => Theme::monochrome(),
    };
    (theme, color)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Some(Commands::Render { ref file, html }) => render::run_render(file.as_deref(), html, &args),
        Some(Commands::Set { ref key, ref value }) => settings::set(key, &value.join(" ")),
        Some(Commands::Unset { ref key }) => settings::unset(key),
        Some(Commands::Config) => {
            let ctx = Context::resolve(&args, Config::load()?)?;
            settings::show(&ctx).await
        }
        Some(Commands::Say { ref prompt, html }) => {
            let ctx = Context::resolve(&args, Config::load()?)?;
            say::run_say(&ctx, &prompt.join(" "), html).await
        }
        Some(Commands::Chat) | None => {
            let ctx = Context::resolve(&args, Config::load()?)?;
            let backend = ctx.backend();
            let (state, status) = ctx.connect(&backend).await;
            let mut session = chat::ChatSession::new(
                state,
                &backend,
                status,
                ctx.timeout,
                ctx.theme.clone(),
                ctx.options,
            );
            chat::run_chat(&mut session, ctx.color).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_chat() {
        let args = Args::try_parse_from(["parley"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn say_collects_words_and_global_flags() {
        let args = Args::try_parse_from([
            "parley", "--user", "Bob", "say", "--html", "how", "many", "days?",
        ])
        .unwrap();
        assert_eq!(args.user.as_deref(), Some("Bob"));
        match args.command {
            Some(Commands::Say { prompt, html }) => {
                assert!(html);
                assert_eq!(prompt.join(" "), "how many days?");
            }
            _ => panic!("expected say"),
        }
    }

    #[test]
    fn flags_override_settings() {
        let args = Args::try_parse_from([
            "parley",
            "--api-url",
            "http://backend:9000/",
            "--model",
            "GPT-4",
            "--theme",
            "light",
        ])
        .unwrap();
        let config = Config {
            api_base_url: Some("http://ignored:1".into()),
            default_model: Some("Ollama".into()),
            default_user: Some("Eve".into()),
            markdown: Some(false),
            ..Config::default()
        };
        let ctx = Context::resolve(&args, config).unwrap();
        assert_eq!(ctx.api_url, "http://backend:9000/");
        assert_eq!(ctx.selection.model.as_deref(), Some("GPT-4"));
        assert_eq!(ctx.selection.user.as_deref(), Some("Eve"));
        assert!(!ctx.options.markdown);
        assert_eq!(ctx.theme.user_text_style, Theme::light().user_text_style);
    }

    #[test]
    fn non_http_url_is_rejected() {
        let args = Args::try_parse_from(["parley", "--api-url", "localhost:8000"]).unwrap();
        assert!(Context::resolve(&args, Config::default()).is_err());
    }
}
