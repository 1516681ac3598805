//! Interactive chat on stdin: one line per message, slash commands for the
//! sidebar controls (identity, model, memory).

use std::error::Error;
use std::io::Write as _;
use std::time::Duration;

use ratatui::text::{Line, Span};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::core::backend::ChatBackend;
use crate::core::chat::{self, ApiStatus};
use crate::core::conversation::ConversationState;
use crate::ui::ansi::write_lines;
use crate::ui::theme::Theme;
use crate::ui::transcript::{message_lines, render_transcript, TranscriptOptions};

const PROMPT: &str = "> ";

const HELP: &[(&str, &str)] = &[
    ("/user <id>", "Switch identity (clears the conversation)"),
    ("/model <id>", "Switch model"),
    ("/memory", "Toggle sending history to the backend"),
    ("/clear", "Clear the conversation"),
    ("/status", "Show connection, identity, model and memory"),
    ("/users", "List identities offered by the backend"),
    ("/models", "List models offered by the backend"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

pub fn memory_description(enabled: bool) -> &'static str {
    if enabled {
        "History will be sent to backend"
    } else {
        "Stateless conversation"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Send(String),
    User(Option<String>),
    Model(Option<String>),
    Memory,
    Clear,
    Status,
    Users,
    Models,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    /// `None` for blank input. Anything not starting with `/` is a message.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return Some(ChatCommand::Send(input.trim_end().to_string()));
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_string())),
            None => (command, None),
        };
        let arg = arg.filter(|arg| !arg.is_empty());
        Some(match name {
            "user" => ChatCommand::User(arg),
            "model" => ChatCommand::Model(arg),
            "memory" => ChatCommand::Memory,
            "clear" => ChatCommand::Clear,
            "status" => ChatCommand::Status,
            "users" => ChatCommand::Users,
            "models" => ChatCommand::Models,
            "help" => ChatCommand::Help,
            "quit" | "exit" => ChatCommand::Quit,
            other => ChatCommand::Unknown(other.to_string()),
        })
    }
}

/// What to print after a command, and whether to keep going.
#[derive(Debug, Default)]
pub struct CommandOutcome {
    pub lines: Vec<Line<'static>>,
    pub quit: bool,
}

pub struct ChatSession<'b> {
    state: ConversationState,
    backend: &'b dyn ChatBackend,
    status: ApiStatus,
    timeout: Duration,
    theme: Theme,
    options: TranscriptOptions,
}

impl<'b> ChatSession<'b> {
    pub fn new(
        state: ConversationState,
        backend: &'b dyn ChatBackend,
        status: ApiStatus,
        timeout: Duration,
        theme: Theme,
        options: TranscriptOptions,
    ) -> Self {
        Self {
            state,
            backend,
            status,
            timeout,
            theme,
            options,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub async fn execute(&mut self, command: ChatCommand) -> CommandOutcome {
        let lines = match command {
            ChatCommand::Send(text) => self.send(&text).await,
            ChatCommand::User(None) => self.notice(format!(
                "Current user: {}",
                self.state.active_user().unwrap_or("(none)")
            )),
            ChatCommand::User(Some(id)) => self.switch_user(id),
            ChatCommand::Model(None) => self.notice(format!(
                "Current model: {}",
                self.state.active_model().unwrap_or("(none)")
            )),
            ChatCommand::Model(Some(id)) => self.switch_model(id),
            ChatCommand::Memory => self.toggle_memory(),
            ChatCommand::Clear => {
                self.state.clear();
                self.notice("Conversation cleared.")
            }
            ChatCommand::Status => self.status_lines(),
            ChatCommand::Users => {
                self.listing("Users", &self.state.config().users, self.state.active_user())
            }
            ChatCommand::Models => self.listing(
                "Models",
                &self.state.config().models,
                self.state.active_model(),
            ),
            ChatCommand::Help => HELP
                .iter()
                .map(|(usage, about)| Line::from(format!("{usage:<14}{about}")))
                .collect(),
            ChatCommand::Quit => {
                return CommandOutcome {
                    lines: Vec::new(),
                    quit: true,
                }
            }
            ChatCommand::Unknown(name) => self.error(format!(
                "Unknown command: /{name}. Type /help for commands."
            )),
        };
        CommandOutcome { lines, quit: false }
    }

    async fn send(&mut self, text: &str) -> Vec<Line<'static>> {
        let before = self.state.messages().len();
        if let Err(err) = chat::send_message(&mut self.state, self.backend, text, self.timeout).await
        {
            debug!(%err, "Send refused");
            return self.error(err.to_string());
        }
        // Skip the user's own message; it is already on screen.
        let mut lines = Vec::new();
        for message in self.state.messages().iter().skip(before + 1) {
            lines.extend(message_lines(message, &self.theme, self.options));
        }
        lines
    }

    fn switch_user(&mut self, id: String) -> Vec<Line<'static>> {
        if !self.state.config().has_user(&id) {
            return self.error(format!(
                "Unknown user: {id}. Available: {}",
                self.state.config().users.join(", ")
            ));
        }
        let had_messages = !self.state.messages().is_empty();
        let changed = self.state.active_user() != Some(id.as_str());
        self.state.set_active_user(id.clone());
        if changed && had_messages && self.state.messages().is_empty() {
            self.notice(format!("Switched to user {id}; conversation cleared."))
        } else {
            self.notice(format!("Active user: {id}"))
        }
    }

    fn switch_model(&mut self, id: String) -> Vec<Line<'static>> {
        if !self.state.config().has_model(&id) {
            return self.error(format!(
                "Unknown model: {id}. Available: {}",
                self.state.config().models.join(", ")
            ));
        }
        self.state.set_active_model(id.clone());
        self.notice(format!("Active model: {id}"))
    }

    fn toggle_memory(&mut self) -> Vec<Line<'static>> {
        if !self.state.config().memory_toggle_enabled() {
            return self.error("Memory toggle is not available for this backend.".to_string());
        }
        self.state.toggle_memory();
        let enabled = self.state.memory_enabled();
        self.notice(format!(
            "Memory {}: {}",
            if enabled { "on" } else { "off" },
            memory_description(enabled)
        ))
    }

    pub fn status_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(format!("API: {}", self.status.label())),
            Line::from(format!(
                "User: {}",
                self.state.active_user().unwrap_or("(none)")
            )),
            Line::from(format!(
                "Model: {}",
                self.state.active_model().unwrap_or("(none)")
            )),
        ];
        if self.state.config().memory_toggle_enabled() {
            let enabled = self.state.memory_enabled();
            lines.push(Line::from(format!(
                "Memory: {} ({})",
                if enabled { "on" } else { "off" },
                memory_description(enabled)
            )));
        }
        if !self.state.can_send() {
            lines.extend(self.error("Please select a user and model".to_string()));
        }
        lines
    }

    fn listing(&self, title: &str, items: &[String], active: Option<&str>) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(format!("{title}:"))];
        if items.is_empty() {
            lines.push(Line::from("  (none)"));
        }
        for item in items {
            let marker = if Some(item.as_str()) == active { "*" } else { " " };
            lines.push(Line::from(format!("{marker} {item}")));
        }
        lines
    }

    fn notice(&self, text: impl Into<String>) -> Vec<Line<'static>> {
        vec![Line::from(Span::styled(text.into(), self.theme.tool_note_style))]
    }

    fn error(&self, text: String) -> Vec<Line<'static>> {
        vec![Line::from(Span::styled(text, self.theme.error_text_style))]
    }

    pub fn transcript_lines(&self) -> Vec<Line<'static>> {
        render_transcript(self.state.messages(), &self.theme, self.options)
    }
}

/// Run the read-eval-print loop until `/quit` or end of input.
pub async fn run_chat(session: &mut ChatSession<'_>, color: bool) -> Result<(), Box<dyn Error>> {
    print_lines(&session.status_lines(), color)?;
    print_lines(&[Line::default()], color)?;
    print_lines(&session.transcript_lines(), color)?;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = input.next_line().await? else {
            println!();
            break;
        };
        let Some(command) = ChatCommand::parse(&line) else {
            continue;
        };
        let outcome = session.execute(command).await;
        print_lines(&outcome.lines, color)?;
        if outcome.quit {
            break;
        }
    }
    Ok(())
}

pub(crate) fn print_lines(lines: &[Line<'_>], color: bool) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write_lines(&mut out, lines, color)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatRequest, ChatResponse};
    use crate::core::backend::BackendError;
    use crate::core::config::BackendConfig;
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn fetch_config(&self) -> Result<BackendConfig, BackendError> {
            Ok(BackendConfig::fallback())
        }

        async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
            Ok(ChatResponse {
                response: format!("**{}** said {}", request.user_id, request.message),
                tool_used: None,
            })
        }
    }

    fn session(backend: &EchoBackend) -> ChatSession<'_> {
        let mut state = ConversationState::new();
        state.set_config(BackendConfig::fallback());
        state.set_active_user("Alice");
        state.set_active_model("Ollama");
        ChatSession::new(
            state,
            backend,
            ApiStatus::Disconnected,
            Duration::from_secs(5),
            Theme::monochrome(),
            TranscriptOptions::default(),
        )
    }

    fn texts(lines: &[Line<'static>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn parses_commands_and_messages() {
        assert_eq!(ChatCommand::parse("   "), None);
        assert_eq!(
            ChatCommand::parse("hello there\n"),
            Some(ChatCommand::Send("hello there".into()))
        );
        assert_eq!(
            ChatCommand::parse("/user  Bob "),
            Some(ChatCommand::User(Some("Bob".into())))
        );
        assert_eq!(ChatCommand::parse("/model"), Some(ChatCommand::Model(None)));
        assert_eq!(ChatCommand::parse("/exit"), Some(ChatCommand::Quit));
        assert_eq!(
            ChatCommand::parse("/nope"),
            Some(ChatCommand::Unknown("nope".into()))
        );
    }

    #[tokio::test]
    async fn send_prints_rendered_reply_only() {
        let backend = EchoBackend;
        let mut session = session(&backend);
        let outcome = session.execute(ChatCommand::Send("hi".into())).await;
        assert_eq!(texts(&outcome.lines), vec!["Alice said hi"]);
        assert_eq!(session.state().messages().len(), 2);
    }

    #[tokio::test]
    async fn switching_user_reports_cleared_history() {
        let backend = EchoBackend;
        let mut session = session(&backend);
        session.execute(ChatCommand::Send("hi".into())).await;

        let outcome = session.execute(ChatCommand::User(Some("Bob".into()))).await;
        assert_eq!(
            texts(&outcome.lines),
            vec!["Switched to user Bob; conversation cleared."]
        );
        assert!(session.state().messages().is_empty());
    }

    #[tokio::test]
    async fn unlisted_identity_is_refused() {
        let backend = EchoBackend;
        let mut session = session(&backend);
        let outcome = session.execute(ChatCommand::User(Some("Mallory".into()))).await;
        assert_eq!(
            texts(&outcome.lines),
            vec!["Unknown user: Mallory. Available: Alice, Bob, Eve"]
        );
        assert_eq!(session.state().active_user(), Some("Alice"));
    }

    #[tokio::test]
    async fn memory_toggle_reports_mode() {
        let backend = EchoBackend;
        let mut session = session(&backend);
        let outcome = session.execute(ChatCommand::Memory).await;
        assert_eq!(texts(&outcome.lines), vec!["Memory off: Stateless conversation"]);
        let outcome = session.execute(ChatCommand::Memory).await;
        assert_eq!(
            texts(&outcome.lines),
            vec!["Memory on: History will be sent to backend"]
        );
    }

    #[tokio::test]
    async fn memory_toggle_requires_feature() {
        let backend = EchoBackend;
        let mut state = ConversationState::new();
        state.set_config(BackendConfig {
            models: vec!["m".into()],
            users: vec!["u".into()],
            features: vec![],
        });
        let mut session = ChatSession::new(
            state,
            &backend,
            ApiStatus::Connected,
            Duration::from_secs(5),
            Theme::monochrome(),
            TranscriptOptions::default(),
        );
        let outcome = session.execute(ChatCommand::Memory).await;
        assert_eq!(
            texts(&outcome.lines),
            vec!["Memory toggle is not available for this backend."]
        );
        assert!(session.state().memory_enabled());
    }

    #[tokio::test]
    async fn send_without_selection_is_refused() {
        let backend = EchoBackend;
        let mut state = ConversationState::new();
        state.set_config(BackendConfig::fallback());
        let mut session = ChatSession::new(
            state,
            &backend,
            ApiStatus::Connected,
            Duration::from_secs(5),
            Theme::monochrome(),
            TranscriptOptions::default(),
        );
        let outcome = session.execute(ChatCommand::Send("hi".into())).await;
        assert_eq!(texts(&outcome.lines), vec!["Please select a user and model"]);
        assert!(session.state().messages().is_empty());
    }

    #[tokio::test]
    async fn status_and_listings() {
        let backend = EchoBackend;
        let mut session = session(&backend);
        let status = session.execute(ChatCommand::Status).await;
        assert_eq!(
            texts(&status.lines),
            vec![
                "API: disconnected",
                "User: Alice",
                "Model: Ollama",
                "Memory: on (History will be sent to backend)",
            ]
        );
        let users = session.execute(ChatCommand::Users).await;
        assert_eq!(
            texts(&users.lines),
            vec!["Users:", "* Alice", "  Bob", "  Eve"]
        );
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let backend = EchoBackend;
        let mut session = session(&backend);
        assert!(session.execute(ChatCommand::Quit).await.quit);
    }
}
