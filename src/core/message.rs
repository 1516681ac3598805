use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed notice appended in place of a reply when the exchange with the
/// backend fails. The transport error itself is never shown.
pub const SEND_FAILURE_NOTICE: &str =
    "❌ Error: Failed to communicate with backend. Please check your connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Assistant,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(TranscriptRole::User),
            "assistant" => Ok(TranscriptRole::Assistant),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

/// One entry of the conversation transcript.
///
/// Messages are never edited once created; the conversation only hands out
/// shared references to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_used: Option<String>,
    /// Client-side failure notice. Never rendered as markdown.
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            tool_used: None,
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_used: Option<String>) -> Self {
        Self {
            tool_used: tool_used.filter(|tool| !tool.trim().is_empty()),
            ..Self::new(TranscriptRole::Assistant, content)
        }
    }

    /// The synthesized reply used when a send fails.
    pub fn send_failure() -> Self {
        Self {
            is_error: true,
            ..Self::new(TranscriptRole::Assistant, SEND_FAILURE_NOTICE)
        }
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }

    /// Whether display should run the content through the markdown engine.
    pub fn renders_as_markdown(&self) -> bool {
        match self.role {
            TranscriptRole::User => false,
            TranscriptRole::Assistant => !self.is_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(TranscriptRole::try_from("system").is_err());
        assert!(TranscriptRole::try_from("app/info").is_err());
    }

    #[test]
    fn roles_round_trip_through_strings() {
        for role in [TranscriptRole::User, TranscriptRole::Assistant] {
            let text: String = role.into();
            assert_eq!(TranscriptRole::try_from(text).unwrap(), role);
        }
    }

    #[test]
    fn failure_notice_is_flagged_and_not_markdown() {
        let msg = Message::send_failure();
        assert!(msg.is_error);
        assert!(msg.is_assistant());
        assert_eq!(msg.content, SEND_FAILURE_NOTICE);
        assert!(!msg.renders_as_markdown());
    }

    #[test]
    fn only_assistant_replies_render_as_markdown() {
        assert!(!Message::user("**hi**").renders_as_markdown());
        assert!(Message::assistant("**hi**", None).renders_as_markdown());
    }

    #[test]
    fn blank_tool_label_is_dropped() {
        let msg = Message::assistant("done", Some("  ".into()));
        assert_eq!(msg.tool_used, None);
        let msg = Message::assistant("done", Some("search_employees".into()));
        assert_eq!(msg.tool_used.as_deref(), Some("search_employees"));
    }
}
