//! Wire payloads exchanged with the chat backend.

use serde::{Deserialize, Serialize};

use crate::core::message::{Message, TranscriptRole};

/// A prior turn as sent upstream: role and content only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: TranscriptRole,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub model_id: String,
    pub use_memory: bool,
    pub history: Vec<HistoryEntry>,
}

/// Successful `POST /chat` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub tool_used: Option<String>,
}

/// `GET /config` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResponse {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}
