//! Conversation state: the transcript, the active identity and model, the
//! memory toggle and the in-flight flag.
//!
//! [`ConversationState`] is the only owner of this data. Everything else
//! reads it through shared borrows and changes it through the methods below.

use std::fmt;

use tracing::{debug, info};

use crate::api::{ChatRequest, ChatResponse, HistoryEntry};
use crate::core::config::BackendConfig;
use crate::core::message::Message;

/// Reasons a send is refused before anything is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    EmptyMessage,
    NoActiveUser,
    NoActiveModel,
    AlreadySending,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::EmptyMessage => write!(f, "Message is empty"),
            SendError::NoActiveUser | SendError::NoActiveModel => {
                write!(f, "Please select a user and model")
            }
            SendError::AlreadySending => write!(f, "A reply is still pending"),
        }
    }
}

impl std::error::Error for SendError {}

/// An accepted send waiting for the backend.
///
/// Returned by [`ConversationState::begin_send`]; handing it back to
/// [`ConversationState::finish_send`] is the only way to leave the sending
/// state, so each accepted send completes exactly once.
#[derive(Debug)]
#[must_use = "a pending send must be finished to clear the sending flag"]
pub struct PendingSend {
    request: ChatRequest,
    sequence: u64,
}

impl PendingSend {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Clone)]
pub struct ConversationState {
    config: BackendConfig,
    messages: Vec<Message>,
    active_user: Option<String>,
    active_model: Option<String>,
    memory_enabled: bool,
    sending: bool,
    send_sequence: u64,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            config: BackendConfig::default(),
            messages: Vec::new(),
            active_user: None,
            active_model: None,
            memory_enabled: true,
            sending: false,
            send_sequence: 0,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn active_user(&self) -> Option<&str> {
        self.active_user.as_deref()
    }

    pub fn active_model(&self) -> Option<&str> {
        self.active_model.as_deref()
    }

    pub fn memory_enabled(&self) -> bool {
        self.memory_enabled
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Whether both an identity and a model are selected.
    pub fn can_send(&self) -> bool {
        self.active_user.is_some() && self.active_model.is_some()
    }

    pub fn set_config(&mut self, config: BackendConfig) {
        self.config = config;
    }

    /// Select the active identity. Switching from one identity to a
    /// different one clears the transcript; an empty id unsets the identity.
    pub fn set_active_user(&mut self, id: impl Into<String>) {
        let next = non_empty(id.into());
        let switched = matches!(
            (&self.active_user, &next),
            (Some(prev), Some(next)) if prev != next
        );
        if switched {
            info!(
                from = self.active_user.as_deref().unwrap_or_default(),
                to = next.as_deref().unwrap_or_default(),
                cleared = self.messages.len(),
                "Active user changed; clearing conversation"
            );
            self.messages.clear();
        }
        self.active_user = next;
    }

    /// Select the active model. Never touches the transcript.
    pub fn set_active_model(&mut self, id: impl Into<String>) {
        self.active_model = non_empty(id.into());
    }

    pub fn toggle_memory(&mut self) {
        self.memory_enabled = !self.memory_enabled;
        debug!(memory_enabled = self.memory_enabled, "Memory toggled");
    }

    /// Set the in-flight flag. Raising it is a compare-and-swap: returns
    /// `false` and changes nothing when a send is already in flight.
    pub fn set_sending(&mut self, sending: bool) -> bool {
        if sending && self.sending {
            return false;
        }
        self.sending = sending;
        true
    }

    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// History sent upstream: every message projected to role and content
    /// when memory is on, nothing when it is off.
    pub fn history_payload(&self) -> Vec<HistoryEntry> {
        if !self.memory_enabled {
            return Vec::new();
        }
        self.messages.iter().map(HistoryEntry::from).collect()
    }

    /// First half of a send: validate, build the request from the current
    /// history, append the user's message and raise the in-flight flag.
    ///
    /// On error nothing has changed.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend, SendError> {
        if text.trim().is_empty() {
            return Err(SendError::EmptyMessage);
        }
        let user_id = self.active_user.clone().ok_or(SendError::NoActiveUser)?;
        let model_id = self.active_model.clone().ok_or(SendError::NoActiveModel)?;
        if self.sending {
            debug!("Rejected send while another reply is pending");
            return Err(SendError::AlreadySending);
        }

        let request = ChatRequest {
            message: text.to_string(),
            user_id,
            model_id,
            use_memory: self.memory_enabled,
            history: self.history_payload(),
        };

        self.append_message(Message::user(text));
        self.set_sending(true);
        self.send_sequence += 1;

        debug!(
            sequence = self.send_sequence,
            user = %request.user_id,
            model = %request.model_id,
            use_memory = request.use_memory,
            history_len = request.history.len(),
            "Send started"
        );

        Ok(PendingSend {
            request,
            sequence: self.send_sequence,
        })
    }

    /// Second half of a send: append the reply, or the fixed failure notice,
    /// then lower the in-flight flag.
    pub fn finish_send<E: fmt::Display>(
        &mut self,
        pending: PendingSend,
        outcome: Result<ChatResponse, E>,
    ) {
        match outcome {
            Ok(reply) => {
                debug!(sequence = pending.sequence, "Send finished");
                self.append_message(Message::assistant(reply.response, reply.tool_used));
            }
            Err(err) => {
                info!(sequence = pending.sequence, error = %err, "Send failed");
                self.append_message(Message::send_failure());
            }
        }
        self.set_sending(false);
    }
}

fn non_empty(id: String) -> Option<String> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == id.len() {
        Some(id)
    } else {
        Some(trimmed.to_string())
    }
}
