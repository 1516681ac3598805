//! Drives the backend exchanges against a [`ConversationState`].

use std::time::Duration;

use tracing::{info, warn};

use crate::core::backend::{BackendError, ChatBackend};
use crate::core::config::BackendConfig;
use crate::core::conversation::{ConversationState, SendError};

/// Reachability of the backend as observed by the config fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Checking,
    Connected,
    Disconnected,
}

impl ApiStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Connected => "connected",
            ApiStatus::Disconnected => "disconnected",
        }
    }
}

/// Identity and model to prefer over the first listed entries.
#[derive(Debug, Clone, Default)]
pub struct StartupSelection {
    pub user: Option<String>,
    pub model: Option<String>,
}

/// Load the backend configuration into `state` and pick an initial user and
/// model. A failed fetch installs [`BackendConfig::fallback`] instead.
pub async fn bootstrap(
    state: &mut ConversationState,
    backend: &dyn ChatBackend,
    selection: &StartupSelection,
) -> ApiStatus {
    let (config, status) = match backend.fetch_config().await {
        Ok(config) => {
            info!(
                users = config.users.len(),
                models = config.models.len(),
                "Loaded backend config"
            );
            (config, ApiStatus::Connected)
        }
        Err(err) => {
            warn!(error = %err, "Failed to fetch config; using fallback");
            (BackendConfig::fallback(), ApiStatus::Disconnected)
        }
    };

    let user = pick(&config.users, selection.user.as_deref());
    let model = pick(&config.models, selection.model.as_deref());
    state.set_config(config);
    if let Some(user) = user {
        state.set_active_user(user);
    }
    if let Some(model) = model {
        state.set_active_model(model);
    }
    status
}

fn pick(listed: &[String], preferred: Option<&str>) -> Option<String> {
    preferred
        .and_then(|wanted| listed.iter().find(|item| item.as_str() == wanted))
        .or_else(|| listed.first())
        .cloned()
}

/// Run one full send: append the user's text, wait for the backend (bounded
/// by `timeout`), then append the reply or the failure notice.
///
/// Returns an error only when the send is refused up front; backend
/// failures end up in the transcript.
pub async fn send_message(
    state: &mut ConversationState,
    backend: &dyn ChatBackend,
    text: &str,
    timeout: Duration,
) -> Result<(), SendError> {
    let pending = state.begin_send(text)?;
    let outcome = match tokio::time::timeout(timeout, backend.send_chat(pending.request())).await
    {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout),
    };
    state.finish_send(pending, outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatRequest, ChatResponse};
    use crate::core::message::SEND_FAILURE_NOTICE;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        config: Option<BackendConfig>,
        reply: Option<ChatResponse>,
        delay: Option<Duration>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn fetch_config(&self) -> Result<BackendConfig, BackendError> {
            self.config.clone().ok_or(BackendError::Status {
                status: 503,
                body: String::new(),
            })
        }

        async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().ok_or(BackendError::Status {
                status: 500,
                body: "Internal Server Error".into(),
            })
        }
    }

    fn hr_config() -> BackendConfig {
        BackendConfig {
            models: vec!["llama3".into(), "gpt-4o".into()],
            users: vec!["Mallory".into(), "Trent".into()],
            features: vec![],
        }
    }

    #[tokio::test]
    async fn bootstrap_selects_first_entries() {
        let backend = FakeBackend {
            config: Some(hr_config()),
            ..Default::default()
        };
        let mut state = ConversationState::new();
        let status = bootstrap(&mut state, &backend, &StartupSelection::default()).await;
        assert_eq!(status, ApiStatus::Connected);
        assert_eq!(state.active_user(), Some("Mallory"));
        assert_eq!(state.active_model(), Some("llama3"));
        assert!(!state.config().memory_toggle_enabled());
    }

    #[tokio::test]
    async fn bootstrap_honours_listed_preferences() {
        let backend = FakeBackend {
            config: Some(hr_config()),
            ..Default::default()
        };
        let mut state = ConversationState::new();
        let selection = StartupSelection {
            user: Some("Trent".into()),
            model: Some("not-listed".into()),
        };
        bootstrap(&mut state, &backend, &selection).await;
        assert_eq!(state.active_user(), Some("Trent"));
        assert_eq!(state.active_model(), Some("llama3"));
    }

    #[tokio::test]
    async fn bootstrap_falls_back_when_unreachable() {
        let backend = FakeBackend::default();
        let mut state = ConversationState::new();
        let status = bootstrap(&mut state, &backend, &StartupSelection::default()).await;
        assert_eq!(status, ApiStatus::Disconnected);
        assert_eq!(state.config(), &BackendConfig::fallback());
        assert_eq!(state.active_user(), Some("Alice"));
        assert_eq!(state.active_model(), Some("Ollama"));
    }

    #[tokio::test]
    async fn successful_send_round_trip() {
        let backend = FakeBackend {
            reply: Some(ChatResponse {
                response: "**Hi** Alice".into(),
                tool_used: Some("directory".into()),
            }),
            ..Default::default()
        };
        let mut state = ConversationState::new();
        state.set_active_user("Alice");
        state.set_active_model("Ollama");

        send_message(&mut state, &backend, "hello", Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!state.is_sending());
        assert_eq!(state.messages().len(), 2);
        assert!(state.messages()[0].is_user());
        assert_eq!(state.messages()[1].content, "**Hi** Alice");
        assert_eq!(state.messages()[1].tool_used.as_deref(), Some("directory"));

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user_id, "Alice");
        assert_eq!(seen[0].model_id, "Ollama");
        assert!(seen[0].history.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_becomes_notice() {
        let backend = FakeBackend::default();
        let mut state = ConversationState::new();
        state.set_active_user("Alice");
        state.set_active_model("Ollama");

        send_message(&mut state, &backend, "hello", Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!state.is_sending());
        assert_eq!(state.messages().len(), 2);
        let notice = &state.messages()[1];
        assert!(notice.is_error);
        assert_eq!(notice.content, SEND_FAILURE_NOTICE);
    }

    #[tokio::test]
    async fn slow_backend_times_out_as_failure() {
        let backend = FakeBackend {
            reply: Some(ChatResponse {
                response: "too late".into(),
                tool_used: None,
            }),
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let mut state = ConversationState::new();
        state.set_active_user("Alice");
        state.set_active_model("Ollama");

        send_message(&mut state, &backend, "hello", Duration::from_millis(20))
            .await
            .unwrap();

        assert!(!state.is_sending());
        assert_eq!(state.messages().len(), 2);
        assert!(state.messages()[1].is_error);
    }

    #[tokio::test]
    async fn refused_send_touches_nothing() {
        let backend = FakeBackend::default();
        let mut state = ConversationState::new();
        let err = send_message(&mut state, &backend, "hello", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, SendError::NoActiveUser);
        assert!(state.messages().is_empty());
        assert!(backend.seen.lock().unwrap().is_empty());
    }
}
