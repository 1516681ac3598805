//! Backend-supplied configuration: which identities and models exist and
//! which optional features the client should expose.

use crate::api::ConfigResponse;

/// Feature flag that exposes the conversation memory toggle.
pub const MEMORY_TOGGLE_FEATURE: &str = "memory_toggle";

const FALLBACK_MODELS: &[&str] = &["Ollama", "GPT-4"];
const FALLBACK_USERS: &[&str] = &["Alice", "Bob", "Eve"];
const FALLBACK_FEATURES: &[&str] = &[MEMORY_TOGGLE_FEATURE];

/// Read-only to the conversation; replaced wholesale.
///
/// `Default` is the empty configuration: no users, no models, no features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    pub models: Vec<String>,
    pub users: Vec<String>,
    pub features: Vec<String>,
}

impl BackendConfig {
    /// Placeholder lists installed when `GET /config` fails, so a user and
    /// model can still be selected.
    pub fn fallback() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|item| item.to_string()).collect()
        }
        Self {
            models: owned(FALLBACK_MODELS),
            users: owned(FALLBACK_USERS),
            features: owned(FALLBACK_FEATURES),
        }
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|feature| feature == name)
    }

    pub fn memory_toggle_enabled(&self) -> bool {
        self.has_feature(MEMORY_TOGGLE_FEATURE)
    }

    pub fn has_user(&self, id: &str) -> bool {
        self.users.iter().any(|user| user == id)
    }

    pub fn has_model(&self, id: &str) -> bool {
        self.models.iter().any(|model| model == id)
    }
}

impl From<ConfigResponse> for BackendConfig {
    fn from(response: ConfigResponse) -> Self {
        fn cleaned(items: Vec<String>) -> Vec<String> {
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        }
        Self {
            models: cleaned(response.models),
            users: cleaned(response.users),
            features: cleaned(response.features),
        }
    }
}
