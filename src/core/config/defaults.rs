use crate::core::config::data::Config;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const API_BASE_URL_ENV: &str = "PARLEY_API_URL";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

impl Config {
    /// Resolve the backend URL: explicit override, then environment, then
    /// the settings file, then the built-in default.
    pub fn resolved_api_base_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(API_BASE_URL_ENV).ok();
        Self::pick_api_base_url(cli_override, env_value.as_deref(), self.api_base_url.as_deref())
    }

    pub(crate) fn pick_api_base_url(
        cli_override: Option<&str>,
        env_value: Option<&str>,
        configured: Option<&str>,
    ) -> String {
        [cli_override, env_value, configured]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }
}
