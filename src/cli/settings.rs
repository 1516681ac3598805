//! `parley set`, `parley unset` and `parley config`.
//!
//! Each key is described once in [`SETTINGS`]: how to parse a value, how to
//! store it, and the default shown when it is unset.

use std::error::Error;
use std::fmt;

use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::theme::{Theme, THEME_NAMES};
use crate::utils::url::is_http_url;

#[derive(Debug, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidBoolean(String),
    InvalidNumber(String),
    InvalidUrl(String),
    UnknownTheme(String),
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => {
                let known: Vec<&str> = SETTINGS.iter().map(|s| s.key).collect();
                write!(f, "Unknown config key: {key} (known: {})", known.join(", "))
            }
            SettingError::InvalidBoolean(input) => write!(
                f,
                "Invalid boolean value: {input}. Use 'on' or 'off' (also accepts true/false, yes/no)"
            ),
            SettingError::InvalidNumber(input) => {
                write!(f, "Invalid number of seconds: {input}")
            }
            SettingError::InvalidUrl(input) => {
                write!(f, "Invalid URL: {input} (expected http:// or https://)")
            }
            SettingError::UnknownTheme(input) => write!(
                f,
                "Unknown theme: {input} (available: {})",
                THEME_NAMES.join(", ")
            ),
        }
    }
}

impl Error for SettingError {}

#[derive(Clone, Copy)]
enum Kind {
    Url,
    Seconds,
    Boolean,
    Theme,
    Text,
}

struct Setting {
    key: &'static str,
    kind: Kind,
    default_display: &'static str,
    apply: fn(&mut Config, Option<String>),
}

const SETTINGS: &[Setting] = &[
    Setting {
        key: "api-base-url",
        kind: Kind::Url,
        default_display: "http://localhost:8000",
        apply: |c, v| c.api_base_url = v,
    },
    Setting {
        key: "request-timeout-secs",
        kind: Kind::Seconds,
        default_display: "60",
        apply: |c, v| c.request_timeout_secs = v.and_then(|v| v.parse().ok()),
    },
    Setting {
        key: "markdown",
        kind: Kind::Boolean,
        default_display: "on",
        apply: |c, v| c.markdown = v.as_deref().and_then(parse_bool),
    },
    Setting {
        key: "theme",
        kind: Kind::Theme,
        default_display: "dark",
        apply: |c, v| c.theme = v,
    },
    Setting {
        key: "default-user",
        kind: Kind::Text,
        default_display: "first listed",
        apply: |c, v| c.default_user = v,
    },
    Setting {
        key: "default-model",
        kind: Kind::Text,
        default_display: "first listed",
        apply: |c, v| c.default_model = v,
    },
];

/// Accepts on/off, true/false, yes/no, 1/0 (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn lookup(key: &str) -> Result<&'static Setting, SettingError> {
    SETTINGS
        .iter()
        .find(|setting| setting.key == key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
}

/// Validate `value` for `key` and store it in `config`.
pub fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<String, SettingError> {
    let setting = lookup(key)?;
    let value = value.trim();
    let stored = match setting.kind {
        Kind::Url if is_http_url(value) => value.to_string(),
        Kind::Url => return Err(SettingError::InvalidUrl(value.to_string())),
        Kind::Seconds => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => secs.to_string(),
            _ => return Err(SettingError::InvalidNumber(value.to_string())),
        },
        Kind::Boolean => match parse_bool(value) {
            Some(true) => "on".to_string(),
            Some(false) => "off".to_string(),
            None => return Err(SettingError::InvalidBoolean(value.to_string())),
        },
        Kind::Theme if Theme::find(value).is_some() => value.to_ascii_lowercase(),
        Kind::Theme => return Err(SettingError::UnknownTheme(value.to_string())),
        Kind::Text => value.to_string(),
    };
    (setting.apply)(config, Some(stored.clone()));
    Ok(format!("✅ Set {} to: {stored}", setting.key))
}

pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    let setting = lookup(key)?;
    (setting.apply)(config, None);
    Ok(format!(
        "✅ Unset {} (will use default: {})",
        setting.key, setting.default_display
    ))
}

pub fn set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let message = apply_set(&mut config, key, value)?;
    config.save()?;
    println!("{message}");
    Ok(())
}

pub fn unset(key: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let message = apply_unset(&mut config, key)?;
    config.save()?;
    println!("{message}");
    Ok(())
}

/// Print local settings, then what the backend offers.
pub async fn show(ctx: &Context) -> Result<(), Box<dyn Error>> {
    ctx.config.print_all();
    println!();

    let backend = ctx.backend();
    let (state, status) = ctx.connect(&backend).await;
    let config = state.config();
    println!("Backend {} ({}):", ctx.api_url, status.label());
    println!("  users: {}", config.users.join(", "));
    println!("  models: {}", config.models.join(", "));
    println!("  features: {}", config.features.join(", "));
    println!(
        "  selected: {} / {}",
        state.active_user().unwrap_or("(none)"),
        state.active_model().unwrap_or("(none)")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_and_normalizes() {
        let mut config = Config::default();
        assert_eq!(
            apply_set(&mut config, "markdown", "No").unwrap(),
            "✅ Set markdown to: off"
        );
        assert_eq!(config.markdown, Some(false));

        apply_set(&mut config, "request-timeout-secs", "15").unwrap();
        assert_eq!(config.request_timeout_secs, Some(15));

        apply_set(&mut config, "theme", "Light").unwrap();
        assert_eq!(config.theme.as_deref(), Some("light"));

        apply_set(&mut config, "default-user", " Eve ").unwrap();
        assert_eq!(config.default_user.as_deref(), Some("Eve"));

        apply_set(&mut config, "api-base-url", "https://chat.example.org").unwrap();
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://chat.example.org")
        );
    }

    #[test]
    fn invalid_values_leave_config_alone() {
        let mut config = Config::default();
        assert_eq!(
            apply_set(&mut config, "markdown", "maybe"),
            Err(SettingError::InvalidBoolean("maybe".into()))
        );
        assert_eq!(
            apply_set(&mut config, "request-timeout-secs", "0"),
            Err(SettingError::InvalidNumber("0".into()))
        );
        assert_eq!(
            apply_set(&mut config, "theme", "solarized"),
            Err(SettingError::UnknownTheme("solarized".into()))
        );
        assert_eq!(
            apply_set(&mut config, "api-base-url", "localhost"),
            Err(SettingError::InvalidUrl("localhost".into()))
        );
        assert_eq!(
            apply_set(&mut config, "colour", "red"),
            Err(SettingError::UnknownKey("colour".into()))
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unset_clears_field() {
        let mut config = Config {
            default_model: Some("GPT-4".into()),
            ..Config::default()
        };
        assert_eq!(
            apply_unset(&mut config, "default-model").unwrap(),
            "✅ Unset default-model (will use default: first listed)"
        );
        assert_eq!(config.default_model, None);
    }
}
