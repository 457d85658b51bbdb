use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use teloxide::types::ChatId;

use crate::deepseek::{self, CompletionSettings};

pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the settings file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// A required environment variable is unset or empty.
    MissingEnv(&'static str),
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read settings file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse settings file '{}': {}", path.display(), source)
            }
            Self::MissingEnv(name) => write!(f, "environment variable {} is required", name),
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::MissingEnv(_) | Self::Validation(_) => None,
        }
    }
}

/// Non-secret settings. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    /// Chat-completions base URL (OpenAI-compatible).
    deepseek_base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    /// Directory for logs. Defaults to current directory.
    data_dir: Option<String>,
    /// Chat that receives WARN/ERROR log lines.
    log_chat_id: Option<i64>,
    /// Minutes of silence before a session is dropped (0 = never).
    session_idle_minutes: Option<u32>,
}

fn default_session_idle_minutes() -> u32 {
    12 * 60
}

pub struct Config {
    pub bot_token: String,
    pub deepseek_api_key: String,
    pub completion: CompletionSettings,
    pub data_dir: PathBuf,
    pub log_chat_id: Option<ChatId>,
    pub session_idle_minutes: u32,
}

impl Config {
    /// Load from the process environment plus an optional settings file.
    ///
    /// `required` controls whether a missing settings file is an error.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self, ConfigError> {
        Self::load_with(path, required, |name| std::env::var(name).ok())
    }

    fn load_with<P, F>(path: P, required: bool, env: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref().to_path_buf();
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<SettingsFile>(&content)
                .map_err(|e| ConfigError::ParseJson { path: path.clone(), source: e })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => SettingsFile::default(),
            Err(e) => return Err(ConfigError::ReadFile { path, source: e }),
        };

        let bot_token = require_env(&env, BOT_TOKEN_VAR)?;
        let deepseek_api_key = require_env(&env, API_KEY_VAR)?;

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(format!(
                "{BOT_TOKEN_VAR} appears invalid (expected format: 123456789:ABCdefGHI...)"
            )));
        }

        let defaults = CompletionSettings::default();
        let completion = CompletionSettings {
            base_url: file.deepseek_base_url.unwrap_or(defaults.base_url),
            model: file.model.unwrap_or(defaults.model),
            temperature: file.temperature.unwrap_or(defaults.temperature),
            max_tokens: file.max_tokens.unwrap_or(defaults.max_tokens),
        };
        if !(0.0..=2.0).contains(&completion.temperature) {
            return Err(ConfigError::Validation("temperature must be between 0.0 and 2.0".into()));
        }
        if completion.max_tokens == 0 {
            return Err(ConfigError::Validation("max_tokens must be positive".into()));
        }
        if completion.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must not be empty".into()));
        }
        if !completion.base_url.starts_with("http://") && !completion.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "deepseek_base_url must be an http(s) URL (default {})",
                deepseek::DEFAULT_BASE_URL
            )));
        }

        Ok(Self {
            bot_token,
            deepseek_api_key,
            completion,
            data_dir: file.data_dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            log_chat_id: file.log_chat_id.map(ChatId),
            session_idle_minutes: file.session_idle_minutes.unwrap_or_else(default_session_idle_minutes),
        })
    }

    /// API key with everything but the first few characters hidden.
    pub fn masked_api_key(&self) -> String {
        let prefix: String = self.deepseek_api_key.chars().take(4).collect();
        format!("{prefix}…")
    }
}

fn require_env<F: Fn(&str) -> Option<String>>(env: &F, name: &'static str) -> Result<String, ConfigError> {
    env(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOKEN: &str = "123456789:ABCdefGHIjklMNOpqrsTUVwxyz";

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    fn full_env() -> impl Fn(&str) -> Option<String> {
        env(&[(BOT_TOKEN_VAR, TOKEN), (API_KEY_VAR, "sk-abcdef123456")])
    }

    fn assert_err<T>(result: Result<T, ConfigError>) -> ConfigError {
        match result {
            Ok(_) => panic!("expected error, got Ok"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let config = Config::load_with("/nonexistent/anna.json", false, full_env()).expect("should load");
        assert_eq!(config.bot_token, TOKEN);
        assert_eq!(config.completion.model, "deepseek-chat");
        assert_eq!(config.completion.base_url, "https://api.deepseek.com");
        assert_eq!(config.completion.max_tokens, 500);
        assert!((config.completion.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.log_chat_id, None);
        assert_eq!(config.session_idle_minutes, 720);
    }

    #[test]
    fn test_settings_file_overrides() {
        let file = write_settings(r#"{
            "model": "deepseek-reasoner",
            "temperature": 0.2,
            "max_tokens": 800,
            "data_dir": "/var/lib/anna",
            "log_chat_id": -100123,
            "session_idle_minutes": 0
        }"#);
        let config = Config::load_with(file.path(), true, full_env()).expect("should load");
        assert_eq!(config.completion.model, "deepseek-reasoner");
        assert_eq!(config.completion.max_tokens, 800);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/anna"));
        assert_eq!(config.log_chat_id, Some(ChatId(-100123)));
        assert_eq!(config.session_idle_minutes, 0);
    }

    #[test]
    fn test_missing_bot_token() {
        let err = assert_err(Config::load_with("/nonexistent", false, env(&[(API_KEY_VAR, "sk-1")])));
        assert!(matches!(err, ConfigError::MissingEnv(BOT_TOKEN_VAR)));
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = assert_err(Config::load_with("/nonexistent", false, env(&[(BOT_TOKEN_VAR, TOKEN)])));
        assert!(matches!(err, ConfigError::MissingEnv(API_KEY_VAR)));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = assert_err(Config::load_with(
            "/nonexistent",
            false,
            env(&[(BOT_TOKEN_VAR, TOKEN), (API_KEY_VAR, "  ")]),
        ));
        assert!(matches!(err, ConfigError::MissingEnv(API_KEY_VAR)));
    }

    #[test]
    fn test_invalid_token_format_no_colon() {
        let err = assert_err(Config::load_with(
            "/nonexistent",
            false,
            env(&[(BOT_TOKEN_VAR, "invalid_token_no_colon"), (API_KEY_VAR, "sk-1")]),
        ));
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_invalid_token_format_non_numeric_id() {
        let err = assert_err(Config::load_with(
            "/nonexistent",
            false,
            env(&[(BOT_TOKEN_VAR, "notanumber:ABCdef"), (API_KEY_VAR, "sk-1")]),
        ));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_token_format_empty_secret() {
        let err = assert_err(Config::load_with(
            "/nonexistent",
            false,
            env(&[(BOT_TOKEN_VAR, "123456789:"), (API_KEY_VAR, "sk-1")]),
        ));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_temperature_out_of_range() {
        let file = write_settings(r#"{ "temperature": 3.5 }"#);
        let err = assert_err(Config::load_with(file.path(), true, full_env()));
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_zero_max_tokens() {
        let file = write_settings(r#"{ "max_tokens": 0 }"#);
        let err = assert_err(Config::load_with(file.path(), true, full_env()));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_base_url() {
        let file = write_settings(r#"{ "deepseek_base_url": "api.deepseek.com" }"#);
        let err = assert_err(Config::load_with(file.path(), true, full_env()));
        assert!(err.to_string().contains("deepseek_base_url"));
    }

    #[test]
    fn test_required_file_not_found() {
        let err = assert_err(Config::load_with("/nonexistent/path/anna.json", true, full_env()));
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_settings("{ invalid json }");
        let err = assert_err(Config::load_with(file.path(), false, full_env()));
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = write_settings(r#"{ "modle": "typo" }"#);
        let err = assert_err(Config::load_with(file.path(), true, full_env()));
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }

    #[test]
    fn test_masked_api_key() {
        let config = Config::load_with("/nonexistent", false, full_env()).unwrap();
        assert_eq!(config.masked_api_key(), "sk-a…");
        assert!(!config.masked_api_key().contains("123456"));
    }
}
