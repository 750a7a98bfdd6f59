//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    /// HTTP listen port.
    pub port: u16,
    pub db_path: PathBuf,
    /// Upper bound on one sentiment classifier call before the keyword
    /// fallback takes over.
    pub sentiment_timeout: Duration,
    /// When set, logs are also written to a daily rolling file here.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".into()))?;

        let model = lookup("FRIEND_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let port = parse_or(&lookup, "FRIEND_AI_PORT", 8080u16)?;
        let db_path = lookup("FRIEND_AI_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/friend-ai.db"));
        let sentiment_timeout_secs = parse_or(&lookup, "FRIEND_AI_SENTIMENT_TIMEOUT_SECS", 30u64)?;
        let llm_timeout_secs = parse_or(&lookup, "FRIEND_AI_LLM_TIMEOUT_SECS", 60u64)?;
        let log_dir = lookup("FRIEND_AI_LOG_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            llm: LlmConfig {
                api_key: SecretString::from(api_key),
                model,
                request_timeout: Duration::from_secs(llm_timeout_secs),
            },
            port,
            db_path,
            sentiment_timeout: Duration::from_secs(sentiment_timeout_secs),
            log_dir,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}': {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("ANTHROPIC_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.llm.api_key.expose_secret(), "sk-test");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, PathBuf::from("./data/friend-ai.db"));
        assert_eq!(config.sentiment_timeout, Duration::from_secs(30));
        assert_eq!(config.llm.request_timeout, Duration::from_secs(60));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_apply() {
        let config = config(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("FRIEND_AI_MODEL", "claude-haiku"),
            ("FRIEND_AI_PORT", "9000"),
            ("FRIEND_AI_DB_PATH", "/tmp/f.db"),
            ("FRIEND_AI_SENTIMENT_TIMEOUT_SECS", "5"),
            ("FRIEND_AI_LOG_DIR", "/var/log/friend-ai"),
        ])
        .unwrap();
        assert_eq!(config.llm.model, "claude-haiku");
        assert_eq!(config.port, 9000);
        assert_eq!(config.sentiment_timeout, Duration::from_secs(5));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/friend-ai")));
    }

    #[test]
    fn missing_key_is_an_error() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::MissingEnvVar(key)) if key == "ANTHROPIC_API_KEY"
        ));
        assert!(matches!(
            config(&[("ANTHROPIC_API_KEY", "  ")]),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let err = config(&[("ANTHROPIC_API_KEY", "k"), ("FRIEND_AI_PORT", "eighty")]).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "FRIEND_AI_PORT"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
