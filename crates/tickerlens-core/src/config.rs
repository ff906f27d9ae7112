//! Service configuration loaded once at startup.
//!
//! Credentials and tunables are collected into [`ServiceConfig`] and handed
//! to adapter constructors; nothing below this module reads the environment.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::news::DEFAULT_NEWS_LIMIT;
use crate::ConfigError;

pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const MODEL_VAR: &str = "TICKERLENS_MODEL";
pub const TEMPERATURE_VAR: &str = "TICKERLENS_TEMPERATURE";
pub const TIMEOUT_VAR: &str = "TICKERLENS_TIMEOUT_MS";

pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, PartialEq)]
pub struct ServiceConfig {
    pub groq_api_key: Option<String>,
    pub completion_model: String,
    pub temperature: f32,
    pub http_timeout_ms: u64,
    pub news_region: String,
    pub news_max_results: usize,
}

// Keeps the API key out of debug logs.
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("groq_api_key", &self.groq_api_key.as_ref().map(|_| "<redacted>"))
            .field("completion_model", &self.completion_model)
            .field("temperature", &self.temperature)
            .field("http_timeout_ms", &self.http_timeout_ms)
            .field("news_region", &self.news_region)
            .field("news_max_results", &self.news_max_results)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            completion_model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            http_timeout_ms: DEFAULT_TIMEOUT_MS,
            news_region: String::from("wt-wt"),
            news_max_results: DEFAULT_NEWS_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Load `.env` from the working directory (if present), then read the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ServiceConfig::from_env`] with an explicit `.env` file.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        dotenv::from_path(path).map_err(|_| ConfigError::InvalidValue {
            name: "env_file",
            value: path.display().to_string(),
            reason: "file could not be loaded",
        })?;
        Self::from_env()
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            groq_api_key: read(GROQ_API_KEY_VAR).map(|value| value.trim().to_owned()),
            completion_model: read(MODEL_VAR).unwrap_or_else(|| defaults.completion_model.clone()),
            temperature: parse_var(TEMPERATURE_VAR, read(TEMPERATURE_VAR))?
                .unwrap_or(defaults.temperature),
            http_timeout_ms: parse_var(TIMEOUT_VAR, read(TIMEOUT_VAR))?
                .unwrap_or(defaults.http_timeout_ms),
            ..defaults
        })
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.http_timeout_ms = timeout_ms;
        self
    }

    /// Fail fast when the completion credential is absent.
    pub fn require_groq_api_key(&self) -> Result<&str, ConfigError> {
        self.groq_api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                name: GROQ_API_KEY_VAR,
            })
    }
}

fn parse_var<T: FromStr>(name: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "not a number",
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ServiceConfig::from_lookup(lookup(&[])).expect("valid");
        assert_eq!(config.completion_model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.news_max_results, 5);
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn missing_key_fails_fast() {
        let config = ServiceConfig::from_lookup(lookup(&[(GROQ_API_KEY_VAR, "   ")]))
            .expect("valid");
        assert_eq!(
            config.require_groq_api_key(),
            Err(ConfigError::MissingCredential {
                name: GROQ_API_KEY_VAR
            })
        );
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (GROQ_API_KEY_VAR, "gsk-test"),
            (MODEL_VAR, "llama3-70b-8192"),
            (TEMPERATURE_VAR, "0.7"),
            (TIMEOUT_VAR, "2500"),
        ]))
        .expect("valid");

        assert_eq!(config.require_groq_api_key(), Ok("gsk-test"));
        assert_eq!(config.completion_model, "llama3-70b-8192");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.http_timeout_ms, 2500);
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = ServiceConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidValue { name: TIMEOUT_VAR, .. }));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = ServiceConfig::from_lookup(lookup(&[(GROQ_API_KEY_VAR, "gsk-secret")]))
            .expect("valid");
        assert!(!format!("{config:?}").contains("gsk-secret"));
    }

    #[test]
    fn loads_explicit_env_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        std::fs::write(&path, "TICKERLENS_TEST_ONLY_VAR=loaded\n").expect("write");

        ServiceConfig::from_env_file(&path).expect("loads");
        assert_eq!(
            std::env::var("TICKERLENS_TEST_ONLY_VAR").as_deref(),
            Ok("loaded")
        );
    }
}
