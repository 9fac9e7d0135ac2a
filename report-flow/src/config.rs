use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the Gemini generation service.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub search_grounding: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("search_grounding", &self.search_grounding)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search_grounding: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads the process environment. A missing API key is an error here so
    /// that binaries can refuse to start without one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(endpoint) = lookup("GEMINI_API_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(flag) = lookup("GEMINI_SEARCH_GROUNDING") {
            config.search_grounding = parse_flag("GEMINI_SEARCH_GROUNDING", &flag)?;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "GEMINI_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn generate_url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = GeminiConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(API_KEY_VAR)));

        let blank = GeminiConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = GeminiConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.search_grounding);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn overrides_are_read() {
        let config = GeminiConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_API_ENDPOINT", "http://localhost:8080/models/"),
            ("GEMINI_SEARCH_GROUNDING", "true"),
            ("GEMINI_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/models/gemini-2.5-pro:generateContent"
        );
        assert!(config.search_grounding);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_flag_is_rejected() {
        let err = GeminiConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            ("GEMINI_SEARCH_GROUNDING", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn debug_output_hides_key() {
        let config = GeminiConfig::new("top-secret");
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
