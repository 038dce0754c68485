use crate::{LLMError, LLMResult};
use reqwest::Url;
use std::{str::FromStr, time::Duration};

pub const DEFAULT_OLLAMA_API_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:4b";
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 180;

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub api_url: Url,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            api_url: Url::from_str(DEFAULT_OLLAMA_API_URL).expect("default url is valid"),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_OLLAMA_TIMEOUT_SECS),
        }
    }
}

impl OllamaConfig {
    /// Reads `OLLAMA_API_URL`, `OLLAMA_MODEL` and `OLLAMA_TIMEOUT_SECS`.
    pub fn from_env() -> LLMResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LLMResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("OLLAMA_API_URL") {
            config.api_url =
                Url::from_str(&url).map_err(|e| LLMError::InvalidUrl(url, e.to_string()))?;
        }

        if let Some(model) = lookup("OLLAMA_MODEL") {
            if model.trim().is_empty() {
                return Err(LLMError::InvalidConfig {
                    key: "OLLAMA_MODEL",
                    value: model,
                });
            }
            config.model = model;
        }

        if let Some(secs) = lookup("OLLAMA_TIMEOUT_SECS") {
            let parsed = secs.parse::<u64>().map_err(|_| LLMError::InvalidConfig {
                key: "OLLAMA_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = OllamaConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, OllamaConfig::default());
        assert_eq!(config.api_url.as_str(), DEFAULT_OLLAMA_API_URL);
        assert_eq!(config.model, "gemma3:4b");
        assert_eq!(config.timeout, Duration::from_secs(180));
    }

    #[test]
    fn env_overrides() {
        let config = OllamaConfig::from_lookup(lookup_from(&[
            ("OLLAMA_API_URL", "http://10.0.0.2:11434/api/generate"),
            ("OLLAMA_MODEL", "qwen2:0.5b"),
            ("OLLAMA_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.host_str(), Some("10.0.0.2"));
        assert_eq!(config.model, "qwen2:0.5b");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_API_URL", "not a url")])),
            Err(LLMError::InvalidUrl(..))
        ));
        assert!(matches!(
            OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_TIMEOUT_SECS", "soon")])),
            Err(LLMError::InvalidConfig {
                key: "OLLAMA_TIMEOUT_SECS",
                ..
            })
        ));
        assert!(matches!(
            OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_MODEL", " ")])),
            Err(LLMError::InvalidConfig { .. })
        ));
    }
}
