use log::info;

pub const HOST_VAR: &str = "STARHAUL_FALLBACK_HOST";
pub const MODEL_VAR: &str = "STARHAUL_FALLBACK_MODEL";
pub const API_KEY_VAR: &str = "STARHAUL_FALLBACK_API_KEY";

/// Connection settings for the generative fallback service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackConfig {
    pub host: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl FallbackConfig {
    /// Read the fallback settings from the process environment.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing or blank host or model disables
    /// the fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let (Some(host), Some(model)) = (read(HOST_VAR), read(MODEL_VAR)) else {
            info!("generative fallback disabled: {HOST_VAR} or {MODEL_VAR} not set");
            return None;
        };
        Some(Self {
            host,
            model,
            api_key: read(API_KEY_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn host_and_model_enable_fallback() {
        let config = FallbackConfig::from_lookup(lookup(&[
            (HOST_VAR, "http://127.0.0.1:11434"),
            (MODEL_VAR, "llama3"),
        ]))
        .unwrap();
        assert_eq!(config.model, "llama3");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn missing_or_blank_settings_disable_fallback() {
        assert!(FallbackConfig::from_lookup(lookup(&[(MODEL_VAR, "llama3")])).is_none());
        assert!(
            FallbackConfig::from_lookup(lookup(&[(HOST_VAR, "localhost"), (MODEL_VAR, "  ")]))
                .is_none()
        );
    }

    #[test]
    fn api_key_is_optional_but_kept() {
        let config = FallbackConfig::from_lookup(lookup(&[
            (HOST_VAR, "localhost"),
            (MODEL_VAR, "llama3"),
            (API_KEY_VAR, "secret"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
