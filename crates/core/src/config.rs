//! Run settings: collaborator credentials and the limits that shape each stage.

use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GOOGLE_SEARCH_ENGINE_ID: &str = "GOOGLE_SEARCH_ENGINE_ID";
pub const GOOGLE_SEARCH_ENDPOINT: &str = "GOOGLE_SEARCH_ENDPOINT";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// API keys for the search and model collaborators.
#[derive(Clone)]
pub struct Credentials {
    pub search_api_key: String,
    pub search_engine_id: String,
    pub model_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("search_api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .field("model_api_key", &"<redacted>")
            .finish()
    }
}

/// Limits for the page scan.
#[derive(Debug, Clone)]
pub struct ExtractionLimits {
    /// Excerpts kept before the scan stops.
    pub max_excerpts: usize,
    /// Candidates considered at most, regardless of how many the search returned.
    pub scan_limit: usize,
    /// Characters kept per page.
    pub clip_chars: usize,
    /// Per-page fetch timeout.
    pub fetch_timeout: Duration,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_excerpts: 5,
            scan_limit: 10,
            clip_chars: 4000,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Per-field bounds applied when excerpts are serialized into the prompt.
#[derive(Debug, Clone)]
pub struct SourceBudget {
    pub max_sources: usize,
    pub title_chars: usize,
    pub url_chars: usize,
    pub extract_chars: usize,
}

impl Default for SourceBudget {
    fn default() -> Self {
        Self {
            max_sources: 5,
            title_chars: 200,
            url_chars: 1000,
            extract_chars: 2500,
        }
    }
}

/// Sampling options for the outline request.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 1200,
        }
    }
}

/// Everything a run needs, resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub search_endpoint: String,
    pub model_base_url: String,
    pub extraction: ExtractionLimits,
    pub budget: SourceBudget,
    pub generation: GenerationOptions,
}

impl Settings {
    /// Load settings from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Configuration(format!("{} must be set", key)))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let credentials = Credentials {
            search_api_key: required(GOOGLE_API_KEY)?,
            search_engine_id: required(GOOGLE_SEARCH_ENGINE_ID)?,
            model_api_key: required(OPENAI_API_KEY)?,
        };

        Ok(Self {
            credentials,
            search_endpoint: optional(GOOGLE_SEARCH_ENDPOINT, DEFAULT_SEARCH_ENDPOINT),
            model_base_url: optional(OPENAI_BASE_URL, DEFAULT_MODEL_BASE_URL),
            extraction: ExtractionLimits::default(),
            budget: SourceBudget::default(),
            generation: GenerationOptions {
                model: optional(OPENAI_MODEL, DEFAULT_MODEL),
                ..GenerationOptions::default()
            },
        })
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.generation.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete() -> HashMap<String, String> {
        env(&[
            (GOOGLE_API_KEY, "g-key"),
            (GOOGLE_SEARCH_ENGINE_ID, "cx-id"),
            (OPENAI_API_KEY, "sk-test"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let vars = complete();
        let settings = Settings::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.credentials.search_engine_id, "cx-id");
        assert_eq!(settings.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(settings.model_base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(settings.generation.model, "gpt-4o-mini");
        assert_eq!(settings.generation.max_tokens, 1200);
        assert_eq!(settings.extraction.max_excerpts, 5);
        assert_eq!(settings.extraction.scan_limit, 10);
        assert_eq!(settings.extraction.clip_chars, 4000);
        assert_eq!(settings.extraction.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_key_names_variable() {
        let mut vars = complete();
        vars.remove(OPENAI_API_KEY);

        let err = Settings::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains(OPENAI_API_KEY));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut vars = complete();
        vars.insert(GOOGLE_API_KEY.to_string(), "   ".to_string());

        let err = Settings::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains(GOOGLE_API_KEY));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = complete();
        vars.insert(OPENAI_MODEL.to_string(), "gpt-4o".to_string());
        vars.insert(OPENAI_BASE_URL.to_string(), "http://localhost:8080/v1".to_string());

        let settings = Settings::from_lookup(|k| vars.get(k).cloned())
            .unwrap()
            .with_model("gpt-4.1-mini");

        assert_eq!(settings.generation.model, "gpt-4.1-mini");
        assert_eq!(settings.model_base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let vars = complete();
        let settings = Settings::from_lookup(|k| vars.get(k).cloned()).unwrap();
        let debug = format!("{:?}", settings.credentials);

        assert!(!debug.contains("sk-test"));
        assert!(!debug.contains("g-key"));
        assert!(debug.contains("cx-id"));
    }
}
