use serde::Deserialize;

use crate::error::ChatError;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Supports ${ENV_VAR} substitution
    #[serde(default)]
    pub api_key: String,
    /// Omitted from the request when unset (API default applies)
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// No client-side timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            model: default_model(),
            api_key: String::new(),
            max_output_tokens: None,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses config text, expanding environment variables like ${GEMINI_API_KEY}
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let expanded = shellexpand::env(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Resolves the API credential: config value first, then the
    /// GEMINI_API_KEY environment variable. Empty counts as absent.
    pub fn resolve_api_key(&self) -> Result<String, ChatError> {
        if !self.llm.api_key.is_empty() {
            return Ok(self.llm.api_key.clone());
        }
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(ChatError::MissingCredential),
        }
    }

    /// Human-readable description of the timeout policy
    pub fn timeout_description(&self) -> String {
        match self.llm.request_timeout_secs {
            Some(secs) => format!("{secs}s"),
            None => "none".to_string(),
        }
    }
}
