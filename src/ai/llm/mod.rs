//! Remote text generation
//!
//! The generator can delegate copywriting to a language model through
//! [`TextGenerator`]. The shipped client is a placeholder that performs no
//! network I/O, so every call falls back to the built-in templates.

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text completion backend
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`
    fn generate_text(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String>;

    fn model_info(&self) -> ModelInfo;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub provider: String,
    pub max_output_tokens: usize,
}

/// Stand-in client used until a real provider is wired up.
#[derive(Debug, Clone)]
pub struct PlaceholderLlmClient {
    model: String,
    max_tokens: usize,
}

impl PlaceholderLlmClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: LlmConfig::default().max_tokens,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl TextGenerator for PlaceholderLlmClient {
    fn generate_text(&self, prompt: &str, max_tokens: usize, temperature: f32) -> Result<String> {
        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            max_tokens,
            temperature,
            "placeholder text generation requested"
        );
        Err(Error::NotSupported(format!(
            "text generation with '{}' is not configured",
            self.model
        )))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.model.clone(),
            provider: "placeholder".to_string(),
            max_output_tokens: self.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_reports_not_supported() {
        let client = PlaceholderLlmClient::new("gpt-4");
        let result = client.generate_text("Write a description", 500, 0.7);
        assert!(matches!(result, Err(Error::NotSupported(_))));
    }

    #[test]
    fn test_model_info_from_config() {
        let config = LlmConfig {
            model: "gpt-4o".to_string(),
            max_tokens: 300,
            ..LlmConfig::default()
        };
        let info = PlaceholderLlmClient::from_config(&config).model_info();
        assert_eq!(info.name, "gpt-4o");
        assert_eq!(info.provider, "placeholder");
        assert_eq!(info.max_output_tokens, 300);
    }
}
