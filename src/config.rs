//! Application configuration.
//!
//! Layering, later sources win:
//! 1. built-in defaults (`AppConfig::default()`)
//! 2. TOML file (explicit path, else `shop-content.toml` / `config/shop-content.toml`)
//! 3. environment variables, e.g. `SHOP_CONTENT_SERVER__LOG_LEVEL=debug`

use crate::error::{Error, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    pub name: String,
    pub log_level: String,
    pub log_to_file: bool,
    pub log_dir: Option<PathBuf>,
    /// "text" or "json"
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            log_level: "info".to_string(),
            log_to_file: false,
            log_dir: None,
            log_format: "text".to_string(),
        }
    }
}

/// Thresholds and word lists for the content checker.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RuleConfig {
    pub min_description_length: usize,
    pub min_seo_title_length: usize,
    /// Inclusive [min, max] character window for the SEO description
    pub seo_description_range: [usize; 2],
    pub vague_words: Vec<String>,
    pub premium_words: Vec<String>,
    pub cta_phrases: Vec<String>,
    /// Empty disables the benefit-language rule
    #[serde(default)]
    pub benefit_words: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_description_length: 100,
            min_seo_title_length: 30,
            seo_description_range: [80, 160],
            vague_words: to_strings(&["good", "nice", "stuff", "things", "really"]),
            premium_words: to_strings(&[
                "premium",
                "luxury",
                "exclusive",
                "professional",
                "exceptional",
                "crafted",
            ]),
            cta_phrases: to_strings(&[
                "shop now",
                "buy",
                "order",
                "discover",
                "experience",
                "transform",
                "elevate",
            ]),
            benefit_words: Vec::new(),
        }
    }
}

impl RuleConfig {
    /// Standard benefit vocabulary, for opting into the
    /// benefit-language rule.
    pub fn default_benefit_words() -> Vec<String> {
        to_strings(&[
            "benefits", "results", "improves", "enhances", "reduces", "promotes",
        ])
    }

    pub fn with_benefit_words(mut self, words: Vec<String>) -> Self {
        self.benefit_words = words;
        self
    }

    pub fn seo_description_min(&self) -> usize {
        self.seo_description_range[0]
    }

    pub fn seo_description_max(&self) -> usize {
        self.seo_description_range[1]
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_description_length == 0 {
            return Err(Error::InvalidConfiguration(
                "rules.min_description_length must be greater than 0".to_string(),
            ));
        }
        if self.seo_description_min() > self.seo_description_max() {
            return Err(Error::InvalidConfiguration(format!(
                "rules.seo_description_range is inverted: [{}, {}]",
                self.seo_description_min(),
                self.seo_description_max()
            )));
        }
        if self.premium_words.iter().all(|w| w.trim().is_empty()) {
            return Err(Error::InvalidConfiguration(
                "rules.premium_words must contain at least one word".to_string(),
            ));
        }
        if self.cta_phrases.iter().all(|w| w.trim().is_empty()) {
            return Err(Error::InvalidConfiguration(
                "rules.cta_phrases must contain at least one phrase".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Remote text generation. Disabled unless explicitly turned on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LlmConfig {
    pub enabled: bool,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-4".to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                tracing::debug!("Loading config file {}", path.display());
                builder = builder.add_source(File::from(path));
            }
            None => {
                builder = builder
                    .add_source(File::with_name("shop-content").required(false))
                    .add_source(File::with_name("config/shop-content").required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("SHOP_CONTENT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        if !(0.0..=2.0).contains(&self.generator.llm.temperature) {
            return Err(Error::InvalidConfiguration(format!(
                "generator.llm.temperature must be within 0.0-2.0, got {}",
                self.generator.llm.temperature
            )));
        }
        Ok(())
    }

    /// Write an annotated sample configuration file.
    pub fn generate_sample_config(path: &Path) -> Result<()> {
        let toml_content = toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| Error::Config(e.to_string()))?;

        let sample_content = format!(
            r#"# shop-content-mcp configuration
#
# Save as shop-content.toml, or pass with --config.
# Environment overrides use the SHOP_CONTENT_ prefix and "__" between
# sections, e.g. SHOP_CONTENT_SERVER__LOG_LEVEL=debug

{}
# [server]
# log_level   = trace, debug, info, warn, error
# log_to_file = also write a daily rolling log under log_dir
# log_format  = text or json
#
# [rules]
# seo_description_range = inclusive [min, max] characters
# benefit_words         = leave empty to disable the benefit-language check
#
# [generator.llm]
# enabled = delegate text to the remote generator before falling back to templates
"#,
            toml_content
        );

        std::fs::write(path, sample_content)?;
        tracing::info!("Sample config written to {}", path.display());
        Ok(())
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
