//! Content auditing and generation

pub mod content;
pub mod llm;

pub use llm::{ModelInfo, PlaceholderLlmClient, TextGenerator};
