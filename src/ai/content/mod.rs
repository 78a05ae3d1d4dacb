//! Content Module
//!
//! Audit rules, template-driven copy generation and the coordinator that
//! ties them together.

pub mod checker;
pub mod coordinator;
pub mod generator;
pub mod template;
pub mod text;

pub use checker::{ContentChecker, TermMatcher};
pub use coordinator::ContentCoordinator;
pub use generator::{ContentField, ContentGenerator, ContentPrompt, ProductCategory};
pub use template::{ContentTemplate, DefaultTemplateEngine, TemplateEngine, TemplateType};
