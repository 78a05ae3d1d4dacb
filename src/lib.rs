//! # shop-content-mcp
//!
//! Audits e-commerce product listings against copywriting and SEO rules,
//! regenerates the failing fields from premium templates, and exports
//! platform update payloads. The same pipeline is served over MCP
//! (JSON-RPC on stdio) for AI-agent integration.

pub mod ai;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod mcp;
pub mod report;
pub mod types;

pub use ai::content::{ContentChecker, ContentCoordinator, ContentGenerator};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use mcp::McpServer;
pub use types::{
    AuditResult, BatchStatistics, Issue, IssueType, OptimizationResult, Priority,
    ProcessingResult, Product, Severity, UpdatePayload,
};
