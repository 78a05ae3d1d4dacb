//! MCP handlers
//!
//! Each handler implements the common `McpHandler` trait and is registered
//! with the server under its own name.

pub mod content;

pub use content::ContentHandler;
