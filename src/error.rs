//! Error types for content auditing, generation and the MCP surface.

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for content operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule pattern could not be compiled
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Feature not supported
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Template lookup or rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Required template field missing
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (e.g. product without identifier)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Convert error to JSON-RPC error code
    pub fn to_json_rpc_code(&self) -> i32 {
        match self {
            Error::Parse(_) | Error::Json(_) => -32700,
            Error::InvalidRequest(_) => -32600,
            Error::MethodNotFound(_) => -32601,
            Error::InvalidParams(_) | Error::InvalidInput(_) => -32602,
            Error::Internal(_) => -32603,
            _ => -32000, // Server error
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rpc_codes() {
        assert_eq!(Error::Parse("x".into()).to_json_rpc_code(), -32700);
        assert_eq!(Error::InvalidRequest("x".into()).to_json_rpc_code(), -32600);
        assert_eq!(Error::MethodNotFound("x".into()).to_json_rpc_code(), -32601);
        assert_eq!(Error::InvalidInput("x".into()).to_json_rpc_code(), -32602);
        assert_eq!(Error::NotSupported("x".into()).to_json_rpc_code(), -32000);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("product identifier is missing".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: product identifier is missing"
        );
    }
}
