//! Error types for the FMP MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Main error type for the FMP MCP Server
#[derive(Error, Debug)]
pub enum FmpMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
#[allow(dead_code)] // Some variants reserved for future use
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Unknown resource: {uri}")]
    UnknownResource { uri: String },

    #[error("Unknown prompt: {name}")]
    UnknownPrompt { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },
}

/// Failure returned by the FMP API client.
///
/// Every call to the client resolves to either the decoded JSON body or one of
/// these three kinds, based on where the failure was observed. The client never
/// panics and never propagates a raw `reqwest::Error` across its boundary, so
/// callers can branch on the kind exhaustively.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The remote service answered with a 4xx/5xx status
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16, message: String },

    /// DNS, connection, or timeout failure before a response arrived
    #[error("Request error")]
    Transport { message: String },

    /// Anything else, including a body that failed to decode as JSON
    #[error("Unknown error")]
    Unknown { message: String },
}

impl ApiError {
    /// Human-readable detail for this failure
    pub fn message(&self) -> &str {
        match self {
            ApiError::HttpStatus { message, .. } => message,
            ApiError::Transport { message } => message,
            ApiError::Unknown { message } => message,
        }
    }
}

/// Serializes to the `{"error": ..., "message": ...}` shape callers branch on.
impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("error", &self.to_string())?;
        map.serialize_entry("message", self.message())?;
        map.end()
    }
}

/// Result type alias for FMP MCP operations
pub type Result<T> = std::result::Result<T, FmpMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingEnvVar {
            var: "FMP_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("FMP_API_KEY"));
    }

    #[test]
    fn test_error_conversion() {
        let mcp_err = McpError::UnknownTool {
            name: "get_quotes".to_string(),
        };
        let err: FmpMcpError = mcp_err.into();
        assert!(matches!(err, FmpMcpError::Mcp(_)));
    }

    #[test]
    fn test_api_error_display_matches_kind() {
        let err = ApiError::HttpStatus {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: 401");
        assert_eq!(err.message(), "Unauthorized");

        let err = ApiError::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Request error");
    }

    #[test]
    fn test_api_error_serializes_as_data() {
        let err = ApiError::HttpStatus {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"error": "HTTP error: 401", "message": "Unauthorized"})
        );
    }
}
