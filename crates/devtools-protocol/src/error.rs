//! Error types for the RPC protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC error codes.
///
/// Serialized as the bare integer defined by JSON-RPC 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ErrorCode {
    /// The message was not valid JSON.
    ParseError,
    /// Valid JSON, but not a JSON-RPC request object.
    InvalidRequest,
    /// The method does not exist on this server.
    MethodNotFound,
    /// The method exists but the parameters were rejected.
    InvalidParams,
    /// The server failed while handling the request.
    InternalError,
    /// Any other code, passed through untouched.
    Other(i64),
}

impl ErrorCode {
    /// Numeric code as it appears on the wire.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::Other(code) => code,
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            other => Self::Other(other),
        }
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        code.as_i64()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::MethodNotFound => write!(f, "METHOD_NOT_FOUND"),
            Self::InvalidParams => write!(f, "INVALID_PARAMS"),
            Self::InternalError => write!(f, "INTERNAL_ERROR"),
            Self::Other(code) => write!(f, "ERROR_{}", code),
        }
    }
}

/// RPC error response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable, single-line error message.
    pub message: String,
    /// Optional machine-readable details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// Create a new RPC error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new RPC error with additional data.
    pub fn with_data(code: ErrorCode, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a PARSE_ERROR error.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// Create an INVALID_REQUEST error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Create a METHOD_NOT_FOUND error.
    pub fn method_not_found(method: &str) -> Self {
        Self::with_data(
            ErrorCode::MethodNotFound,
            format!("method not found: {}", method),
            serde_json::json!({ "method": method }),
        )
    }

    /// Create an INVALID_PARAMS error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    /// Create the INVALID_PARAMS error returned for a tool name that is not registered.
    pub fn wrong_tool_name(name: &str) -> Self {
        Self::invalid_params(format!("Wrong tool name: {}", name))
    }

    /// Create an INTERNAL_ERROR error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}
