//! Swift Dev Tools Protocol Types
//!
//! Defines the JSON-RPC 2.0 envelope and the Model Context Protocol (MCP)
//! payloads exchanged between a calling agent and the server over stdio.

pub mod error;
pub mod ops;
pub mod request;
pub mod response;

pub use error::{ErrorCode, RpcError};
pub use request::RpcRequest;
pub use response::RpcResponse;

/// JSON-RPC version carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP revision answered when the client does not request one.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
