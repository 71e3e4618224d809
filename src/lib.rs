//! Swift Dev Tools MCP Server
//!
//! Exposes a fixed catalog of Swift/Xcode/macOS inspection tools to an
//! agent over the Model Context Protocol on stdio. Every tool shells out to
//! a local command-line utility and returns its output as text.
//!
//! This crate can be used in two modes:
//! - **Standalone binary**: launched by an MCP client as a stdio server
//! - **In-process library**: for tests, with a scripted [`mock::MockRunner`]

pub mod config;
pub mod dispatch;
pub mod exec;
pub mod mock;
pub mod server;
pub mod tools;

pub use config::{ConfigError, EffectiveConfig, ServerConfig, XcodeConfig};
pub use devtools_protocol::{ErrorCode, RpcError, RpcRequest, RpcResponse};
pub use dispatch::Dispatcher;
pub use exec::{CommandRunner, ExecOutcome, ExecRequest, SystemRunner, DEFAULT_ERROR_PREFIX};
pub use mock::MockRunner;
pub use server::{McpServer, ServerError, SessionStats};
pub use tools::{Tool, ToolContext, ToolRegistry};
