//! MCP stdio server
//!
//! Reads newline-delimited JSON-RPC messages from stdin and writes one
//! response line per request to stdout. Notifications get no response.
//! Stdout carries nothing but protocol messages; logs go to stderr.
//!
//!   swift-devtools-mcp serve

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use devtools_protocol::{
    ops::{
        names, CallToolParams, CallToolResult, Implementation, InitializeParams,
        InitializeResult, ListToolsResult, ServerCapabilities, ToolsCapability,
    },
    RpcError, RpcRequest, RpcResponse, JSONRPC_VERSION, MCP_PROTOCOL_VERSION,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::exec::CommandRunner;
use crate::tools::ToolRegistry;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Request counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Responses written.
    pub responses: usize,
    /// Notifications consumed without a response.
    pub notifications: usize,
}

/// MCP server over a line-oriented transport.
pub struct McpServer {
    dispatcher: Dispatcher,
    server_info: Implementation,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher, server_info: Implementation) -> Self {
        Self {
            dispatcher,
            server_info,
        }
    }

    /// Server for the built-in catalog with the given runner.
    pub fn from_config(config: &ServerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let dispatcher = Dispatcher::new(ToolRegistry::builtin(), runner, config.xcode.clone());
        Self::new(
            dispatcher,
            Implementation {
                name: config.server.name.clone(),
                version: config.server.version.clone(),
            },
        )
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Serve stdin/stdout until EOF.
    pub fn run(&self) -> Result<SessionStats, ServerError> {
        self.run_with_io(&mut io::stdin().lock(), &mut io::stdout().lock())
    }

    /// Serve a custom transport until EOF (for testing).
    pub fn run_with_io<R: BufRead, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<SessionStats, ServerError> {
        let mut stats = SessionStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            // A line that is not UTF-8 is a bad message, not a broken transport.
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line),
                Err(e) => {
                    warn!(error = %e, "message is not UTF-8");
                    Some(RpcResponse::error(
                        Value::Null,
                        RpcError::parse_error(format!("invalid UTF-8: {}", e)),
                    ))
                }
            };

            match response {
                Some(response) => {
                    self.write_response(writer, &response)?;
                    stats.responses += 1;
                }
                None => stats.notifications += 1,
            }
        }

        info!(
            responses = stats.responses,
            notifications = stats.notifications,
            "session ended"
        );
        Ok(stats)
    }

    /// Handle one raw message. `None` means no response is due.
    pub fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                return Some(RpcResponse::error(
                    Value::Null,
                    RpcError::parse_error(format!("invalid JSON: {}", e)),
                ));
            }
        };

        // `"id": null` deserializes to `None`; it is still a request.
        let id = value.get("id").cloned();
        let request: RpcRequest = match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => RpcRequest {
                id: request.id.or(id),
                ..request
            },
            Err(e) => {
                warn!(error = %e, "malformed request");
                return Some(RpcResponse::error(
                    id.unwrap_or(Value::Null),
                    RpcError::invalid_request(format!("malformed request: {}", e)),
                ));
            }
        };

        self.handle_request(&request)
    }

    /// Handle a parsed request. `None` means no response is due.
    pub fn handle_request(&self, request: &RpcRequest) -> Option<RpcResponse> {
        if request.is_notification() {
            if request.method == names::INITIALIZED {
                info!("client initialized");
            } else {
                debug!(method = %request.method, "notification");
            }
            return None;
        }

        let id = request.response_id();
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(RpcResponse::error(
                id,
                RpcError::invalid_request(format!(
                    "unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        debug!(method = %request.method, id = %id, "request");
        Some(match self.route(request) {
            Ok(result) => RpcResponse::success(id, result),
            Err(e) => {
                debug!(method = %request.method, error = %e, "request failed");
                RpcResponse::error(id, e)
            }
        })
    }

    /// Dispatch the request to the matching method handler.
    fn route(&self, request: &RpcRequest) -> Result<Value, RpcError> {
        match request.method.as_str() {
            names::INITIALIZE => self.initialize(&request.params),
            names::PING => Ok(serde_json::json!({})),
            names::TOOLS_LIST => encode(ListToolsResult {
                tools: self.dispatcher.list_tools(),
            }),
            names::TOOLS_CALL => self.call_tool(&request.params),
            method => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize(&self, params: &Value) -> Result<Value, RpcError> {
        let params: InitializeParams = if params.is_null() {
            InitializeParams::default()
        } else {
            serde_json::from_value(params.clone())
                .map_err(|e| RpcError::invalid_params(format!("invalid initialize params: {}", e)))?
        };

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "client connected");
        }

        encode(InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| MCP_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: self.server_info.clone(),
        })
    }

    fn call_tool(&self, params: &Value) -> Result<Value, RpcError> {
        let params: CallToolParams = serde_json::from_value(params.clone())
            .map_err(|e| RpcError::invalid_params(format!("invalid tools/call params: {}", e)))?;

        let text = self.dispatcher.call(&params.name)?;
        encode(CallToolResult::text(text))
    }

    /// Write the response as a single line.
    fn write_response<W: Write>(
        &self,
        writer: &mut W,
        response: &RpcResponse,
    ) -> Result<(), ServerError> {
        let json = serde_json::to_string(response)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }
}

fn encode<T: serde::Serialize>(payload: T) -> Result<Value, RpcError> {
    serde_json::to_value(payload)
        .map_err(|e| RpcError::internal(format!("failed to encode result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRunner;
    use devtools_protocol::ErrorCode;
    use std::io::Cursor;

    fn create_server(runner: MockRunner) -> McpServer {
        McpServer::from_config(&ServerConfig::default(), Arc::new(runner))
    }

    fn roundtrip(server: &McpServer, input: &str) -> Vec<RpcResponse> {
        let mut reader = Cursor::new(input.to_string());
        let mut output = Vec::new();
        server.run_with_io(&mut reader, &mut output).unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_initialize() {
        let server = create_server(MockRunner::new());
        let responses = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"1"}}}
"#,
        );

        assert_eq!(responses.len(), 1);
        let result = responses[0].result.as_ref().unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(result["serverInfo"]["name"], "Swift Dev Tools Server");
        assert_eq!(responses[0].id, Value::from(1));
    }

    #[test]
    fn test_initialize_without_params() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":"a","method":"initialize"}"#)
            .unwrap();
        assert_eq!(response.result.unwrap()["protocolVersion"], MCP_PROTOCOL_VERSION);
    }

    #[test]
    fn test_notification_gets_no_response() {
        let server = create_server(MockRunner::new());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"uname"}}"#)
            .is_none());
    }

    #[test]
    fn test_invalid_json() {
        let server = create_server(MockRunner::new());
        let response = server.handle_line("not valid json").unwrap();

        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, ErrorCode::ParseError);
    }

    #[test]
    fn test_not_a_request() {
        let server = create_server(MockRunner::new());
        let response = server.handle_line(r#"{"id":4,"params":{}}"#).unwrap();

        assert_eq!(response.id, Value::from(4));
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_wrong_jsonrpc_version() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(r#"{"jsonrpc":"1.0","id":5,"method":"ping"}"#)
            .unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_unknown_method() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":6,"method":"resources/list"}"#)
            .unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::MethodNotFound);
    }

    #[test]
    fn test_ping() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#)
            .unwrap();
        assert_eq!(response.result, Some(serde_json::json!({})));
    }

    #[test]
    fn test_tools_call_missing_name() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{}}"#)
            .unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidParams);
    }

    #[test]
    fn test_tools_call_unknown_tool() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"xcode_clean"}}"#,
            )
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::InvalidParams);
        assert_eq!(error.message, "Wrong tool name: xcode_clean");
    }

    #[test]
    fn test_tools_call_ignores_arguments() {
        let server = create_server(MockRunner::new().with_success("uname -m", "arm64"));
        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":10,"method":"tools/call","params":{"name":"system_architecture","arguments":{"verbose":true}}}"#,
            )
            .unwrap();

        let result: CallToolResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(result.joined_text(), "arm64");
        assert!(!result.is_error);
    }

    #[test]
    fn test_null_id_is_a_request() {
        let server = create_server(MockRunner::new());
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .unwrap();

        assert_eq!(response.id, Value::Null);
        assert!(response.is_success());
    }

    #[test]
    fn test_handle_request_directly() {
        let server = create_server(MockRunner::new());
        assert!(server
            .handle_request(&RpcRequest::notification(names::INITIALIZED))
            .is_none());

        let response = server
            .handle_request(&RpcRequest::new(3, names::PING, Value::Null))
            .unwrap();
        assert_eq!(response.id, Value::from(3));
        assert_eq!(response.result, Some(serde_json::json!({})));
    }

    #[test]
    fn test_invalid_utf8_gets_parse_error() {
        let server = create_server(MockRunner::new());
        let mut input = vec![b'{', 0xc3, 0x28, b'}', b'\n'];
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

        let mut output = Vec::new();
        let stats = server
            .run_with_io(&mut Cursor::new(input), &mut output)
            .unwrap();
        assert_eq!(stats.responses, 2);

        let responses: Vec<RpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses[0].id, Value::Null);
        assert_eq!(responses[0].error.as_ref().unwrap().code, ErrorCode::ParseError);
        assert!(responses[1].is_success());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let server = create_server(MockRunner::new());
        let responses = roundtrip(
            &server,
            "\n  \n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n",
        );
        assert_eq!(responses.len(), 1);
    }
}
