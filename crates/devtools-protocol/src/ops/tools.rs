//! Tool catalog and invocation types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the `tools/list` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool identifier, used as `params.name` in `tools/call`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema of the tool arguments.
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Describe a tool that takes no arguments.
    pub fn without_arguments(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({ "type": "object" }),
        }
    }
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolDescriptor>,
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Tool identifier.
    pub name: String,
    /// Tool arguments. Accepted and ignored: every tool is parameterless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Result of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// Wrap a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Concatenated text of all text blocks.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                Content::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A content block in a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_uses_camel_case_schema_key() {
        let tool = ToolDescriptor::without_arguments("uname", "Returns arch");
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["inputSchema"], serde_json::json!({ "type": "object" }));
        assert_eq!(json["name"], "uname");
    }

    #[test]
    fn call_result_shape() {
        let json = serde_json::to_value(CallToolResult::text("arm64")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": [{ "type": "text", "text": "arm64" }],
                "isError": false
            })
        );
    }

    #[test]
    fn call_params_ignore_missing_arguments() {
        let params: CallToolParams = serde_json::from_str(r#"{"name":"swift_version"}"#).unwrap();
        assert_eq!(params.name, "swift_version");
        assert!(params.arguments.is_none());
    }
}
