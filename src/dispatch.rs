//! Tool dispatcher.
//!
//! Routes a tool name to its interpreter and returns the report text.

use std::sync::Arc;

use devtools_protocol::{ops::ToolDescriptor, RpcError};
use tracing::{debug, info};

use crate::config::XcodeConfig;
use crate::exec::CommandRunner;
use crate::tools::{ToolContext, ToolRegistry};

/// Looks up tools by exact name and runs them synchronously.
pub struct Dispatcher {
    registry: ToolRegistry,
    runner: Arc<dyn CommandRunner>,
    xcode: XcodeConfig,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, runner: Arc<dyn CommandRunner>, xcode: XcodeConfig) -> Self {
        Self {
            registry,
            runner,
            xcode,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Catalog for `tools/list`.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Run a tool by name.
    ///
    /// Only an unknown name is an error; command failures come back as text.
    pub fn call(&self, name: &str) -> Result<String, RpcError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| RpcError::wrong_tool_name(name))?;

        info!(tool = tool.name, "running tool");
        let ctx = ToolContext {
            runner: self.runner.as_ref(),
            xcode: &self.xcode,
        };
        let text = tool.invoke(&ctx);

        if text.is_empty() {
            debug!(tool = tool.name, "empty report, using fallback");
            return Ok(tool.fallback.to_string());
        }
        Ok(text)
    }
}
