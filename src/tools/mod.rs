//! Tool catalog
//!
//! The nine parameterless tools exposed to the calling agent, in the order
//! `tools/list` reports them. The catalog is fixed at compile time.

pub mod health;
pub mod installations;
pub mod simple;

use devtools_protocol::ops::ToolDescriptor;

use crate::config::XcodeConfig;
use crate::exec::CommandRunner;

/// Tool identifiers.
pub mod names {
    pub const SWIFT_VERSION: &str = "swift_version";
    pub const LIST_SIMULATOR: &str = "list_simulator";
    pub const XCODE_VERSION: &str = "xcode_version";
    pub const XCODE_SDKS: &str = "xcode_sdks";
    pub const CONNECTED_DEVICES: &str = "connected_devices";
    pub const MACOS_VERSION: &str = "macos_version";
    pub const SYSTEM_ARCHITECTURE: &str = "system_architecture";
    pub const LIST_XCODE_VERSIONS: &str = "list_xcode_versions";
    pub const CHECK_DEV_TOOLS: &str = "check_dev_tools";
}

/// What an interpreter gets to work with.
pub struct ToolContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub xcode: &'a XcodeConfig,
}

/// Turns zero or more command executions into one report string.
pub type Interpreter = fn(&ToolContext<'_>) -> String;

/// A registered tool.
#[derive(Clone, Copy)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    /// Shown instead of an empty report.
    pub fallback: &'static str,
    interpreter: Interpreter,
}

impl Tool {
    /// Run the interpreter.
    pub fn invoke(&self, ctx: &ToolContext<'_>) -> String {
        (self.interpreter)(ctx)
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::without_arguments(self.name, self.description)
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name).finish_non_exhaustive()
    }
}

static BUILTIN_TOOLS: [Tool; 9] = [
    Tool {
        name: names::SWIFT_VERSION,
        description: "Returns the current Swift version",
        fallback: "No version",
        interpreter: simple::swift_version,
    },
    Tool {
        name: names::LIST_SIMULATOR,
        description: "Lists available simulators",
        fallback: "No simulators found",
        interpreter: simple::list_simulator,
    },
    Tool {
        name: names::XCODE_VERSION,
        description: "Returns Xcode version and build information",
        fallback: "No Xcode version",
        interpreter: simple::xcode_version,
    },
    Tool {
        name: names::XCODE_SDKS,
        description: "Lists all available Xcode SDKs",
        fallback: "No SDKs found",
        interpreter: simple::xcode_sdks,
    },
    Tool {
        name: names::CONNECTED_DEVICES,
        description: "Lists all connected iOS/macOS devices",
        fallback: "No devices found",
        interpreter: simple::connected_devices,
    },
    Tool {
        name: names::MACOS_VERSION,
        description: "Returns macOS version information",
        fallback: "No macOS version",
        interpreter: simple::macos_version,
    },
    Tool {
        name: names::SYSTEM_ARCHITECTURE,
        description: "Returns system architecture (arm64/x86_64)",
        fallback: "No architecture info",
        interpreter: simple::system_architecture,
    },
    Tool {
        name: names::LIST_XCODE_VERSIONS,
        description: "Lists installed Xcode versions and marks the active one",
        fallback: "No Xcode installations found",
        interpreter: installations::list_xcode_versions,
    },
    Tool {
        name: names::CHECK_DEV_TOOLS,
        description: "Checks the health of the Swift/Xcode developer toolchain",
        fallback: "No health information",
        interpreter: health::check_dev_tools,
    },
];

/// Ordered, immutable tool registry.
#[derive(Debug, Clone, Copy)]
pub struct ToolRegistry {
    tools: &'static [Tool],
}

impl ToolRegistry {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            tools: &BUILTIN_TOOLS,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&'static Tool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors for `tools/list`, in registry order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.iter().map(Tool::descriptor).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_order() {
        let names: Vec<_> = ToolRegistry::builtin().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "swift_version",
                "list_simulator",
                "xcode_version",
                "xcode_sdks",
                "connected_devices",
                "macos_version",
                "system_architecture",
                "list_xcode_versions",
                "check_dev_tools",
            ]
        );
    }

    #[test]
    fn test_names_are_unique() {
        let registry = ToolRegistry::builtin();
        let unique: HashSet<_> = registry.iter().map(|t| t.name).collect();
        assert_eq!(unique.len(), registry.len());
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = ToolRegistry::builtin();
        assert!(registry.get("swift_version").is_some());
        assert!(registry.get("Swift_Version").is_none());
        assert!(registry.get("swift").is_none());
        assert!(registry.get("swift_version ").is_none());
    }

    #[test]
    fn test_descriptors_take_no_arguments() {
        for descriptor in ToolRegistry::builtin().descriptors() {
            assert_eq!(descriptor.input_schema, serde_json::json!({ "type": "object" }));
            assert!(!descriptor.description.is_empty());
        }
    }
}
