//! Single-command tools
//!
//! Each tool runs one fixed command line and returns its rendered outcome
//! verbatim.

use super::ToolContext;
use crate::exec::ExecRequest;

/// A fixed command line and the prefix used when it fails.
#[derive(Debug, Clone, Copy)]
pub struct SimpleCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
    pub error_prefix: &'static str,
}

impl SimpleCommand {
    pub fn request(&self) -> ExecRequest {
        ExecRequest::new(self.program, self.args.iter().copied())
            .with_error_prefix(self.error_prefix)
    }

    fn run(&self, ctx: &ToolContext<'_>) -> String {
        ctx.runner.run(&self.request())
    }
}

pub const SWIFT_VERSION: SimpleCommand = SimpleCommand {
    program: "swift",
    args: &["--version"],
    error_prefix: "Error getting Swift version",
};

pub const LIST_SIMULATOR: SimpleCommand = SimpleCommand {
    program: "xcrun",
    args: &["simctl", "list", "devices"],
    error_prefix: "Error listing simulators",
};

pub const XCODE_VERSION: SimpleCommand = SimpleCommand {
    program: "xcodebuild",
    args: &["-version"],
    error_prefix: "Error getting Xcode version",
};

pub const XCODE_SDKS: SimpleCommand = SimpleCommand {
    program: "xcodebuild",
    args: &["-showsdks"],
    error_prefix: "Error listing Xcode SDKs",
};

pub const CONNECTED_DEVICES: SimpleCommand = SimpleCommand {
    program: "xcrun",
    args: &["xctrace", "list", "devices"],
    error_prefix: "Error listing connected devices",
};

pub const MACOS_VERSION: SimpleCommand = SimpleCommand {
    program: "sw_vers",
    args: &[],
    error_prefix: "Error getting macOS version",
};

pub const SYSTEM_ARCHITECTURE: SimpleCommand = SimpleCommand {
    program: "uname",
    args: &["-m"],
    error_prefix: "Error getting system architecture",
};

pub fn swift_version(ctx: &ToolContext<'_>) -> String {
    SWIFT_VERSION.run(ctx)
}

pub fn list_simulator(ctx: &ToolContext<'_>) -> String {
    LIST_SIMULATOR.run(ctx)
}

pub fn xcode_version(ctx: &ToolContext<'_>) -> String {
    XCODE_VERSION.run(ctx)
}

pub fn xcode_sdks(ctx: &ToolContext<'_>) -> String {
    XCODE_SDKS.run(ctx)
}

pub fn connected_devices(ctx: &ToolContext<'_>) -> String {
    CONNECTED_DEVICES.run(ctx)
}

pub fn macos_version(ctx: &ToolContext<'_>) -> String {
    MACOS_VERSION.run(ctx)
}

pub fn system_architecture(ctx: &ToolContext<'_>) -> String {
    SYSTEM_ARCHITECTURE.run(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XcodeConfig;
    use crate::mock::{MockRunner, NOT_FOUND};

    fn run_with(runner: &MockRunner, interpreter: fn(&ToolContext<'_>) -> String) -> String {
        let xcode = XcodeConfig::default();
        interpreter(&ToolContext {
            runner,
            xcode: &xcode,
        })
    }

    #[test]
    fn test_command_lines() {
        let lines: Vec<String> = [
            SWIFT_VERSION,
            LIST_SIMULATOR,
            XCODE_VERSION,
            XCODE_SDKS,
            CONNECTED_DEVICES,
            MACOS_VERSION,
            SYSTEM_ARCHITECTURE,
        ]
        .iter()
        .map(|c| c.request().command_line())
        .collect();

        assert_eq!(
            lines,
            vec![
                "swift --version",
                "xcrun simctl list devices",
                "xcodebuild -version",
                "xcodebuild -showsdks",
                "xcrun xctrace list devices",
                "sw_vers",
                "uname -m",
            ]
        );
    }

    #[test]
    fn test_success_is_passed_through() {
        let runner = MockRunner::new().with_success(
            "sw_vers",
            "ProductName:\t\tmacOS\nProductVersion:\t\t14.5\nBuildVersion:\t\t23F79\n",
        );
        assert_eq!(
            run_with(&runner, macos_version),
            "ProductName:\t\tmacOS\nProductVersion:\t\t14.5\nBuildVersion:\t\t23F79"
        );
    }

    #[test]
    fn test_exit_failure_uses_tool_prefix() {
        let runner = MockRunner::new().with_exit(
            "xcodebuild -version",
            1,
            "xcode-select: error: tool 'xcodebuild' requires Xcode\n",
        );
        assert_eq!(
            run_with(&runner, xcode_version),
            "Error getting Xcode version: Process failed with status 1. \
             xcode-select: error: tool 'xcodebuild' requires Xcode\n"
        );
    }

    #[test]
    fn test_launch_failure_uses_tool_prefix() {
        let runner = MockRunner::new();
        assert_eq!(
            run_with(&runner, list_simulator),
            format!("Error listing simulators: {}", NOT_FOUND)
        );
        assert_eq!(runner.calls(), vec!["xcrun simctl list devices"]);

        let runner =
            MockRunner::new().with_launch_failure("sw_vers", "Permission denied (os error 13)");
        assert_eq!(
            run_with(&runner, macos_version),
            "Error getting macOS version: Permission denied (os error 13)"
        );
    }

    #[test]
    fn test_repeat_calls_are_identical() {
        let runner = MockRunner::new().with_success("uname -m", "arm64");
        let first = run_with(&runner, system_architecture);
        let second = run_with(&runner, system_architecture);
        assert_eq!(first, second);
        assert_eq!(runner.calls().len(), 2);
    }
}
