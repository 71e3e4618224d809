//! Developer tools health report
//!
//! Seven independent checks run in a fixed order. Each contributes exactly
//! one line starting with [`PASS`] or [`FAIL`]; a failing check never stops
//! the ones after it.

use regex_lite::Regex;

use super::ToolContext;
use crate::exec::{CommandRunner, ExecOutcome, ExecRequest};

/// Glyph for a passing check.
pub const PASS: &str = "✅";

/// Glyph for a failing check.
pub const FAIL: &str = "❌";

/// Pattern for the dotted version in `swift --version` output.
const SWIFT_VERSION_PATTERN: &str = r"Swift version (\d+(?:\.\d+)+)";

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass(String),
    Fail {
        detail: String,
        /// Remediation, when there is an obvious one.
        hint: Option<&'static str>,
    },
}

impl CheckStatus {
    fn fail(detail: impl Into<String>, hint: Option<&'static str>) -> Self {
        Self::Fail {
            detail: detail.into(),
            hint,
        }
    }

    /// Fail with the outcome's one-line summary.
    fn from_failure(outcome: &ExecOutcome, hint: Option<&'static str>) -> Self {
        Self::fail(
            outcome
                .failure_summary()
                .unwrap_or_else(|| "no output".to_string()),
            hint,
        )
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }

    /// Report line (without trailing newline).
    pub fn render(&self, label: &str) -> String {
        match self {
            Self::Pass(detail) => format!("{} {}: {}", PASS, label, detail),
            Self::Fail { detail, hint: None } => format!("{} {}: {}", FAIL, label, detail),
            Self::Fail {
                detail,
                hint: Some(hint),
            } => format!("{} {}: {} (fix: {})", FAIL, label, detail, hint),
        }
    }
}

/// A named check.
#[derive(Clone, Copy)]
pub struct HealthCheck {
    pub label: &'static str,
    check: fn(&dyn CommandRunner) -> CheckStatus,
}

impl HealthCheck {
    pub fn run(&self, runner: &dyn CommandRunner) -> CheckStatus {
        (self.check)(runner)
    }
}

/// Checks in report order.
pub static CHECKS: [HealthCheck; 7] = [
    HealthCheck {
        label: "Xcode",
        check: check_xcode,
    },
    HealthCheck {
        label: "Active developer directory",
        check: check_active_directory,
    },
    HealthCheck {
        label: "Command line tools",
        check: check_command_line_tools,
    },
    HealthCheck {
        label: "Swift",
        check: check_swift,
    },
    HealthCheck {
        label: "SDK",
        check: check_sdk,
    },
    HealthCheck {
        label: "Xcode license",
        check: check_license,
    },
    HealthCheck {
        label: "Developer mode",
        check: check_developer_mode,
    },
];

/// `check_dev_tools` tool.
pub fn check_dev_tools(ctx: &ToolContext<'_>) -> String {
    let mut report = String::new();
    for check in CHECKS.iter() {
        report.push_str(&check.run(ctx.runner).render(check.label));
        report.push('\n');
    }
    report
}

/// Dotted version number from `swift --version` output.
pub fn parse_swift_version(output: &str) -> Option<String> {
    let re = Regex::new(SWIFT_VERSION_PATTERN).ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// "Xcode 15.4 (build 15F31d)" from `xcodebuild -version` output.
pub fn parse_xcode_version(output: &str) -> Option<String> {
    let mut lines = output.lines().map(str::trim).filter(|l| !l.is_empty());
    let name = lines.next()?;
    match lines.find_map(|l| l.strip_prefix("Build version ")) {
        Some(build) => Some(format!("{} (build {})", name, build.trim())),
        None => Some(name.to_string()),
    }
}

fn execute(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> ExecOutcome {
    runner.execute(&ExecRequest::new(program, args.iter().copied()))
}

fn check_xcode(runner: &dyn CommandRunner) -> CheckStatus {
    const HINT: Option<&str> = Some("install Xcode from the App Store");
    let outcome = execute(runner, "xcodebuild", &["-version"]);
    match outcome.stdout().and_then(parse_xcode_version) {
        Some(version) => CheckStatus::Pass(version),
        None if outcome.is_success() => CheckStatus::fail("no version reported", HINT),
        None => CheckStatus::from_failure(&outcome, HINT),
    }
}

fn check_active_directory(runner: &dyn CommandRunner) -> CheckStatus {
    const HINT: Option<&str> =
        Some("run `sudo xcode-select -s /Applications/Xcode.app/Contents/Developer`");
    let outcome = execute(runner, "xcode-select", &["-p"]);
    match outcome.stdout() {
        Some(path) if !path.is_empty() => CheckStatus::Pass(path.to_string()),
        Some(_) => CheckStatus::fail("not set", HINT),
        None => CheckStatus::from_failure(&outcome, HINT),
    }
}

fn check_command_line_tools(runner: &dyn CommandRunner) -> CheckStatus {
    const HINT: Option<&str> = Some("run `xcode-select --install`");
    let outcome = execute(runner, "xcrun", &["--find", "clang"]);
    match outcome.stdout() {
        Some(path) if !path.is_empty() => CheckStatus::Pass(format!("installed ({})", path)),
        Some(_) => CheckStatus::fail("clang not found", HINT),
        None => CheckStatus::from_failure(&outcome, HINT),
    }
}

fn check_swift(runner: &dyn CommandRunner) -> CheckStatus {
    let outcome = execute(runner, "swift", &["--version"]);
    match outcome.stdout() {
        Some(output) => match parse_swift_version(output) {
            Some(version) => CheckStatus::Pass(version),
            None => CheckStatus::fail("could not parse `swift --version` output", None),
        },
        None => CheckStatus::from_failure(
            &outcome,
            Some("install Xcode or a toolchain from swift.org"),
        ),
    }
}

fn check_sdk(runner: &dyn CommandRunner) -> CheckStatus {
    const HINT: Option<&str> = Some("run `xcode-select --install`");
    let outcome = execute(runner, "xcrun", &["--show-sdk-version"]);
    match outcome.stdout() {
        Some(version) if !version.is_empty() => CheckStatus::Pass(version.to_string()),
        Some(_) => CheckStatus::fail("no SDK version reported", HINT),
        None => CheckStatus::from_failure(&outcome, HINT),
    }
}

fn check_license(runner: &dyn CommandRunner) -> CheckStatus {
    const HINT: Option<&str> = Some("run `sudo xcodebuild -license accept`");
    match execute(runner, "xcodebuild", &["-license", "check"]) {
        ExecOutcome::Success { .. } => CheckStatus::Pass("accepted".to_string()),
        ExecOutcome::Exited { .. } => CheckStatus::fail("not accepted", HINT),
        outcome @ ExecOutcome::LaunchFailed { .. } => CheckStatus::from_failure(&outcome, HINT),
    }
}

fn check_developer_mode(runner: &dyn CommandRunner) -> CheckStatus {
    const HINT: Option<&str> = Some("run `sudo DevToolsSecurity -enable`");
    let outcome = execute(runner, "DevToolsSecurity", &["-status"]);
    match outcome.stdout() {
        Some(status) if status.contains("enabled") => CheckStatus::Pass("enabled".to_string()),
        Some(_) => CheckStatus::fail("disabled", HINT),
        None => CheckStatus::from_failure(&outcome, HINT),
    }
}
