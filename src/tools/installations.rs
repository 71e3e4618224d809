//! Installed Xcode discovery
//!
//! Finds every Xcode.app Spotlight knows about, reads its marketing version
//! and build from the bundle's property lists, and marks the one the active
//! developer directory points into.

use std::path::Path;

use tracing::debug;

use super::ToolContext;
use crate::exec::ExecRequest;

/// First line of the report.
pub const HEADER: &str = "Installed Xcode versions:";

/// Last line of the report.
pub const USAGE_HINT: &str =
    "To switch the active Xcode, run: sudo xcode-select -s <path>/Contents/Developer";

/// Build shown when `version.plist` cannot be read.
pub const UNKNOWN_BUILD: &str = "Unknown Build";

/// One discovered Xcode installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XcodeInstallation {
    /// Bundle path (e.g., "/Applications/Xcode.app").
    pub path: String,
    /// Marketing version (e.g., "15.4").
    pub version: String,
    /// Build version (e.g., "15F31d"), or [`UNKNOWN_BUILD`].
    pub build: String,
    /// Whether the active developer directory lives inside this bundle.
    pub active: bool,
}

impl XcodeInstallation {
    /// Bundle name (e.g., "Xcode-beta.app").
    pub fn app_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.path)
    }

    /// Report line for this installation.
    pub fn render_line(&self) -> String {
        let mut line = format!(
            "- {}: {} ({}) at {}",
            self.app_name(),
            self.version,
            self.build,
            self.path
        );
        if self.active {
            line.push_str(" [ACTIVE]");
        }
        line
    }
}

/// `list_xcode_versions` tool.
pub fn list_xcode_versions(ctx: &ToolContext<'_>) -> String {
    render(&discover(ctx))
}

/// Discover installations in Spotlight order.
///
/// Installations whose version cannot be read are dropped.
pub fn discover(ctx: &ToolContext<'_>) -> Vec<XcodeInstallation> {
    let active_dir = ctx
        .runner
        .execute(&ExecRequest::new("xcode-select", ["-p"]))
        .into_stdout()
        .unwrap_or_default();

    let query = format!(
        "kMDItemCFBundleIdentifier == '{}'",
        ctx.xcode.bundle_identifier
    );
    let found = ctx.runner.execute(&ExecRequest::new("mdfind", [query]));
    let Some(paths) = found.stdout() else {
        debug!(outcome = ?found, "Xcode discovery failed");
        return Vec::new();
    };

    paths
        .lines()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .filter_map(|path| read_installation(ctx, path, &active_dir))
        .collect()
}

fn read_installation(
    ctx: &ToolContext<'_>,
    path: &str,
    active_dir: &str,
) -> Option<XcodeInstallation> {
    let Some(version) = read_plist_key(
        ctx,
        &format!("{}/Contents/Info", path),
        "CFBundleShortVersionString",
    ) else {
        debug!(path, "skipping installation without a readable version");
        return None;
    };

    let build = read_plist_key(ctx, &format!("{}/Contents/version", path), "ProductBuildVersion")
        .unwrap_or_else(|| UNKNOWN_BUILD.to_string());

    Some(XcodeInstallation {
        path: path.to_string(),
        version,
        build,
        active: active_dir.contains(path),
    })
}

/// `defaults read <plist> <key>`; the plist path is given without extension.
fn read_plist_key(ctx: &ToolContext<'_>, plist: &str, key: &str) -> Option<String> {
    ctx.runner
        .execute(&ExecRequest::new("defaults", ["read", plist, key]))
        .into_stdout()
        .filter(|value| !value.is_empty())
}

/// Header, one line per installation, blank line, usage hint.
pub fn render(installations: &[XcodeInstallation]) -> String {
    let mut report = String::from(HEADER);
    report.push('\n');
    for installation in installations {
        report.push_str(&installation.render_line());
        report.push('\n');
    }
    report.push('\n');
    report.push_str(USAGE_HINT);
    report
}
