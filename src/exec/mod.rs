//! External process execution
//!
//! Every tool ends up here: a command name plus arguments is launched as a
//! child process, both output streams are buffered, and the outcome is
//! classified as success, non-zero exit, or launch failure.
//!
//! Interpreters only ever see [`ExecOutcome`] values, so they can be driven
//! by [`crate::mock::MockRunner`] in tests without spawning anything.

use std::process::{Command, ExitStatus, Output, Stdio};

use tracing::debug;

/// Prefix used when a caller does not supply one.
pub const DEFAULT_ERROR_PREFIX: &str = "Command failed";

/// A command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Program name, resolved through `PATH`.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Prefix for user-facing failure text.
    pub error_prefix: String,
}

impl ExecRequest {
    /// Create a request with the default error prefix.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            error_prefix: DEFAULT_ERROR_PREFIX.to_string(),
        }
    }

    /// Replace the error prefix.
    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    /// Program and arguments joined by single spaces.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Classified result of one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Exit status 0. Stdout with surrounding whitespace trimmed.
    Success { stdout: String },
    /// The child ran and exited non-zero.
    Exited { status: i32, stderr: String },
    /// The child could not be started.
    LaunchFailed { reason: String },
}

impl ExecOutcome {
    /// Classify a finished child.
    pub fn from_output(output: &Output) -> Self {
        if output.status.success() {
            Self::Success {
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            }
        } else {
            Self::Exited {
                status: exit_code(output.status),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Trimmed stdout, if the command succeeded.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::Success { stdout } => Some(stdout),
            _ => None,
        }
    }

    /// Consume the outcome, keeping stdout only on success.
    pub fn into_stdout(self) -> Option<String> {
        match self {
            Self::Success { stdout } => Some(stdout),
            _ => None,
        }
    }

    /// Render as the text handed back to the calling agent.
    pub fn render(&self, error_prefix: &str) -> String {
        match self {
            Self::Success { stdout } => stdout.clone(),
            Self::Exited { status, stderr } => format!(
                "{}: Process failed with status {}. {}",
                error_prefix, status, stderr
            ),
            Self::LaunchFailed { reason } => format!("{}: {}", error_prefix, reason),
        }
    }

    /// One-line description of a failure, for reports that must stay on one line.
    pub fn failure_summary(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Exited { status, stderr } => {
                let first = stderr.lines().map(str::trim).find(|l| !l.is_empty());
                Some(match first {
                    Some(line) => format!("exited with status {}: {}", status, line),
                    None => format!("exited with status {}", status),
                })
            }
            Self::LaunchFailed { reason } => Some(reason.clone()),
        }
    }
}

/// Exit code, or the terminating signal number when the child was killed.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return signal;
        }
    }
    -1
}

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion and classify the result.
    fn execute(&self, request: &ExecRequest) -> ExecOutcome;

    /// Run the command and render the outcome with the request's error prefix.
    fn run(&self, request: &ExecRequest) -> String {
        self.execute(request).render(&request.error_prefix)
    }
}

/// Spawns real child processes.
///
/// Stdin is closed for the child: the server's own stdin carries protocol
/// traffic and must never be consumed by a tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, request: &ExecRequest) -> ExecOutcome {
        debug!(program = %request.program, args = ?request.args, "spawning command");

        let outcome = match Command::new(&request.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
        {
            Ok(output) => ExecOutcome::from_output(&output),
            Err(e) => ExecOutcome::LaunchFailed {
                reason: e.to_string(),
            },
        };

        match &outcome {
            ExecOutcome::Success { .. } => {
                debug!(command = %request.command_line(), "command succeeded")
            }
            ExecOutcome::Exited { status, .. } => {
                debug!(command = %request.command_line(), status, "command exited non-zero")
            }
            ExecOutcome::LaunchFailed { reason } => {
                debug!(command = %request.command_line(), %reason, "command could not be launched")
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_success_is_stdout() {
        let outcome = ExecOutcome::Success {
            stdout: "arm64".to_string(),
        };
        assert_eq!(outcome.render("X"), "arm64");
    }

    #[test]
    fn test_render_exit_failure() {
        let outcome = ExecOutcome::Exited {
            status: 2,
            stderr: "bad arg".to_string(),
        };
        assert_eq!(outcome.render("X"), "X: Process failed with status 2. bad arg");
    }

    #[test]
    fn test_render_launch_failure() {
        let outcome = ExecOutcome::LaunchFailed {
            reason: "No such file or directory (os error 2)".to_string(),
        };
        assert_eq!(
            outcome.render("Error getting Swift version"),
            "Error getting Swift version: No such file or directory (os error 2)"
        );
    }

    #[test]
    fn test_failure_summary_uses_first_stderr_line() {
        let outcome = ExecOutcome::Exited {
            status: 1,
            stderr: "\nxcode-select: error: unable to get active developer directory\nmore\n"
                .to_string(),
        };
        assert_eq!(
            outcome.failure_summary().as_deref(),
            Some("exited with status 1: xcode-select: error: unable to get active developer directory")
        );
        assert!(ExecOutcome::Success { stdout: String::new() }.failure_summary().is_none());
    }

    #[test]
    fn test_request_defaults() {
        let req = ExecRequest::new("xcrun", ["simctl", "list", "devices"]);
        assert_eq!(req.error_prefix, DEFAULT_ERROR_PREFIX);
        assert_eq!(req.command_line(), "xcrun simctl list devices");
    }

    #[cfg(unix)]
    mod system {
        use super::*;

        fn sh(script: &str) -> ExecRequest {
            ExecRequest::new("sh", ["-c", script])
        }

        #[test]
        fn test_stdout_is_trimmed() {
            let out = SystemRunner.run(&sh("printf '  hello\\n'"));
            assert_eq!(out, "hello");
        }

        #[test]
        fn test_nonzero_exit_reports_status_and_stderr() {
            let req = sh("printf 'bad arg' >&2; exit 2").with_error_prefix("X");
            assert_eq!(SystemRunner.run(&req), "X: Process failed with status 2. bad arg");
        }

        #[test]
        fn test_stdout_is_discarded_on_failure() {
            let req = sh("echo partial; exit 3").with_error_prefix("X");
            assert_eq!(SystemRunner.run(&req), "X: Process failed with status 3. ");
        }

        #[test]
        fn test_missing_program_is_launch_failure() {
            let req = ExecRequest::new("definitely-not-a-real-binary-4f1c", Vec::<String>::new())
                .with_error_prefix("Prefix");
            let outcome = SystemRunner.execute(&req);
            assert!(matches!(outcome, ExecOutcome::LaunchFailed { .. }));

            let text = outcome.render(&req.error_prefix);
            assert!(text.starts_with("Prefix: "));
            assert!(text.len() > "Prefix: ".len());
        }

        #[test]
        fn test_child_does_not_read_our_stdin() {
            // `cat` with a closed stdin exits immediately with no output.
            assert_eq!(SystemRunner.run(&ExecRequest::new("cat", Vec::<String>::new())), "");
        }
    }
}
