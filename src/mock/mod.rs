//! Scripted command runner
//!
//! Returns canned outcomes keyed by command line so interpreters, the
//! dispatcher and the server can be exercised on any host.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::exec::{CommandRunner, ExecOutcome, ExecRequest};

/// Reason reported for command lines that were never scripted.
pub const NOT_FOUND: &str = "No such file or directory (os error 2)";

/// A [`CommandRunner`] that replays scripted outcomes and records every call.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, ExecOutcome>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful run. Stdout is trimmed the way the real runner trims it.
    pub fn with_success(mut self, command_line: &str, stdout: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            ExecOutcome::Success {
                stdout: stdout.trim().to_string(),
            },
        );
        self
    }

    /// Script a non-zero exit.
    pub fn with_exit(mut self, command_line: &str, status: i32, stderr: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            ExecOutcome::Exited {
                status,
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Script a launch failure.
    pub fn with_launch_failure(mut self, command_line: &str, reason: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            ExecOutcome::LaunchFailed {
                reason: reason.to_string(),
            },
        );
        self
    }

    /// Command lines executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CommandRunner for MockRunner {
    fn execute(&self, request: &ExecRequest) -> ExecOutcome {
        let line = request.command_line();
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.clone());

        self.responses
            .get(&line)
            .cloned()
            .unwrap_or_else(|| ExecOutcome::LaunchFailed {
                reason: NOT_FOUND.to_string(),
            })
    }
}
