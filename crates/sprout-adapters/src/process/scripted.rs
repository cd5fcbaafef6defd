//! Scripted command runner for tests and dry runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sprout_core::application::ports::{CommandRunner, ToolCommand};

/// Answers by program name; unknown programs behave as "not found".
///
/// Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct StaticCommandRunner {
    responses: HashMap<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticCommandRunner {
    /// A host where nothing is installed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, program: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses.insert(program.into(), output.into());
        self
    }

    /// A typical macOS host with a current Xcode.
    pub fn macos_with_xcode() -> Self {
        Self::new()
            .with_output("xcodebuild", "Xcode 15.2\nBuild version 15C500b")
            .with_output(
                "swift",
                "swift-driver version: 1.87.3 Apple Swift version 5.9.2 (swiftlang-5.9.2.2.56 clang-1500.1.0.2.5)",
            )
            .with_output("sw_vers", "14.2.1")
            .with_output("brew", "Homebrew 4.2.0")
            .with_output("pod", "1.15.2")
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for StaticCommandRunner {
    fn run(&self, command: &ToolCommand, _timeout: Duration) -> Option<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }
        self.responses.get(&command.program).cloned()
    }
}
