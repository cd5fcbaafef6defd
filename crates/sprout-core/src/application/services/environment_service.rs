//! Environment Probe - read-only survey of the host toolchain.
//!
//! Every external invocation goes through the [`CommandRunner`] port; a
//! missing, failing or slow command is indistinguishable from "not detected".

use tracing::{debug, instrument};

use crate::{
    application::ports::{CommandRunner, Filesystem, ToolCommand},
    domain::{
        EnvironmentPolicy, EnvironmentReport, Tool, ToolFinding,
        environment::{
            cocoapods_finding, homebrew_finding, macos_finding, simulator_finding, swift_finding,
            xcode_finding,
        },
    },
};

/// Probes the host for the tools an iOS project needs.
pub struct EnvironmentProbe<'a> {
    runner: &'a dyn CommandRunner,
    filesystem: &'a dyn Filesystem,
    policy: EnvironmentPolicy,
}

impl<'a> EnvironmentProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            runner,
            filesystem,
            policy: EnvironmentPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: EnvironmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &EnvironmentPolicy {
        &self.policy
    }

    /// Run every sub-check. Never fails.
    #[instrument(skip_all, fields(timeout_secs = self.policy.command_timeout.as_secs()))]
    pub fn check(&self) -> EnvironmentReport {
        let report: EnvironmentReport = Tool::ALL.iter().map(|tool| self.check_tool(*tool)).collect();
        debug!(tools = report.len(), "Environment probe finished");
        report
    }

    fn check_tool(&self, tool: Tool) -> ToolFinding {
        match tool {
            Tool::Xcode => xcode_finding(
                self.output("xcodebuild", &["-version"]).as_deref(),
                &self.policy,
            ),
            Tool::Swift => swift_finding(self.output("swift", &["--version"]).as_deref()),
            Tool::Simulator => simulator_finding(self.filesystem.exists(&self.policy.simulator_path)),
            Tool::CocoaPods => cocoapods_finding(self.output("pod", &["--version"]).as_deref()),
            Tool::Homebrew => homebrew_finding(self.output("brew", &["--version"]).as_deref()),
            Tool::MacOs => macos_finding(
                self.output("sw_vers", &["-productVersion"]).as_deref(),
                &self.policy,
            ),
        }
    }

    fn output(&self, program: &str, args: &[&str]) -> Option<String> {
        let command = ToolCommand::new(program, args);
        let output = self.runner.run(&command, self.policy.command_timeout);
        debug!(%command, detected = output.is_some(), "Probed");
        output
    }
}
