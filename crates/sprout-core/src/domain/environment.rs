//! Host environment findings.
//!
//! The probe (in the application layer) runs commands; this module turns the
//! raw command output into [`ToolFinding`]s. Every classifier accepts `None`
//! for "command missing, timed out or failed" and never fails itself.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;

use super::validation::ValidationResult;

static XCODE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Xcode (\S+)").expect("xcode version regex"));

static SWIFT_DRIVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"swift-driver version: (\S+)").expect("swift driver regex"));

static SWIFT_LANG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Swift version (\S+)").expect("swift version regex"));

static HOMEBREW_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Homebrew (\S+)").expect("homebrew version regex"));

/// Default deployment target suggestion when Xcode tells us nothing.
pub const DEFAULT_DEPLOYMENT_TARGET: &str = "iOS 15.0+ (recommended)";

// ── Tool ─────────────────────────────────────────────────────────────────────

/// A host tool the probe knows about. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    Xcode,
    Swift,
    Simulator,
    CocoaPods,
    Homebrew,
    MacOs,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Xcode,
        Tool::Swift,
        Tool::Simulator,
        Tool::CocoaPods,
        Tool::Homebrew,
        Tool::MacOs,
    ];

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Xcode => "Xcode",
            Self::Swift => "Swift",
            Self::Simulator => "iOS Simulator",
            Self::CocoaPods => "CocoaPods",
            Self::Homebrew => "Homebrew",
            Self::MacOs => "macOS",
        }
    }

    /// The primary toolchain; its absence blocks the pipeline.
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Xcode)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ── Detection / status ───────────────────────────────────────────────────────

/// What the probe saw for a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Detection {
    Version(String),
    /// Present, but no version could be extracted.
    Available,
    NotDetected,
    NotInstalled,
    NotFound,
}

impl Detection {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Version(_) | Self::Available)
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Version(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(v) => f.write_str(v),
            Self::Available => f.write_str("Available"),
            Self::NotDetected => f.write_str("Not detected"),
            Self::NotInstalled => f.write_str("Not installed"),
            Self::NotFound => f.write_str("Not found"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pass,
    Warn,
    Fail,
}

impl ToolStatus {
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Warn => "⚠️",
            Self::Fail => "❌",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A finding that should surface during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// One row of the environment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFinding {
    pub tool: Tool,
    pub detection: Detection,
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<Issue>,
}

impl ToolFinding {
    fn new(tool: Tool, detection: Detection, status: ToolStatus) -> Self {
        Self {
            tool,
            detection,
            status,
            issue: None,
        }
    }

    fn with_issue(mut self, issue: Issue) -> Self {
        self.issue = Some(issue);
        self
    }
}

// ── Policy ───────────────────────────────────────────────────────────────────

/// Thresholds and probe settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentPolicy {
    /// Xcode releases older than this draw a warning.
    pub recommended_toolchain: String,
    /// macOS majors below this draw a warning.
    pub min_os_major: u32,
    pub simulator_path: PathBuf,
    pub command_timeout: Duration,
}

impl Default for EnvironmentPolicy {
    fn default() -> Self {
        Self {
            recommended_toolchain: "15.0".into(),
            min_os_major: 13,
            simulator_path: PathBuf::from(
                "/Applications/Xcode.app/Contents/Developer/Applications/Simulator.app",
            ),
            command_timeout: Duration::from_secs(10),
        }
    }
}

/// Leading `major[.minor]` of a dotted version string.
pub fn parse_major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

fn non_empty(output: Option<&str>) -> Option<&str> {
    output.map(str::trim).filter(|s| !s.is_empty())
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

// ── Classifiers ──────────────────────────────────────────────────────────────

/// `xcodebuild -version`.
pub fn xcode_finding(output: Option<&str>, policy: &EnvironmentPolicy) -> ToolFinding {
    let Some(out) = non_empty(output) else {
        return ToolFinding::new(Tool::Xcode, Detection::NotDetected, ToolStatus::Fail)
            .with_issue(Issue::error("Xcode is not installed"));
    };

    let Some(version) = capture(&XCODE_VERSION_RE, out) else {
        return ToolFinding::new(Tool::Xcode, Detection::Available, ToolStatus::Pass);
    };

    let outdated = match (
        parse_major_minor(&version),
        parse_major_minor(&policy.recommended_toolchain),
    ) {
        (Some(found), Some(wanted)) => found < wanted,
        _ => false,
    };

    if outdated {
        let message = format!(
            "Xcode {version} is older than recommended ({}+)",
            policy.recommended_toolchain
        );
        ToolFinding::new(Tool::Xcode, Detection::Version(version), ToolStatus::Warn)
            .with_issue(Issue::warning(message))
    } else {
        ToolFinding::new(Tool::Xcode, Detection::Version(version), ToolStatus::Pass)
    }
}

/// `swift --version`. Informational only.
pub fn swift_finding(output: Option<&str>) -> ToolFinding {
    let Some(out) = non_empty(output) else {
        return ToolFinding::new(Tool::Swift, Detection::NotDetected, ToolStatus::Fail);
    };

    let detection = capture(&SWIFT_DRIVER_RE, out)
        .or_else(|| capture(&SWIFT_LANG_RE, out))
        .map_or(Detection::Available, Detection::Version);
    ToolFinding::new(Tool::Swift, detection, ToolStatus::Pass)
}

/// Simulator bundle presence on disk.
pub fn simulator_finding(present: bool) -> ToolFinding {
    if present {
        ToolFinding::new(Tool::Simulator, Detection::Available, ToolStatus::Pass)
    } else {
        ToolFinding::new(Tool::Simulator, Detection::NotFound, ToolStatus::Fail)
            .with_issue(Issue::warning("iOS Simulator not found"))
    }
}

/// `sw_vers -productVersion`.
pub fn macos_finding(output: Option<&str>, policy: &EnvironmentPolicy) -> ToolFinding {
    let Some(version) = non_empty(output) else {
        return ToolFinding::new(Tool::MacOs, Detection::NotDetected, ToolStatus::Fail)
            .with_issue(Issue::warning("Could not determine macOS version"));
    };

    let outdated = parse_major_minor(version).is_some_and(|(major, _)| major < policy.min_os_major);
    let detection = Detection::Version(version.to_string());

    if outdated {
        let message = format!(
            "macOS {version} is older than recommended ({}.0+)",
            policy.min_os_major
        );
        ToolFinding::new(Tool::MacOs, detection, ToolStatus::Warn)
            .with_issue(Issue::warning(message))
    } else {
        ToolFinding::new(Tool::MacOs, detection, ToolStatus::Pass)
    }
}

/// `brew --version`.
pub fn homebrew_finding(output: Option<&str>) -> ToolFinding {
    match non_empty(output) {
        Some(out) => {
            let detection =
                capture(&HOMEBREW_VERSION_RE, out).map_or(Detection::Available, Detection::Version);
            ToolFinding::new(Tool::Homebrew, detection, ToolStatus::Pass)
        }
        None => ToolFinding::new(Tool::Homebrew, Detection::NotInstalled, ToolStatus::Warn)
            .with_issue(Issue::warning(
                "Homebrew is not installed (recommended for package management)",
            )),
    }
}

/// `pod --version`.
pub fn cocoapods_finding(output: Option<&str>) -> ToolFinding {
    match non_empty(output) {
        Some(out) => {
            let version = out.lines().next().unwrap_or(out).trim().to_string();
            ToolFinding::new(Tool::CocoaPods, Detection::Version(version), ToolStatus::Pass)
        }
        None => ToolFinding::new(Tool::CocoaPods, Detection::NotInstalled, ToolStatus::Warn)
            .with_issue(Issue::warning(
                "CocoaPods is not installed (optional dependency manager)",
            )),
    }
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Tool -> finding, in [`Tool`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentReport {
    findings: BTreeMap<Tool, ToolFinding>,
}

impl EnvironmentReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the finding for `finding.tool`.
    pub fn record(&mut self, finding: ToolFinding) {
        self.findings.insert(finding.tool, finding);
    }

    pub fn get(&self, tool: Tool) -> Option<&ToolFinding> {
        self.findings.get(&tool)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolFinding> {
        self.findings.values()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Text for the version column; "Not checked" when the tool was never probed.
    pub fn detection_text(&self, tool: Tool) -> String {
        self.get(tool)
            .map_or_else(|| "Not checked".to_string(), |f| f.detection.to_string())
    }

    pub fn status(&self, tool: Tool) -> Option<ToolStatus> {
        self.get(tool).map(|f| f.status)
    }

    pub fn toolchain_version(&self) -> Option<&str> {
        self.get(Tool::Xcode).and_then(|f| f.detection.version())
    }

    /// Issues folded into validation errors and warnings.
    pub fn findings(&self) -> ValidationResult {
        self.iter()
            .filter_map(|f| f.issue.as_ref())
            .map(|issue| match issue.severity {
                Severity::Error => ValidationResult::error(issue.message.clone()),
                Severity::Warning => ValidationResult::warning(issue.message.clone()),
            })
            .collect()
    }

    /// Deployment target suggestion derived from the detected Xcode release.
    pub fn recommended_deployment_target(&self) -> &'static str {
        match self.toolchain_version().and_then(parse_major_minor) {
            Some((major, _)) if major >= 15 => DEFAULT_DEPLOYMENT_TARGET,
            Some((14, _)) => "iOS 14.0+",
            Some(_) => "iOS 13.0+",
            None => DEFAULT_DEPLOYMENT_TARGET,
        }
    }
}

impl FromIterator<ToolFinding> for EnvironmentReport {
    fn from_iter<I: IntoIterator<Item = ToolFinding>>(iter: I) -> Self {
        let mut report = Self::new();
        for finding in iter {
            report.record(finding);
        }
        report
    }
}
