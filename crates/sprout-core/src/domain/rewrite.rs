//! Pure text rewrites applied to a generated Xcode project.
//!
//! The transformer service does the file I/O; everything that decides *what*
//! the new bytes are lives here so it can be tested without a filesystem.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Bundle identifier baked into the template's project descriptor.
pub const PLACEHOLDER_BUNDLE_ID: &str = "com.example";

static BUNDLE_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"PRODUCT_BUNDLE_IDENTIFIER = "{}";"#,
        regex::escape(PLACEHOLDER_BUNDLE_ID)
    ))
    .expect("bundle assignment regex")
});

static DEPLOYMENT_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"IPHONEOS_DEPLOYMENT_TARGET = \d+\.\d+;").expect("deployment target regex")
});

// ── Layout ───────────────────────────────────────────────────────────────────

/// Where the interesting files live inside a generated project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub project_extension: String,
    /// Relative to the project bundle.
    pub descriptor: PathBuf,
    /// Relative to the project bundle.
    pub workspace_descriptor: PathBuf,
    /// Relative to the project bundle.
    pub schemes_dir: PathBuf,
    pub scheme_extension: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            project_extension: "xcodeproj".into(),
            descriptor: PathBuf::from("project.pbxproj"),
            workspace_descriptor: PathBuf::from("project.xcworkspace")
                .join("contents.xcworkspacedata"),
            schemes_dir: PathBuf::from("xcshareddata").join("xcschemes"),
            scheme_extension: "xcscheme".into(),
        }
    }
}

impl ProjectLayout {
    /// `<project_dir>/<name>.<ext>`
    pub fn bundle_dir(&self, project_dir: &Path, name: &str) -> PathBuf {
        project_dir.join(format!("{name}.{}", self.project_extension))
    }

    pub fn descriptor_path(&self, project_dir: &Path, name: &str) -> PathBuf {
        self.bundle_dir(project_dir, name).join(&self.descriptor)
    }

    pub fn workspace_descriptor_path(&self, project_dir: &Path, name: &str) -> PathBuf {
        self.bundle_dir(project_dir, name)
            .join(&self.workspace_descriptor)
    }

    /// Files whose contents get the placeholder -> name substitution.
    pub fn reference_files(&self, project_dir: &Path, name: &str) -> [PathBuf; 2] {
        [
            self.descriptor_path(project_dir, name),
            self.workspace_descriptor_path(project_dir, name),
        ]
    }

    pub fn schemes_path(&self, project_dir: &Path, name: &str) -> PathBuf {
        self.bundle_dir(project_dir, name).join(&self.schemes_dir)
    }
}

// ── Bundle identifier ────────────────────────────────────────────────────────

/// How the project name is cased when appended to the organization identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleSuffixCase {
    /// `com.example.MyApp`
    #[default]
    Preserve,
    /// `com.example.myapp`
    Lowercase,
}

impl BundleSuffixCase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Lowercase => "lowercase",
        }
    }

    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Preserve => name.to_string(),
            Self::Lowercase => name.to_lowercase(),
        }
    }
}

impl fmt::Display for BundleSuffixCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundleSuffixCase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" | "as-is" => Ok(Self::Preserve),
            "lowercase" | "lower" => Ok(Self::Lowercase),
            other => Err(DomainError::UnknownVariant {
                kind: "bundle suffix case",
                value: other.to_string(),
            }),
        }
    }
}

/// `<organization>.<name>` with the suffix cased per `case`.
pub fn bundle_identifier(organization: &str, name: &str, case: BundleSuffixCase) -> String {
    format!("{organization}.{}", case.apply(name))
}

// ── Rewrites ─────────────────────────────────────────────────────────────────

/// Result of a content rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'a> {
    pub content: Cow<'a, str>,
    pub replacements: usize,
}

impl<'a> Rewrite<'a> {
    fn finish(original: &'a str, content: Cow<'a, str>, replacements: usize) -> Self {
        Self {
            content,
            replacements,
        }
        .normalise(original)
    }

    // a rewrite that reproduces its input is not a change
    fn normalise(self, original: &'a str) -> Self {
        if self.content.as_ref() == original {
            Self {
                content: Cow::Borrowed(original),
                replacements: self.replacements,
            }
        } else {
            self
        }
    }

    /// `true` when the output differs from the input.
    pub fn changed(&self) -> bool {
        matches!(self.content, Cow::Owned(_))
    }
}

/// Literal, untokenised replacement of every `old` with `new`.
pub fn replace_references<'a>(
    content: &'a str,
    old: &str,
    new: &str,
) -> Result<Rewrite<'a>, DomainError> {
    if old.is_empty() {
        return Err(DomainError::EmptyPlaceholder);
    }

    let replacements = content.matches(old).count();
    if replacements == 0 {
        return Ok(Rewrite::finish(content, Cow::Borrowed(content), 0));
    }

    Ok(Rewrite::finish(
        content,
        Cow::Owned(content.replace(old, new)),
        replacements,
    ))
}

/// New file name for a scheme named `<old>*.<extension>`, or `None` if the
/// file is not one of the template's schemes.
pub fn renamed_scheme(file_name: &str, old: &str, new: &str, extension: &str) -> Option<String> {
    if old.is_empty() {
        return None;
    }

    let suffix = format!(".{extension}");
    if file_name.starts_with(old) && file_name.ends_with(&suffix) {
        Some(file_name.replace(old, new))
    } else {
        None
    }
}

/// Replace every placeholder bundle-identifier assignment with `bundle_id`.
pub fn rewrite_bundle_identifier<'a>(content: &'a str, bundle_id: &str) -> Rewrite<'a> {
    let replacements = BUNDLE_ASSIGNMENT_RE.find_iter(content).count();
    let assignment = format!(r#"PRODUCT_BUNDLE_IDENTIFIER = "{bundle_id}";"#);
    let rewritten = BUNDLE_ASSIGNMENT_RE.replace_all(content, NoExpand(&assignment));
    Rewrite::finish(content, rewritten, replacements)
}

/// Replace every deployment-target assignment's value with `version`.
pub fn rewrite_deployment_target<'a>(content: &'a str, version: &str) -> Rewrite<'a> {
    let replacements = DEPLOYMENT_TARGET_RE.find_iter(content).count();
    let assignment = format!("IPHONEOS_DEPLOYMENT_TARGET = {version};");
    let rewritten = DEPLOYMENT_TARGET_RE.replace_all(content, NoExpand(&assignment));
    Rewrite::finish(content, rewritten, replacements)
}
