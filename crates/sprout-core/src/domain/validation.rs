//! Input validation for the template context.
//!
//! Every rule is a pure function from a field value to a [`ValidationResult`].
//! Results are folded together; nothing here keeps state between calls and
//! nothing here fails: problems are data, not `Err`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::DomainError;
use super::context::{TemplateContext, fields};

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("project name regex"));

static BUNDLE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").expect("bundle identifier regex")
});

static PLATFORM_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("platform version regex"));

static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(-[a-zA-Z0-9.-]+)?(\+[a-zA-Z0-9.-]+)?$").expect("semver regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

// ── ValidationResult ─────────────────────────────────────────────────────────

/// Outcome of one or more validation rules.
///
/// Invariant: the result has failed iff `errors` is non-empty. Warnings never
/// affect [`passed`](Self::passed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    /// A result with no findings.
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            warnings: vec![message.into()],
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Append `other`'s findings after this result's, preserving order.
    pub fn merge(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    /// `(passed, errors, warnings)`.
    pub fn into_parts(self) -> (bool, Vec<String>, Vec<String>) {
        (self.errors.is_empty(), self.errors, self.warnings)
    }
}

impl FromIterator<ValidationResult> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationResult>>(iter: I) -> Self {
        iter.into_iter().fold(Self::valid(), Self::merge)
    }
}

// ── Policy ───────────────────────────────────────────────────────────────────

/// Tunable bounds for the field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_project_name_len: usize,
    pub max_organization_len: usize,
    /// Inclusive window of supported platform major versions.
    pub min_platform_major: u32,
    pub max_platform_major: u32,
    /// Lowercase names that draw a warning when used as the project name.
    pub reserved_words: Vec<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_project_name_len: 50,
            max_organization_len: 100,
            min_platform_major: 13,
            max_platform_major: 18,
            reserved_words: ["ios", "swift", "xcode", "cocoa", "app", "test", "main"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

// ── Validator capability ─────────────────────────────────────────────────────

/// Something that can judge a whole template context.
#[cfg_attr(test, mockall::automock)]
pub trait ContextValidator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Required-key presence plus whatever field rules the implementation applies.
    fn validate_context(&self, context: &TemplateContext) -> ValidationResult;
}

/// One error per required key absent from `context`.
pub fn check_required_fields(context: &TemplateContext) -> ValidationResult {
    context
        .missing_required()
        .into_iter()
        .map(|field| ValidationResult::error(format!("Required field '{field}' is missing")))
        .collect()
}

/// Full rule set for every known field.
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    policy: ValidationPolicy,
}

impl InputValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Run the field rule for every rule-bearing key present in `context`.
    ///
    /// Missing keys are ignored here; see [`check_required_fields`].
    pub fn validate(&self, context: &TemplateContext) -> ValidationResult {
        let rules: [(&str, fn(&Self, &str) -> ValidationResult); 6] = [
            (fields::PROJECT_NAME, Self::validate_project_name),
            (
                fields::ORGANIZATION_IDENTIFIER,
                Self::validate_organization_identifier,
            ),
            (
                fields::MINIMUM_PLATFORM_VERSION,
                Self::validate_minimum_platform_version,
            ),
            (fields::VERSION_NAME, Self::validate_version_name),
            (fields::USE_DATA_FRAMEWORK, Self::validate_data_framework_choice),
            (fields::AUTHOR_EMAIL, Self::validate_author_email),
        ];

        rules
            .iter()
            .filter_map(|(field, rule)| context.get(field).map(|value| rule(self, value)))
            .collect()
    }

    pub fn validate_project_name(&self, name: &str) -> ValidationResult {
        if name.is_empty() {
            return ValidationResult::error("Project name cannot be empty");
        }

        if !PROJECT_NAME_RE.is_match(name) {
            return ValidationResult::error(
                "Project name must start with a letter and contain only letters, numbers, and underscores",
            );
        }

        if name.chars().count() > self.policy.max_project_name_len {
            return ValidationResult::error(format!(
                "Project name must be {} characters or less",
                self.policy.max_project_name_len
            ));
        }

        let lowered = name.to_lowercase();
        if self.policy.reserved_words.iter().any(|w| *w == lowered) {
            return ValidationResult::warning(format!(
                "Project name '{name}' might conflict with iOS reserved words"
            ));
        }

        ValidationResult::valid()
    }

    pub fn validate_organization_identifier(&self, org_id: &str) -> ValidationResult {
        if org_id.is_empty() {
            return ValidationResult::error("Organization identifier cannot be empty");
        }

        if !BUNDLE_ID_RE.is_match(org_id) {
            return ValidationResult::error(
                "Organization identifier must follow iOS bundle naming conventions (e.g., com.example)",
            );
        }

        if org_id.chars().count() > self.policy.max_organization_len {
            return ValidationResult::error(format!(
                "Organization identifier must be {} characters or less",
                self.policy.max_organization_len
            ));
        }

        ValidationResult::valid()
    }

    pub fn validate_minimum_platform_version(&self, version: &str) -> ValidationResult {
        if version.is_empty() {
            return ValidationResult::error("Minimum iOS version cannot be empty");
        }

        if !PLATFORM_VERSION_RE.is_match(version) {
            return ValidationResult::error("Minimum iOS version must be in format X.Y (e.g., 15.0)");
        }

        // digits only at this point; overflow is the one way to fail
        let Some(major) = version
            .split('.')
            .next()
            .and_then(|m| m.parse::<u32>().ok())
        else {
            return ValidationResult::error("Invalid iOS version format");
        };

        let (lo, hi) = (self.policy.min_platform_major, self.policy.max_platform_major);
        if major < lo || major > hi {
            return ValidationResult::warning(format!(
                "Minimum iOS version should be between {lo}.0 and {hi}.0 for best compatibility"
            ));
        }

        ValidationResult::valid()
    }

    pub fn validate_version_name(&self, version: &str) -> ValidationResult {
        if version.is_empty() {
            return ValidationResult::error("Version name cannot be empty");
        }

        if !SEMVER_RE.is_match(version) {
            return ValidationResult::warning(
                "Version name should follow semantic versioning (e.g., 1.0.0)",
            );
        }

        ValidationResult::valid()
    }

    pub fn validate_data_framework_choice(&self, choice: &str) -> ValidationResult {
        if choice.eq_ignore_ascii_case("true") || choice.eq_ignore_ascii_case("false") {
            ValidationResult::valid()
        } else {
            ValidationResult::error("SwiftData choice must be 'true' or 'false'")
        }
    }

    pub fn validate_author_email(&self, email: &str) -> ValidationResult {
        if email.is_empty() {
            return ValidationResult::warning("Email address is empty (optional but recommended)");
        }

        if !EMAIL_RE.is_match(email) {
            return ValidationResult::error("Invalid email address format");
        }

        ValidationResult::valid()
    }
}

impl ContextValidator for InputValidator {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn validate_context(&self, context: &TemplateContext) -> ValidationResult {
        check_required_fields(context).merge(self.validate(context))
    }
}

/// Only checks that required keys are present.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceValidator;

impl ContextValidator for PresenceValidator {
    fn name(&self) -> &'static str {
        "presence"
    }

    fn validate_context(&self, context: &TemplateContext) -> ValidationResult {
        check_required_fields(context)
    }
}

/// Which [`ContextValidator`] to run, chosen from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Strict,
    Presence,
}

impl ValidationMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Presence => "presence",
        }
    }

    pub fn build(self, policy: ValidationPolicy) -> Box<dyn ContextValidator> {
        match self {
            Self::Strict => Box::new(InputValidator::new(policy)),
            Self::Presence => Box::new(PresenceValidator),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" | "full" => Ok(Self::Strict),
            "presence" | "minimal" => Ok(Self::Presence),
            other => Err(DomainError::UnknownVariant {
                kind: "validation mode",
                value: other.to_string(),
            }),
        }
    }
}
