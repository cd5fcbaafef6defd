// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Field-level validation problems are *not* errors here: they are collected
/// as values in a [`ValidationResult`](super::ValidationResult). This enum
/// covers the cases where a domain object cannot be built at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Context construction
    // ========================================================================
    #[error("Template context is malformed: {0}")]
    MalformedContext(String),

    #[error("Cannot derive a project name from '{path}'")]
    UnnamedProject { path: String },

    // ========================================================================
    // Parsing of configuration-facing values
    // ========================================================================
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    // ========================================================================
    // Rewrite preconditions
    // ========================================================================
    #[error("Placeholder name cannot be empty")]
    EmptyPlaceholder,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedContext(msg) => vec![
                "The handoff file must contain a single JSON object".into(),
                format!("Details: {}", msg),
                "Re-run: sprout prepare to regenerate it".into(),
            ],
            Self::UnnamedProject { path } => vec![
                format!("'{}' has no usable directory name", path),
                "Run sprout from inside the generated project directory".into(),
            ],
            Self::UnknownVariant { kind, .. } => match *kind {
                "bundle suffix case" => vec!["Use one of: preserve, lowercase".into()],
                "validation mode" => vec!["Use one of: strict, presence".into()],
                _ => vec!["See documentation for accepted values".into()],
            },
            Self::EmptyPlaceholder => vec![
                "Set template.placeholder in your configuration".into(),
                "Or pass --placeholder <NAME>".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedContext(_) | Self::UnnamedProject { .. } => ErrorCategory::Validation,
            Self::UnknownVariant { .. } | Self::EmptyPlaceholder => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Internal,
}
