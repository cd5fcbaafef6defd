//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Blocking validation errors; the project tree was not touched.
    #[error("Validation failed with {} error(s)", .errors.len())]
    ValidationFailed {
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    /// The handoff file exists but could not be used.
    #[error("Cannot read handoff file {path}: {reason}")]
    HandoffUnreadable { path: PathBuf, reason: String },

    /// The handoff file is already there and overwriting was not requested.
    #[error("Handoff file already exists at {path}")]
    HandoffExists { path: PathBuf },

    /// The project directory does not exist.
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed { errors, .. } => {
                let mut out: Vec<String> = errors.iter().map(|e| format!("Fix: {e}")).collect();
                out.push("No project files were modified".into());
                out.push("Re-run: sprout validate to check the context only".into());
                out
            }
            Self::HandoffUnreadable { path, .. } => vec![
                format!("Inspect or delete: {}", path.display()),
                "The file must contain a single JSON object".into(),
                "Regenerate it with: sprout prepare".into(),
            ],
            Self::HandoffExists { path } => vec![
                format!("File already present: {}", path.display()),
                "Use --force to overwrite it".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("Directory does not exist: {}", path.display()),
                "Pass the generated project directory as the first argument".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationFailed { .. } | Self::HandoffUnreadable { .. } => {
                ErrorCategory::Validation
            }
            Self::HandoffExists { .. } => ErrorCategory::Validation,
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
