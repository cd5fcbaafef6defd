// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Sprout.
//!
//! Pure logic over strings and values: context checking, classification of
//! tool output, report rendering and project-file rewrites. All I/O and
//! process spawning is reached through ports defined in the application
//! layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process or network calls
//! - **Few crates**: std + thiserror + regex + serde derives
//! - **Values, not services**: findings and results are plain data
//!
pub mod context;
pub mod environment;
pub mod error;
pub mod report;
pub mod rewrite;
pub mod validation;

pub use context::{
    ContextDefaults, OPTIONAL_FIELDS, REQUIRED_FIELDS, TemplateContext, canonical_key, fields,
};

pub use environment::{
    DEFAULT_DEPLOYMENT_TARGET, Detection, EnvironmentPolicy, EnvironmentReport, Issue, Severity,
    Tool, ToolFinding, ToolStatus, parse_major_minor,
};

pub use error::{DomainError, ErrorCategory};

pub use report::RequirementsReporter;

pub use rewrite::{
    BundleSuffixCase, PLACEHOLDER_BUNDLE_ID, ProjectLayout, Rewrite, bundle_identifier,
    renamed_scheme, replace_references, rewrite_bundle_identifier, rewrite_deployment_target,
};

pub use validation::{
    ContextValidator, InputValidator, PresenceValidator, ValidationMode, ValidationPolicy,
    ValidationResult, check_required_fields,
};
