//! Application layer for Sprout.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (probe, validation, transform, finalize)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    Assessment, ContextSource, DEFAULT_PLACEHOLDER, DEFAULT_REQUIREMENTS_FILE, EnvironmentProbe,
    FinalizeOptions, FinalizeOutcome, FinalizeService, PrepareOptions, ProjectTransformer,
    TransformStep, TransformSummary, report_validation, validate_all,
};

pub use ports::{CommandRunner, ContextStore, Filesystem, Logger, ToolCommand};

pub use error::ApplicationError;
