//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! post-generation use cases: probe, validate, transform, finalize.

pub mod environment_service;
pub mod finalize_service;
pub mod transform_service;
pub mod validation_service;

#[cfg(test)]
pub(crate) mod fakes;

pub use environment_service::EnvironmentProbe;
pub use finalize_service::{
    Assessment, ContextSource, DEFAULT_PLACEHOLDER, DEFAULT_REQUIREMENTS_FILE, FinalizeOptions,
    FinalizeOutcome, FinalizeService, PrepareOptions,
};
pub use transform_service::{
    FileUpdate, ProjectTransformer, StepFailure, TransformStep, TransformSummary,
};
pub use validation_service::{report_validation, validate_all};
