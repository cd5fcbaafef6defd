//! Sprout Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Sprout, the
//! finishing step that runs after an iOS project template has been rendered.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           sprout-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (FinalizeService, EnvironmentProbe,    │
//! │   ProjectTransformer, validate_all)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, CommandRunner, Logger,     │
//! │  ContextStore)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     sprout-adapters (Infrastructure)    │
//! │ (LocalFilesystem, SystemCommandRunner,  │
//! │  JsonContextStore, TracingLogger)       │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (TemplateContext, InputValidator,       │
//! │  EnvironmentReport, rewrites)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sprout_core::application::{FinalizeOptions, FinalizeService};
//!
//! // adapters come from sprout-adapters
//! let service = FinalizeService::new(filesystem, runner, store, logger);
//! let outcome = service.finalize("./MyApp", &FinalizeOptions::default())?;
//! println!("{}", outcome.bundle_identifier);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        EnvironmentProbe, FinalizeOptions, FinalizeOutcome, FinalizeService, ProjectTransformer,
        TransformSummary, validate_all,
        ports::{CommandRunner, ContextStore, Filesystem, Logger, ToolCommand},
    };
    pub use crate::domain::{
        BundleSuffixCase, ContextDefaults, ContextValidator, EnvironmentPolicy, EnvironmentReport,
        InputValidator, ProjectLayout, RequirementsReporter, TemplateContext, ValidationMode,
        ValidationPolicy, ValidationResult,
    };
    pub use crate::error::{SproutError, SproutResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
