//! Infrastructure adapters for Sprout.
//!
//! This crate implements the ports defined in `sprout-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod context_store;
pub mod filesystem;
pub mod logger;
pub mod process;

// Re-export commonly used adapters
pub use context_store::{DEFAULT_HANDOFF_FILE, JsonContextStore};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use logger::{RecordingLogger, TracingLogger};
pub use process::{ProcessError, StaticCommandRunner, SystemCommandRunner};
