//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `sprout-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations on the generated project
//!   - `CommandRunner`: Bounded external diagnostic commands
//!   - `ContextStore`: The handoff file
//!   - `Logger`: User-facing progress lines
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{CommandRunner, ContextStore, Filesystem, Logger, ToolCommand};

#[cfg(test)]
pub use output::{MockCommandRunner, MockContextStore, MockFilesystem, MockLogger};
