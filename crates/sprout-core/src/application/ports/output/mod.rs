//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `sprout-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::TemplateContext;
use crate::error::SproutResult;

/// Port for filesystem operations on the generated project.
///
/// Implemented by:
/// - `sprout_adapters::filesystem::LocalFilesystem` (production)
/// - `sprout_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> SproutResult<String>;

    /// Replace the whole content of a file, creating it if needed.
    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()>;

    /// Move a file within the same directory tree.
    fn rename(&self, from: &Path, to: &Path) -> SproutResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Regular files directly inside `path`, sorted by name.
    fn list_files(&self, path: &Path) -> SproutResult<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> SproutResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SproutResult<()>;
}

/// An external diagnostic command, e.g. `xcodebuild -version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Port for running external commands with a time bound.
///
/// Implemented by:
/// - `sprout_adapters::process::SystemCommandRunner` (production)
/// - `sprout_adapters::process::StaticCommandRunner` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Trimmed stdout of a successful run.
    ///
    /// `None` for "not found", non-zero exit, timeout or unreadable output.
    fn run(&self, command: &ToolCommand, timeout: Duration) -> Option<String>;
}

/// Port for the handoff file written before generation and read after it.
///
/// Implemented by:
/// - `sprout_adapters::context_store::JsonContextStore`
#[cfg_attr(test, mockall::automock)]
pub trait ContextStore: Send + Sync {
    /// Where the handoff file lives for `project_dir`.
    fn location(&self, project_dir: &Path) -> PathBuf;

    /// `Ok(None)` when no handoff file exists; `Err` when it exists but is unusable.
    fn load(&self, project_dir: &Path) -> SproutResult<Option<TemplateContext>>;

    fn save(&self, project_dir: &Path, context: &TemplateContext) -> SproutResult<PathBuf>;

    /// Remove the handoff file. Absence is not an error.
    fn discard(&self, project_dir: &Path) -> SproutResult<()>;
}

/// Port for user-facing progress messages.
///
/// Implemented by:
/// - `sprout_cli::progress::ConsoleLogger` (coloured terminal lines)
/// - `sprout_adapters::logger::TracingLogger`
/// - `sprout_adapters::logger::RecordingLogger` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Logger {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);

    /// `Step {current}/{total}: {message}`
    fn step(&self, current: usize, total: usize, message: &str);

    fn section(&self, title: &str);
}
