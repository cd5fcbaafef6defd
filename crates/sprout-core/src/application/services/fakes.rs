//! In-process doubles shared by the service tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::{
    ApplicationError,
    ports::{Filesystem, Logger},
};
use crate::error::SproutResult;

/// Files as a path -> content map. Directories are implied by file paths
/// plus whatever `create_dir_all` registered.
#[derive(Default)]
pub struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    read_only: Mutex<BTreeSet<PathBuf>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
        self
    }

    /// Writes to `path` fail from now on.
    pub fn deny_writes(self, path: impl Into<PathBuf>) -> Self {
        self.read_only.lock().unwrap().insert(path.into());
        self
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }

    fn fail(path: &Path, reason: &str) -> crate::error::SproutError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
        .into()
    }
}

impl Filesystem for FakeFs {
    fn read_to_string(&self, path: &Path) -> SproutResult<String> {
        self.content(path).ok_or_else(|| Self::fail(path, "not found"))
    }

    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()> {
        if self.read_only.lock().unwrap().contains(path) {
            return Err(Self::fail(path, "permission denied"));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> SproutResult<()> {
        let mut files = self.files.lock().unwrap();
        let content = files.remove(from).ok_or_else(|| Self::fail(from, "not found"))?;
        files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().keys().any(|p| p.starts_with(path))
            || self.dirs.lock().unwrap().contains(path)
    }

    fn list_files(&self, path: &Path) -> SproutResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn remove_file(&self, path: &Path) -> SproutResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> SproutResult<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}

/// Keeps every line, prefixed with its level.
#[derive(Default)]
pub struct Lines(RefCell<Vec<String>>);

impl Lines {
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|l| l.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn push(&self, level: &str, message: &str) {
        self.0.borrow_mut().push(format!("{level}: {message}"));
    }
}

impl Logger for Lines {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warning(&self, message: &str) {
        self.push("warning", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }

    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn step(&self, current: usize, total: usize, message: &str) {
        self.push("step", &format!("{current}/{total} {message}"));
    }

    fn section(&self, title: &str) {
        self.push("section", title);
    }
}
