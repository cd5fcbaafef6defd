//! Logger port implementations that do not need a terminal.

use std::sync::{Arc, Mutex};

use sprout_core::application::ports::Logger;
use tracing::{debug, error, info, warn};

/// Forwards progress lines to `tracing` events under the `sprout::progress` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "sprout::progress", "{message}");
    }

    fn success(&self, message: &str) {
        info!(target: "sprout::progress", success = true, "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "sprout::progress", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "sprout::progress", "{message}");
    }

    fn debug(&self, message: &str) {
        debug!(target: "sprout::progress", "{message}");
    }

    fn step(&self, current: usize, total: usize, message: &str) {
        info!(target: "sprout::progress", step = current, of = total, "{message}");
    }

    fn section(&self, title: &str) {
        info!(target: "sprout::progress", section = true, "{title}");
    }
}

/// Level of a recorded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
    Debug,
    Step,
    Section,
}

/// Keeps every line in memory. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Messages recorded at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: Level, message: impl Into<String>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.into()));
        }
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.record(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.record(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }

    fn debug(&self, message: &str) {
        self.record(Level::Debug, message);
    }

    fn step(&self, current: usize, total: usize, message: &str) {
        self.record(Level::Step, format!("Step {current}/{total}: {message}"));
    }

    fn section(&self, title: &str) {
        self.record(Level::Section, title);
    }
}
