//! `Logger` port backed by the terminal.

use sprout_adapters::TracingLogger;
use sprout_core::application::ports::Logger;
use tracing::debug;

use crate::config::{AppConfig, ProgressSink};
use crate::output::OutputManager;

/// Pipeline progress rendered through the [`OutputManager`].
///
/// Terminal write failures are dropped; progress is best effort.
pub struct ConsoleLogger<'a> {
    output: &'a OutputManager,
}

impl<'a> ConsoleLogger<'a> {
    pub fn new(output: &'a OutputManager) -> Self {
        Self { output }
    }
}

impl Logger for ConsoleLogger<'_> {
    fn info(&self, message: &str) {
        let _ = self.output.info(message);
    }

    fn success(&self, message: &str) {
        let _ = self.output.success(message);
    }

    fn warning(&self, message: &str) {
        let _ = self.output.warning(message);
    }

    fn error(&self, message: &str) {
        let _ = self.output.error(message);
    }

    fn debug(&self, message: &str) {
        let _ = self.output.detail(message);
    }

    fn step(&self, current: usize, total: usize, message: &str) {
        let _ = self.output.step(current, total, message);
    }

    fn section(&self, title: &str) {
        let _ = self.output.print("");
        let _ = self.output.header(title);
    }
}

/// Pick the progress sink for this run.
///
/// JSON output always goes to `tracing` so stdout stays a single document.
pub fn select_logger<'a>(config: &AppConfig, output: &'a OutputManager) -> Box<dyn Logger + 'a> {
    let sink = if output.is_json() {
        ProgressSink::Tracing
    } else {
        config.output.sink
    };
    debug!(?sink, "Progress sink selected");

    match sink {
        ProgressSink::Console => Box::new(ConsoleLogger::new(output)),
        ProgressSink::Tracing => Box::new(TracingLogger::new()),
    }
}
