//! Real process execution with a hard time limit.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use sprout_core::application::ports::{CommandRunner, ToolCommand};
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::runtime::{Builder, Runtime};
use tokio::time::timeout;
use tracing::{debug, trace};

/// Why a command produced no usable output.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' timed out after {}s", .limit.as_secs_f32())]
    TimedOut { program: String, limit: Duration },

    #[error("'{program}' exited with status {}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Failed { program: String, code: Option<i32> },

    #[error("'{program}' wrote non UTF-8 output")]
    NonUtf8 { program: String },
}

/// Runs commands on the host through a private current-thread runtime.
///
/// The child is killed when its time limit expires.
pub struct SystemCommandRunner {
    runtime: Runtime,
}

impl SystemCommandRunner {
    pub fn new() -> Result<Self, ProcessError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProcessError::Runtime)?;
        Ok(Self { runtime })
    }

    /// Trimmed stdout, or why there is none.
    pub fn output(&self, command: &ToolCommand, limit: Duration) -> Result<String, ProcessError> {
        let program = command.program.clone();

        self.runtime.block_on(async move {
            let mut child = TokioCommand::new(&command.program);
            child
                .args(&command.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = match timeout(limit, child.output()).await {
                Ok(result) => result.map_err(|source| ProcessError::Spawn {
                    program: program.clone(),
                    source,
                })?,
                Err(_) => return Err(ProcessError::TimedOut { program, limit }),
            };

            if !output.status.success() {
                return Err(ProcessError::Failed {
                    program,
                    code: output.status.code(),
                });
            }

            String::from_utf8(output.stdout)
                .map(|s| s.trim().to_string())
                .map_err(|_| ProcessError::NonUtf8 { program })
        })
    }
}

impl std::fmt::Debug for SystemCommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemCommandRunner").finish_non_exhaustive()
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &ToolCommand, limit: Duration) -> Option<String> {
        match self.output(command, limit) {
            Ok(out) => {
                trace!(%command, bytes = out.len(), "Command succeeded");
                Some(out)
            }
            Err(e) => {
                debug!(%command, error = %e, "Command unavailable");
                None
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runner() -> SystemCommandRunner {
        SystemCommandRunner::new().unwrap()
    }

    #[test]
    fn captures_trimmed_stdout() {
        let out = runner().run(
            &ToolCommand::new("echo", &["Xcode 15.2"]),
            Duration::from_secs(5),
        );
        assert_eq!(out.as_deref(), Some("Xcode 15.2"));
    }

    #[test]
    fn missing_program_is_none() {
        let cmd = ToolCommand::new("sprout-no-such-tool-xyz", &["--version"]);
        assert!(matches!(
            runner().output(&cmd, Duration::from_secs(5)),
            Err(ProcessError::Spawn { .. })
        ));
        assert_eq!(runner().run(&cmd, Duration::from_secs(5)), None);
    }

    #[test]
    fn non_zero_exit_is_none() {
        let cmd = ToolCommand::new("false", &[]);
        assert!(matches!(
            runner().output(&cmd, Duration::from_secs(5)),
            Err(ProcessError::Failed { .. })
        ));
    }

    #[test]
    fn slow_command_times_out() {
        let cmd = ToolCommand::new("sleep", &["5"]);
        let started = std::time::Instant::now();
        let result = runner().output(&cmd, Duration::from_millis(200));
        assert!(matches!(result, Err(ProcessError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
