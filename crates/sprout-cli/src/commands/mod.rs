//! Command handlers. Each one turns parsed arguments into a call on the
//! core services and renders the result.

pub mod completions;
pub mod config;
pub mod doctor;
pub mod finalize;
pub mod init;
pub mod prepare;
pub mod validate;

use sprout_adapters::{JsonContextStore, LocalFilesystem, SystemCommandRunner};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Production adapters shared by the project commands.
pub(crate) struct Adapters {
    pub filesystem: LocalFilesystem,
    pub runner: SystemCommandRunner,
    pub store: JsonContextStore<LocalFilesystem>,
}

impl Adapters {
    pub fn new(config: &AppConfig) -> CliResult<Self> {
        let filesystem = LocalFilesystem::new();
        let runner = SystemCommandRunner::new().map_err(|e| CliError::ProcessUnavailable {
            message: e.to_string(),
        })?;
        let store = JsonContextStore::with_file_name(filesystem, &config.template.handoff_file);
        Ok(Self {
            filesystem,
            runner,
            store,
        })
    }
}
