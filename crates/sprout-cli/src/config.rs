//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the option structs built
//! from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SPROUT_<SECTION>__<KEY>`, e.g.
//!    `SPROUT_ENVIRONMENT__CHECK=false`
//! 3. `.sprout.toml` in the current directory
//! 4. Config file (`--config`, or the platform config directory)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use sprout_adapters::DEFAULT_HANDOFF_FILE;
use sprout_core::{
    application::{DEFAULT_PLACEHOLDER, DEFAULT_REQUIREMENTS_FILE, FinalizeOptions},
    domain::{
        BundleSuffixCase, ContextDefaults, EnvironmentPolicy, ValidationMode, ValidationPolicy,
    },
};

/// File name of the per-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".sprout.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template names and fallback answers.
    pub template: TemplateConfig,
    pub validation: ValidationConfig,
    /// Host probe settings.
    pub environment: EnvironmentConfig,
    /// Output settings.
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Name baked into the template before generation.
    pub placeholder: String,
    pub handoff_file: String,
    pub requirements_file: String,
    pub organization_identifier: String,
    pub minimum_platform_version: String,
    pub version_name: String,
    pub use_data_framework: bool,
    pub bundle_suffix_case: BundleSuffixCase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
    pub min_platform_major: u32,
    pub max_platform_major: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Probe the host during `finalize` and `validate`.
    pub check: bool,
    pub command_timeout_secs: u64,
    pub recommended_xcode: String,
    pub min_macos_major: u32,
    pub simulator_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
    /// Where pipeline progress goes.
    pub sink: ProgressSink,
}

/// Destination of pipeline progress lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressSink {
    /// Coloured lines on stdout.
    #[default]
    Console,
    /// `tracing` events only.
    Tracing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also append log events to this file.
    pub file: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let defaults = ContextDefaults::default();
        Self {
            placeholder: DEFAULT_PLACEHOLDER.into(),
            handoff_file: DEFAULT_HANDOFF_FILE.into(),
            requirements_file: DEFAULT_REQUIREMENTS_FILE.into(),
            organization_identifier: defaults.organization_identifier,
            minimum_platform_version: defaults.minimum_platform_version,
            version_name: defaults.version_name,
            use_data_framework: defaults.use_data_framework,
            bundle_suffix_case: BundleSuffixCase::default(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let policy = ValidationPolicy::default();
        Self {
            mode: ValidationMode::default(),
            min_platform_major: policy.min_platform_major,
            max_platform_major: policy.max_platform_major,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let policy = EnvironmentPolicy::default();
        Self {
            check: true,
            command_timeout_secs: policy.command_timeout.as_secs(),
            recommended_xcode: policy.recommended_toolchain,
            min_macos_major: policy.min_os_major,
            simulator_path: policy.simulator_path,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
            sink: ProgressSink::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then files, then `SPROUT_*` variables.
    ///
    /// `config_file` is the path passed via `--config`; it must exist when
    /// given. Without it the platform config file is read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = ::config::Config::try_from(&AppConfig::default())
            .context("failed to build default configuration")?;

        let (primary, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let cfg = ::config::Config::builder()
            .add_source(defaults)
            .add_source(toml_file(&primary).required(required))
            .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE)).required(false))
            .add_source(
                ::config::Environment::with_prefix("SPROUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        cfg.try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.sprout.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "sprout", "sprout")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    pub fn context_defaults(&self) -> ContextDefaults {
        ContextDefaults {
            organization_identifier: self.template.organization_identifier.clone(),
            minimum_platform_version: self.template.minimum_platform_version.clone(),
            version_name: self.template.version_name.clone(),
            use_data_framework: self.template.use_data_framework,
        }
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            min_platform_major: self.validation.min_platform_major,
            max_platform_major: self.validation.max_platform_major,
            ..ValidationPolicy::default()
        }
    }

    pub fn environment_policy(&self) -> EnvironmentPolicy {
        EnvironmentPolicy {
            recommended_toolchain: self.environment.recommended_xcode.clone(),
            min_os_major: self.environment.min_macos_major,
            simulator_path: self.environment.simulator_path.clone(),
            command_timeout: Duration::from_secs(self.environment.command_timeout_secs),
        }
    }

    /// Pipeline options before command-line overrides.
    pub fn finalize_options(&self) -> FinalizeOptions {
        FinalizeOptions {
            placeholder: self.template.placeholder.clone(),
            requirements_file: self.template.requirements_file.clone(),
            defaults: self.context_defaults(),
            validation_mode: self.validation.mode,
            validation_policy: self.validation_policy(),
            environment_policy: self.environment_policy(),
            check_environment: self.environment.check,
            suffix_case: self.template.bundle_suffix_case,
            ..FinalizeOptions::default()
        }
    }
}

fn toml_file(path: &Path) -> ::config::File<::config::FileSourceFile, ::config::FileFormat> {
    ::config::File::new(&path.to_string_lossy(), ::config::FileFormat::Toml)
}
