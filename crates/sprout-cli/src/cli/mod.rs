//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sprout",
    bin_name = "sprout",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Finish freshly generated iOS projects",
    long_about = "Sprout validates the answers given to an iOS project template, \
                  checks the local Xcode toolchain and renames the generated \
                  project to its final identity.",
    after_help = "EXAMPLES:\n\
        \x20 sprout prepare Weather --project-name Weather --org com.acme\n\
        \x20 sprout finalize Weather\n\
        \x20 sprout validate Weather --skip-environment\n\
        \x20 sprout doctor --write requirements.md\n\
        \x20 sprout completions bash > /usr/share/bash-completion/completions/sprout",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store the template answers for the post-generation step.
    #[command(
        about = "Write the handoff file before generation",
        after_help = "EXAMPLES:\n\
            \x20 sprout prepare Weather --project-name Weather\n\
            \x20 sprout prepare . --project-name Notes --org com.acme --min-version 16.0"
    )]
    Prepare(PrepareArgs),

    /// Validate, probe and transform a generated project.
    #[command(
        visible_alias = "f",
        about = "Run the post-generation pipeline",
        after_help = "EXAMPLES:\n\
            \x20 sprout finalize\n\
            \x20 sprout finalize Weather --keep-context\n\
            \x20 sprout finalize Weather --skip-environment --validation presence"
    )]
    Finalize(FinalizeArgs),

    /// Check the context (and environment) without touching the project.
    #[command(
        about = "Validate a project's template context",
        after_help = "EXAMPLES:\n\
            \x20 sprout validate Weather\n\
            \x20 sprout validate Weather --skip-environment --output-format json"
    )]
    Validate(ValidateArgs),

    /// Probe the development environment.
    #[command(
        about = "Check the local iOS toolchain",
        after_help = "EXAMPLES:\n\
            \x20 sprout doctor\n\
            \x20 sprout doctor --write requirements.md --project-name Weather\n\
            \x20 sprout doctor --output-format json"
    )]
    Doctor(DoctorArgs),

    /// Initialise a Sprout configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 sprout init           # platform config directory\n\
            \x20 sprout init --local   # .sprout.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sprout completions bash > ~/.local/share/bash-completion/completions/sprout\n\
            \x20 sprout completions zsh  > ~/.zfunc/_sprout\n\
            \x20 sprout completions fish > ~/.config/fish/completions/sprout.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Sprout configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sprout config get template.placeholder\n\
            \x20 sprout config list\n\
            \x20 sprout config path"
    )]
    Config(ConfigCommands),
}

// ── prepare ───────────────────────────────────────────────────────────────────

/// Arguments for `sprout prepare`.
#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Directory the handoff file is written to.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Final project name (prompted for when omitted on a terminal).
    #[arg(short = 'n', long = "project-name", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Reverse-domain organization identifier.
    #[arg(short = 'o', long = "org", value_name = "ID")]
    pub organization: Option<String>,

    /// Minimum iOS version, e.g. 15.0.
    #[arg(long = "min-version", value_name = "VERSION")]
    pub min_version: Option<String>,

    /// Marketing version, e.g. 1.0.0.
    #[arg(long = "version-name", value_name = "VERSION")]
    pub version_name: Option<String>,

    /// Enable the persistence framework in the generated app.
    ///
    /// `--use-data-framework` alone means `true`; `=false` overrides a
    /// configured default of `true`.
    #[arg(
        long = "use-data-framework",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub use_data_framework: Option<bool>,

    /// Display name shown under the app icon.
    #[arg(long = "app-name", value_name = "NAME")]
    pub app_name: Option<String>,

    #[arg(long = "author-name", value_name = "NAME")]
    pub author_name: Option<String>,

    #[arg(long = "author-email", value_name = "EMAIL")]
    pub author_email: Option<String>,

    /// Overwrite an existing handoff file.
    #[arg(short = 'f', long = "force", help = "Overwrite an existing handoff file")]
    pub force: bool,
}

// ── finalize ──────────────────────────────────────────────────────────────────

/// Arguments for `sprout finalize`.
#[derive(Debug, Args)]
pub struct FinalizeArgs {
    /// Root of the generated project.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Skip probing the host; no requirements file is written.
    #[arg(long = "skip-environment")]
    pub skip_environment: bool,

    /// Leave the handoff file in place after a successful run.
    #[arg(long = "keep-context")]
    pub keep_context: bool,

    /// Name baked into the template (overrides `template.placeholder`).
    #[arg(long = "placeholder", value_name = "NAME")]
    pub placeholder: Option<String>,

    /// Validation mode (overrides `validation.mode`).
    #[arg(long = "validation", value_enum, value_name = "MODE")]
    pub validation: Option<ValidationModeArg>,

    /// Casing of the bundle identifier suffix.
    #[arg(long = "suffix-case", value_enum, value_name = "CASE")]
    pub suffix_case: Option<SuffixCaseArg>,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `sprout validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Root of the generated project.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Validate the context only.
    #[arg(long = "skip-environment")]
    pub skip_environment: bool,

    /// Validation mode (overrides `validation.mode`).
    #[arg(long = "validation", value_enum, value_name = "MODE")]
    pub validation: Option<ValidationModeArg>,
}

// ── doctor ────────────────────────────────────────────────────────────────────

/// Arguments for `sprout doctor`.
#[derive(Debug, Args)]
pub struct DoctorArgs {
    /// Also write the rendered requirements document to FILE.
    #[arg(short = 'w', long = "write", value_name = "FILE")]
    pub write: Option<PathBuf>,

    /// Project name used in the document title.
    #[arg(short = 'n', long = "project-name", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Deployment target shown in the document.
    #[arg(long = "min-version", value_name = "VERSION")]
    pub min_version: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `sprout init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.sprout.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sprout completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sprout config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `template.placeholder`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Validation modes selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ValidationModeArg {
    /// Every rule.
    #[value(alias = "full")]
    Strict,
    /// Required fields only.
    #[value(alias = "minimal")]
    Presence,
}

/// Bundle identifier suffix casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum SuffixCaseArg {
    Preserve,
    #[value(alias = "lower")]
    Lowercase,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_finalize_defaults_to_current_dir() {
        let cli = Cli::parse_from(["sprout", "finalize"]);
        let Commands::Finalize(args) = cli.command else {
            panic!("expected Finalize command");
        };
        assert_eq!(args.dir, PathBuf::from("."));
        assert!(!args.skip_environment);
        assert!(!args.keep_context);
    }

    #[test]
    fn validation_mode_alias() {
        let cli = Cli::parse_from(["sprout", "validate", "App", "--validation", "minimal"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.validation, Some(ValidationModeArg::Presence));
    }

    #[test]
    fn prepare_collects_answers() {
        let cli = Cli::parse_from([
            "sprout",
            "prepare",
            "Weather",
            "--project-name",
            "Weather",
            "--org",
            "com.acme",
            "--use-data-framework",
        ]);
        let Commands::Prepare(args) = cli.command else {
            panic!("expected Prepare command");
        };
        assert_eq!(args.project_name.as_deref(), Some("Weather"));
        assert_eq!(args.organization.as_deref(), Some("com.acme"));
        assert_eq!(args.use_data_framework, Some(true));
        assert!(args.min_version.is_none());
    }

    #[test]
    fn data_framework_flag_takes_explicit_false() {
        let cli = Cli::parse_from(["sprout", "prepare", "--use-data-framework=false", "Weather"]);
        let Commands::Prepare(args) = cli.command else {
            panic!("expected Prepare command");
        };
        assert_eq!(args.use_data_framework, Some(false));
        assert_eq!(args.dir, PathBuf::from("Weather"));
    }

    #[test]
    fn finalize_alias() {
        let cli = Cli::parse_from(["sprout", "f", "--suffix-case", "lower"]);
        let Commands::Finalize(args) = cli.command else {
            panic!("expected Finalize command");
        };
        assert_eq!(args.suffix_case, Some(SuffixCaseArg::Lowercase));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["sprout", "--quiet", "--verbose", "doctor"]);
        assert!(result.is_err());
    }
}
