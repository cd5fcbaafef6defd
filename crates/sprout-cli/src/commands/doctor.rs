//! `sprout doctor`: probe the development environment.
//!
//! Informational: missing tools are reported, never turned into an exit code.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use sprout_adapters::{LocalFilesystem, SystemCommandRunner};
use sprout_core::{
    application::{EnvironmentProbe, ports::Filesystem},
    domain::{EnvironmentReport, RequirementsReporter, Severity, ToolStatus},
};

use crate::{
    cli::DoctorArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON shape of a doctor run.
#[derive(Serialize)]
struct DoctorReport<'a> {
    checked_at: DateTime<Utc>,
    tools: &'a EnvironmentReport,
    errors: &'a [String],
    warnings: &'a [String],
    recommended_deployment_target: &'static str,
    written: Option<&'a Path>,
}

#[instrument(skip_all)]
pub fn execute(args: DoctorArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let filesystem = LocalFilesystem::new();
    let runner = SystemCommandRunner::new().map_err(|e| CliError::ProcessUnavailable {
        message: e.to_string(),
    })?;

    let spinner = output.spinner("Checking development environment...");
    let report = EnvironmentProbe::new(&runner, &filesystem)
        .with_policy(config.environment_policy())
        .check();
    spinner.finish_and_clear();

    let written = match &args.write {
        Some(path) => Some(write_requirements(&filesystem, path, &args, &config, &report)?),
        None => None,
    };

    let findings = report.findings();
    if output.is_json() {
        return Ok(output.json(&DoctorReport {
            checked_at: Utc::now(),
            tools: &report,
            errors: findings.errors(),
            warnings: findings.warnings(),
            recommended_deployment_target: report.recommended_deployment_target(),
            written: written.as_deref(),
        })?);
    }

    output.header("Development environment")?;
    for finding in report.iter() {
        let line = format!(
            "{} {:<14} {}",
            finding.status.glyph(),
            finding.tool.display_name(),
            finding.detection
        );
        match finding.status {
            ToolStatus::Pass => output.print(&line)?,
            ToolStatus::Warn => output.warning(&line)?,
            ToolStatus::Fail => output.error(&line)?,
        }
        if let Some(issue) = &finding.issue {
            let detail = match issue.severity {
                Severity::Error => format!("error: {}", issue.message),
                Severity::Warning => issue.message.clone(),
            };
            output.detail(&detail)?;
        }
    }
    output.print("")?;
    output.info(&format!(
        "Recommended deployment target: {}",
        report.recommended_deployment_target()
    ))?;

    if findings.passed() {
        output.success("Environment is ready for iOS development")?;
    } else {
        for error in findings.errors() {
            output.error(error)?;
        }
    }
    if let Some(path) = written {
        output.success(&format!("Requirements written to {}", path.display()))?;
    }
    Ok(())
}

fn write_requirements(
    filesystem: &LocalFilesystem,
    path: &Path,
    args: &DoctorArgs,
    config: &AppConfig,
    report: &EnvironmentReport,
) -> CliResult<PathBuf> {
    if path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is a directory, expected a file path", path.display()),
        });
    }

    let target = args
        .min_version
        .as_deref()
        .unwrap_or(&config.template.minimum_platform_version);

    let mut reporter = RequirementsReporter::new();
    if let Some(name) = &args.project_name {
        reporter = reporter.project_name(name.clone());
    }

    filesystem.write_file(path, &reporter.render(report, target))?;
    Ok(path.to_path_buf())
}
