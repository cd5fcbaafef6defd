//! `sprout prepare`: store the template answers before generation.

use std::io::IsTerminal as _;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use sprout_core::{
    application::{FinalizeService, PrepareOptions},
    domain::{TemplateContext, fields},
};

use crate::{
    cli::{GlobalArgs, PrepareArgs},
    commands::Adapters,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    progress::select_logger,
};

#[derive(Serialize)]
struct Prepared<'a> {
    path: &'a Path,
    context: &'a TemplateContext,
}

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(
    args: PrepareArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project_name = match args.project_name.clone() {
        Some(name) => name,
        None => prompt_project_name(&args.dir, &global, &output)?,
    };

    let context = build_context(&args, project_name, &config);
    debug!(fields = context.len(), "Context assembled");

    let adapters = Adapters::new(&config)?;
    let logger = select_logger(&config, &output);
    let service = FinalizeService::new(
        &adapters.filesystem,
        &adapters.runner,
        &adapters.store,
        logger.as_ref(),
    );

    let path = service.prepare(&args.dir, &context, &PrepareOptions { force: args.force })?;

    if output.is_json() {
        output.json(&Prepared {
            path: &path,
            context: &context,
        })?;
    }
    Ok(())
}

/// Answers from the flags, with config defaults for the required fields.
fn build_context(args: &PrepareArgs, project_name: String, config: &AppConfig) -> TemplateContext {
    let defaults = config.context_defaults();

    let mut context = TemplateContext::new()
        .with(fields::PROJECT_NAME, project_name)
        .with(
            fields::ORGANIZATION_IDENTIFIER,
            args.organization
                .clone()
                .unwrap_or(defaults.organization_identifier),
        )
        .with(
            fields::MINIMUM_PLATFORM_VERSION,
            args.min_version
                .clone()
                .unwrap_or(defaults.minimum_platform_version),
        )
        .with(
            fields::VERSION_NAME,
            args.version_name.clone().unwrap_or(defaults.version_name),
        )
        .with(
            fields::USE_DATA_FRAMEWORK,
            args.use_data_framework
                .unwrap_or(defaults.use_data_framework)
                .to_string(),
        );

    let optional = [
        (fields::APP_NAME, &args.app_name),
        (fields::AUTHOR_NAME, &args.author_name),
        (fields::AUTHOR_EMAIL, &args.author_email),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            context.insert(key, value.clone());
        }
    }
    context
}

fn prompt_project_name(dir: &Path, global: &GlobalArgs, output: &OutputManager) -> CliResult<String> {
    let missing = CliError::MissingValue {
        name: "project name",
        flag: "--project-name",
    };
    if global.quiet || output.is_json() || !std::io::stdin().is_terminal() {
        return Err(missing);
    }
    ask(&suggested_name(dir)).ok_or(missing)
}

/// Directory name, used as the prompt's default answer.
fn suggested_name(dir: &Path) -> String {
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(feature = "interactive")]
fn ask(default: &str) -> Option<String> {
    let mut input = dialoguer::Input::<String>::new().with_prompt("Project name");
    if !default.is_empty() {
        input = input.default(default.to_owned());
    }
    input
        .interact_text()
        .ok()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(not(feature = "interactive"))]
fn ask(_default: &str) -> Option<String> {
    None
}
