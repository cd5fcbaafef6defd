//! Implementation of the `sprout finalize` command.
//!
//! Responsibility: translate CLI arguments into [`FinalizeOptions`], call the
//! core pipeline, and display results. No business logic lives here.

use tracing::{info, instrument};

use sprout_core::{
    application::{FinalizeOptions, FinalizeOutcome, FinalizeService},
    domain::{BundleSuffixCase, ValidationMode},
};

use crate::{
    cli::{FinalizeArgs, SuffixCaseArg, ValidationModeArg},
    commands::Adapters,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    progress::select_logger,
};

/// Execute the `sprout finalize` command.
#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: FinalizeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let options = build_options(&args, &config);

    let adapters = Adapters::new(&config)?;
    let logger = select_logger(&config, &output);
    let service = FinalizeService::new(
        &adapters.filesystem,
        &adapters.runner,
        &adapters.store,
        logger.as_ref(),
    );

    let outcome = service.finalize(&args.dir, &options)?;
    info!(
        project = %outcome.project_name,
        files = outcome.transform.updated.len(),
        failures = outcome.transform.failures.len(),
        "Finalize completed"
    );

    if output.is_json() {
        output.json(&outcome)?;
    } else {
        show_summary(&outcome, &output)?;
    }
    Ok(())
}

/// Config first, then explicit flags.
pub(crate) fn build_options(args: &FinalizeArgs, config: &AppConfig) -> FinalizeOptions {
    let mut options = config.finalize_options();

    if args.skip_environment {
        options.check_environment = false;
    }
    options.keep_context = args.keep_context;
    if let Some(placeholder) = &args.placeholder {
        options.placeholder = placeholder.clone();
    }
    if let Some(mode) = args.validation {
        options.validation_mode = convert_mode(mode);
    }
    if let Some(case) = args.suffix_case {
        options.suffix_case = match case {
            SuffixCaseArg::Preserve => BundleSuffixCase::Preserve,
            SuffixCaseArg::Lowercase => BundleSuffixCase::Lowercase,
        };
    }
    options
}

pub(crate) fn convert_mode(mode: ValidationModeArg) -> ValidationMode {
    match mode {
        ValidationModeArg::Strict => ValidationMode::Strict,
        ValidationModeArg::Presence => ValidationMode::Presence,
    }
}

fn show_summary(outcome: &FinalizeOutcome, output: &OutputManager) -> CliResult<()> {
    let transform = &outcome.transform;

    output.detail(&format!("Context source: {}", outcome.source))?;
    for update in &transform.updated {
        output.detail(&format!(
            "{} ({} replacement(s))",
            update.path.display(),
            update.replacements
        ))?;
    }
    for (from, to) in &transform.renamed {
        output.detail(&format!("{} -> {}", from.display(), to.display()))?;
    }

    if !transform.is_clean() {
        output.warning(&format!(
            "{} file operation(s) failed; the project may need manual fixes:",
            transform.failures.len()
        ))?;
        for failure in &transform.failures {
            output.print(&format!(
                "  {}: {} ({})",
                failure.step,
                failure.path.display(),
                failure.reason
            ))?;
        }
    }

    if let Some(path) = &outcome.requirements_path {
        output.info(&format!("Requirements written to {}", path.display()))?;
    }
    Ok(())
}
