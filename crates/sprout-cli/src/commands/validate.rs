//! `sprout validate`: load, probe and validate without touching the project.

use tracing::instrument;

use sprout_core::{
    application::{ApplicationError, FinalizeService},
    error::SproutError,
};

use crate::{
    cli::ValidateArgs,
    commands::{Adapters, finalize::convert_mode},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    progress::select_logger,
};

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(args: ValidateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut options = config.finalize_options();
    if args.skip_environment {
        options.check_environment = false;
    }
    if let Some(mode) = args.validation {
        options.validation_mode = convert_mode(mode);
    }

    let adapters = Adapters::new(&config)?;
    let logger = select_logger(&config, &output);
    let service = FinalizeService::new(
        &adapters.filesystem,
        &adapters.runner,
        &adapters.store,
        logger.as_ref(),
    );

    let assessment = service.assess(&args.dir, &options)?;

    if output.is_json() {
        output.json(&assessment)?;
    }

    if assessment.validation.passed() {
        Ok(())
    } else {
        let (_, errors, warnings) = assessment.validation.into_parts();
        Err(SproutError::from(ApplicationError::ValidationFailed { errors, warnings }).into())
    }
}
