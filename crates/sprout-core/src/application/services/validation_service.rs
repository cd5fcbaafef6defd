//! Combined input and environment validation.

use tracing::{debug, instrument};

use crate::{
    application::ports::Logger,
    domain::{ContextValidator, EnvironmentReport, TemplateContext, ValidationResult},
};

/// Context rules plus environment findings, folded into one result.
///
/// `environment` is `None` when probing was skipped; then only the context
/// is judged.
#[instrument(skip_all, fields(validator = validator.name(), context = %context))]
pub fn validate_all(
    validator: &dyn ContextValidator,
    context: &TemplateContext,
    environment: Option<&EnvironmentReport>,
) -> ValidationResult {
    let context_result = validator.validate_context(context);
    let result = match environment {
        Some(report) => context_result.merge(report.findings()),
        None => context_result,
    };

    debug!(
        errors = result.errors().len(),
        warnings = result.warnings().len(),
        "Validation finished"
    );
    result
}

/// Print every error and warning through `logger`.
pub fn report_validation(logger: &dyn Logger, result: &ValidationResult) {
    for error in result.errors() {
        logger.error(error);
    }
    for warning in result.warnings() {
        logger.warning(warning);
    }

    if result.passed() {
        logger.success("All validation checks passed");
    } else {
        logger.error(&format!(
            "Validation failed with {} error(s)",
            result.errors().len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockLogger;
    use crate::domain::validation::MockContextValidator;
    use crate::domain::{EnvironmentPolicy, InputValidator, environment, fields};
    use mockall::predicate::eq;

    fn context() -> TemplateContext {
        TemplateContext::new()
            .with(fields::PROJECT_NAME, "MyApp")
            .with(fields::ORGANIZATION_IDENTIFIER, "com.example")
            .with(fields::MINIMUM_PLATFORM_VERSION, "16.0")
            .with(fields::VERSION_NAME, "1.0.0")
            .with(fields::USE_DATA_FRAMEWORK, "false")
    }

    fn report(xcode: Option<&str>) -> EnvironmentReport {
        let policy = EnvironmentPolicy::default();
        [
            environment::xcode_finding(xcode, &policy),
            environment::homebrew_finding(None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn passes_with_valid_context_and_toolchain() {
        let result = validate_all(
            &InputValidator::default(),
            &context(),
            Some(&report(Some("Xcode 15.2"))),
        );
        assert!(result.passed());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn missing_toolchain_blocks_even_with_valid_context() {
        let result = validate_all(&InputValidator::default(), &context(), Some(&report(None)));
        assert!(!result.passed());
        assert!(result.errors().contains(&"Xcode is not installed".to_string()));
    }

    #[test]
    fn skipped_environment_only_judges_context() {
        let result = validate_all(&InputValidator::default(), &context(), None);
        assert!(result.is_clean());
    }

    #[test]
    fn missing_required_keys_are_named() {
        let ctx = TemplateContext::new().with(fields::PROJECT_NAME, "MyApp");
        let result = validate_all(&InputValidator::default(), &ctx, None);
        assert_eq!(
            result.errors(),
            [
                "Required field 'organization_identifier' is missing",
                "Required field 'minimum_platform_version' is missing",
                "Required field 'version_name' is missing",
                "Required field 'use_data_framework' is missing",
            ]
        );
    }

    #[test]
    fn delegates_to_injected_validator() {
        let mut validator = MockContextValidator::new();
        validator.expect_name().return_const("mock");
        validator
            .expect_validate_context()
            .times(1)
            .returning(|_| ValidationResult::warning("from mock"));

        let result = validate_all(&validator, &context(), None);
        assert_eq!(result.warnings(), ["from mock"]);
    }

    #[test]
    fn report_lists_errors_then_summary() {
        let mut logger = MockLogger::new();
        logger
            .expect_error()
            .with(eq("bad name"))
            .times(1)
            .return_const(());
        logger
            .expect_error()
            .with(eq("Validation failed with 1 error(s)"))
            .times(1)
            .return_const(());
        logger.expect_warning().times(0);

        report_validation(&logger, &ValidationResult::error("bad name"));
    }
}
