//! Finalize Service - main application orchestrator.
//!
//! This service coordinates the whole post-generation workflow:
//! 1. Load the handoff context (or build the fallback context)
//! 2. Probe the host environment
//! 3. Validate; stop here on any blocking error
//! 4. Transform the project tree
//! 5. Write the requirements document and drop the handoff file
//!
//! Nothing under the project directory is modified before step 4.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, ContextStore, Filesystem, Logger},
        services::{
            EnvironmentProbe, ProjectTransformer, TransformSummary,
            validation_service::{report_validation, validate_all},
        },
    },
    domain::{
        BundleSuffixCase, ContextDefaults, EnvironmentPolicy, EnvironmentReport, ProjectLayout,
        RequirementsReporter, TemplateContext, ValidationMode, ValidationPolicy, ValidationResult,
    },
    error::{SproutError, SproutResult},
};

/// Name baked into the template before generation.
pub const DEFAULT_PLACEHOLDER: &str = "HelloWorldApp";

/// Default file name of the rendered requirements document.
pub const DEFAULT_REQUIREMENTS_FILE: &str = "requirements.md";

/// Where the context came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "kebab-case")]
pub enum ContextSource {
    Handoff(PathBuf),
    Fallback,
}

impl fmt::Display for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handoff(path) => write!(f, "handoff file {}", path.display()),
            Self::Fallback => f.write_str("built-in defaults"),
        }
    }
}

/// Knobs for a finalize run. `Default` gives the stock template behaviour.
#[derive(Debug, Clone)]
pub struct FinalizeOptions {
    pub placeholder: String,
    pub requirements_file: String,
    pub defaults: ContextDefaults,
    pub validation_mode: ValidationMode,
    pub validation_policy: ValidationPolicy,
    pub environment_policy: EnvironmentPolicy,
    /// When false the probe is skipped and no requirements file is written.
    pub check_environment: bool,
    pub keep_context: bool,
    pub suffix_case: BundleSuffixCase,
    pub layout: ProjectLayout,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.into(),
            requirements_file: DEFAULT_REQUIREMENTS_FILE.into(),
            defaults: ContextDefaults::default(),
            validation_mode: ValidationMode::default(),
            validation_policy: ValidationPolicy::default(),
            environment_policy: EnvironmentPolicy::default(),
            check_environment: true,
            keep_context: false,
            suffix_case: BundleSuffixCase::default(),
            layout: ProjectLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareOptions {
    /// Overwrite an existing handoff file.
    pub force: bool,
}

/// Context, environment and the verdict on both.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub context: TemplateContext,
    pub source: ContextSource,
    pub environment: Option<EnvironmentReport>,
    pub validation: ValidationResult,
}

/// Result of a successful finalize run.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizeOutcome {
    pub project_name: String,
    pub bundle_identifier: String,
    pub minimum_version: String,
    pub source: ContextSource,
    /// Warnings only; a run with errors never produces an outcome.
    pub validation: ValidationResult,
    pub environment: Option<EnvironmentReport>,
    pub transform: TransformSummary,
    pub requirements_path: Option<PathBuf>,
    pub context_removed: bool,
}

/// Post-generation pipeline over injected ports.
pub struct FinalizeService<'a> {
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn CommandRunner,
    store: &'a dyn ContextStore,
    logger: &'a dyn Logger,
}

impl<'a> FinalizeService<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        runner: &'a dyn CommandRunner,
        store: &'a dyn ContextStore,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            filesystem,
            runner,
            store,
            logger,
        }
    }

    /// Handoff context if present, otherwise the fallback built from `defaults`.
    pub fn load_context(
        &self,
        project_dir: &Path,
        defaults: &ContextDefaults,
    ) -> SproutResult<(TemplateContext, ContextSource)> {
        match self.store.load(project_dir)? {
            Some(context) => {
                let location = self.store.location(project_dir);
                info!(path = %location.display(), "Loaded handoff context");
                Ok((context, ContextSource::Handoff(location)))
            }
            None => {
                let location = self.store.location(project_dir);
                warn!(path = %location.display(), "No handoff file, using fallback context");
                self.logger.warning(&format!(
                    "No handoff file at {}, using defaults",
                    location.display()
                ));
                let context = TemplateContext::fallback(project_dir, defaults)?;
                Ok((context, ContextSource::Fallback))
            }
        }
    }

    /// Probe the host with `policy`.
    pub fn probe(&self, policy: &EnvironmentPolicy) -> EnvironmentReport {
        EnvironmentProbe::new(self.runner, self.filesystem)
            .with_policy(policy.clone())
            .check()
    }

    /// Load, probe and validate without touching the project.
    #[instrument(skip_all, fields(project = %project_dir.as_ref().display()))]
    pub fn assess(
        &self,
        project_dir: impl AsRef<Path>,
        options: &FinalizeOptions,
    ) -> SproutResult<Assessment> {
        let project_dir = project_dir.as_ref();
        self.ensure_project_dir(project_dir)?;

        let (context, source) = self.load_context(project_dir, &options.defaults)?;
        self.logger.info(&format!("Project: {context}"));

        let environment = if options.check_environment {
            self.logger.section("Checking development environment");
            Some(self.probe(&options.environment_policy))
        } else {
            self.logger.info("Skipping environment checks");
            None
        };

        self.logger.section("Validating inputs");
        let validator = options
            .validation_mode
            .build(options.validation_policy.clone());
        let validation = validate_all(validator.as_ref(), &context, environment.as_ref());
        report_validation(self.logger, &validation);

        Ok(Assessment {
            context,
            source,
            environment,
            validation,
        })
    }

    /// Run the full pipeline on `project_dir`.
    #[instrument(skip_all, fields(project = %project_dir.as_ref().display()))]
    pub fn finalize(
        &self,
        project_dir: impl AsRef<Path>,
        options: &FinalizeOptions,
    ) -> SproutResult<FinalizeOutcome> {
        let project_dir = project_dir.as_ref();
        self.logger.section("iOS project post-generation");

        let assessment = self.assess(project_dir, options)?;
        if !assessment.validation.passed() {
            let (_, errors, warnings) = assessment.validation.into_parts();
            return Err(ApplicationError::ValidationFailed { errors, warnings }.into());
        }

        let context = &assessment.context;
        let (Some(project_name), Some(organization), Some(minimum_version)) = (
            context.project_name(),
            context.organization_identifier(),
            context.minimum_platform_version(),
        ) else {
            return Err(SproutError::Internal {
                message: "validated context lacks a required field".into(),
            });
        };

        self.logger.section("Transforming project");
        let transformer = ProjectTransformer::new(self.filesystem, self.logger)
            .with_layout(options.layout.clone())
            .with_suffix_case(options.suffix_case);
        let bundle_identifier = transformer.bundle_identifier(organization, project_name);
        let transform = transformer.transform(
            project_dir,
            &options.placeholder,
            project_name,
            organization,
            minimum_version,
        );

        let requirements_path = assessment.environment.as_ref().and_then(|report| {
            self.write_requirements(project_dir, project_name, minimum_version, report, options)
        });

        let context_removed = if options.keep_context {
            false
        } else {
            self.discard_context(project_dir)
        };

        self.logger.success(&format!(
            "iOS project '{project_name}' has been successfully generated!"
        ));
        self.logger
            .info(&format!("Open {project_name}.xcodeproj in Xcode to start developing"));
        self.logger.info(&format!("Bundle ID: {bundle_identifier}"));
        self.logger
            .info(&format!("Minimum iOS Version: {minimum_version}"));

        Ok(FinalizeOutcome {
            project_name: project_name.to_string(),
            bundle_identifier,
            minimum_version: minimum_version.to_string(),
            source: assessment.source.clone(),
            validation: assessment.validation.clone(),
            environment: assessment.environment.clone(),
            transform,
            requirements_path,
            context_removed,
        })
    }

    /// Write the handoff file for a project about to be generated.
    #[instrument(skip_all, fields(project = %project_dir.as_ref().display()))]
    pub fn prepare(
        &self,
        project_dir: impl AsRef<Path>,
        context: &TemplateContext,
        options: &PrepareOptions,
    ) -> SproutResult<PathBuf> {
        let project_dir = project_dir.as_ref();
        let location = self.store.location(project_dir);

        if self.filesystem.exists(&location) && !options.force {
            return Err(ApplicationError::HandoffExists { path: location }.into());
        }

        self.filesystem.create_dir_all(project_dir)?;
        let written = self.store.save(project_dir, context)?;
        info!(path = %written.display(), "Handoff context written");
        self.logger
            .success(&format!("Stored template context in {}", written.display()));
        Ok(written)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn ensure_project_dir(&self, project_dir: &Path) -> SproutResult<()> {
        if self.filesystem.exists(project_dir) {
            Ok(())
        } else {
            Err(ApplicationError::ProjectNotFound {
                path: project_dir.to_path_buf(),
            }
            .into())
        }
    }

    fn write_requirements(
        &self,
        project_dir: &Path,
        project_name: &str,
        minimum_version: &str,
        report: &EnvironmentReport,
        options: &FinalizeOptions,
    ) -> Option<PathBuf> {
        let path = project_dir.join(&options.requirements_file);
        let document = RequirementsReporter::new()
            .project_name(project_name)
            .render(report, minimum_version);

        match self.filesystem.write_file(&path, &document) {
            Ok(()) => {
                self.logger
                    .success(&format!("Requirements written to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not write requirements");
                self.logger
                    .error(&format!("Could not write {}: {e}", path.display()));
                None
            }
        }
    }

    fn discard_context(&self, project_dir: &Path) -> bool {
        match self.store.discard(project_dir) {
            Ok(()) => {
                self.logger.debug("Cleaned up temporary files");
                true
            }
            Err(e) => {
                warn!(error = %e, "Could not remove handoff file");
                self.logger
                    .warning(&format!("Could not remove handoff file: {e}"));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCommandRunner, MockContextStore};
    use crate::application::services::fakes::{FakeFs, Lines};
    use crate::domain::fields;

    const ROOT: &str = "/work/Acme";
    const PBXPROJ: &str = "\
PRODUCT_NAME = HelloWorldApp;
IPHONEOS_DEPLOYMENT_TARGET = 15.0;
PRODUCT_BUNDLE_IDENTIFIER = \"com.example\";
";

    fn root() -> PathBuf {
        PathBuf::from(ROOT)
    }

    fn pbxproj() -> PathBuf {
        root().join("Acme.xcodeproj/project.pbxproj")
    }

    fn generated() -> FakeFs {
        FakeFs::new().with_file(pbxproj(), PBXPROJ)
    }

    fn context(name: &str) -> TemplateContext {
        TemplateContext::new()
            .with(fields::PROJECT_NAME, name)
            .with(fields::ORGANIZATION_IDENTIFIER, "com.acme")
            .with(fields::MINIMUM_PLATFORM_VERSION, "16.0")
            .with(fields::VERSION_NAME, "1.0.0")
            .with(fields::USE_DATA_FRAMEWORK, "true")
    }

    fn runner(with_xcode: bool) -> MockCommandRunner {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |cmd, _| match cmd.program.as_str() {
            "xcodebuild" if with_xcode => Some("Xcode 15.2\nBuild version 15C500b".into()),
            "sw_vers" => Some("14.2".into()),
            _ => None,
        });
        runner
    }

    fn store(loaded: Option<TemplateContext>, discards: usize) -> MockContextStore {
        let mut store = MockContextStore::new();
        store
            .expect_location()
            .returning(|dir| dir.join("cookiecutter_context.json"));
        store
            .expect_load()
            .returning(move |_| Ok(loaded.clone()));
        store.expect_discard().times(discards).returning(|_| Ok(()));
        store
    }

    #[test]
    fn valid_handoff_transforms_and_reports() {
        let fs = generated();
        let runner = runner(true);
        let store = store(Some(context("Acme")), 1);
        let logger = Lines::default();

        let outcome = FinalizeService::new(&fs, &runner, &store, &logger)
            .finalize(root(), &FinalizeOptions::default())
            .unwrap();

        assert_eq!(outcome.bundle_identifier, "com.acme.Acme");
        assert!(outcome.context_removed);
        let pbx = fs.content(pbxproj()).unwrap();
        assert!(pbx.contains("PRODUCT_NAME = Acme;"));
        assert!(pbx.contains("IPHONEOS_DEPLOYMENT_TARGET = 16.0;"));
        assert!(pbx.contains(r#""com.acme.Acme";"#));

        let requirements = fs.content(root().join("requirements.md")).unwrap();
        assert!(requirements.contains("| **Xcode** | 15.2 | ✅ |"));
        assert!(requirements.contains("open Acme.xcodeproj"));
    }

    #[test]
    fn invalid_name_aborts_before_mutation() {
        let fs = generated();
        let before = fs.snapshot();
        let runner = runner(true);
        let store = store(Some(context("my app!")), 0);
        let logger = Lines::default();

        let err = FinalizeService::new(&fs, &runner, &store, &logger)
            .finalize(root(), &FinalizeOptions::default())
            .unwrap_err();

        assert!(err.is_validation_failure());
        assert_eq!(fs.snapshot(), before);
        assert!(!logger.with_prefix("error").is_empty());
    }

    #[test]
    fn missing_toolchain_aborts_before_mutation() {
        let fs = generated();
        let before = fs.snapshot();
        let runner = runner(false);
        let store = store(Some(context("Acme")), 0);
        let logger = Lines::default();

        let err = FinalizeService::new(&fs, &runner, &store, &logger)
            .finalize(root(), &FinalizeOptions::default())
            .unwrap_err();

        match err {
            SproutError::Application(ApplicationError::ValidationFailed { errors, .. }) => {
                assert_eq!(errors, ["Xcode is not installed"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs.snapshot(), before);
    }

    #[test]
    fn absent_handoff_uses_directory_name() {
        let fs = generated();
        let runner = runner(true);
        let store = store(None, 1);
        let logger = Lines::default();

        let outcome = FinalizeService::new(&fs, &runner, &store, &logger)
            .finalize(root(), &FinalizeOptions::default())
            .unwrap();

        assert_eq!(outcome.source, ContextSource::Fallback);
        assert_eq!(outcome.bundle_identifier, "com.example.Acme");
        assert_eq!(outcome.minimum_version, "15.0");
        assert!(
            fs.content(pbxproj())
                .unwrap()
                .contains("IPHONEOS_DEPLOYMENT_TARGET = 15.0;")
        );
    }

    #[test]
    fn skipped_environment_never_runs_commands() {
        let fs = generated();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);
        let store = store(Some(context("Acme")), 0);
        let logger = Lines::default();
        let options = FinalizeOptions {
            check_environment: false,
            keep_context: true,
            ..FinalizeOptions::default()
        };

        let outcome = FinalizeService::new(&fs, &runner, &store, &logger)
            .finalize(root(), &options)
            .unwrap();

        assert!(outcome.environment.is_none());
        assert!(outcome.requirements_path.is_none());
        assert!(!outcome.context_removed);
        assert!(fs.content(root().join("requirements.md")).is_none());
    }

    #[test]
    fn missing_project_directory_is_not_found() {
        let fs = FakeFs::new();
        let runner = MockCommandRunner::new();
        let store = MockContextStore::new();
        let logger = Lines::default();

        let err = FinalizeService::new(&fs, &runner, &store, &logger)
            .assess("/nowhere", &FinalizeOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            SproutError::Application(ApplicationError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn prepare_refuses_to_overwrite_without_force() {
        let fs = FakeFs::new().with_file(root().join("cookiecutter_context.json"), "{}");
        let runner = MockCommandRunner::new();
        let mut store = MockContextStore::new();
        store
            .expect_location()
            .returning(|dir| dir.join("cookiecutter_context.json"));
        store
            .expect_save()
            .times(1)
            .returning(|dir, _| Ok(dir.join("cookiecutter_context.json")));
        let logger = Lines::default();
        let service = FinalizeService::new(&fs, &runner, &store, &logger);

        let refused = service.prepare(root(), &context("Acme"), &PrepareOptions::default());
        assert!(matches!(
            refused,
            Err(SproutError::Application(ApplicationError::HandoffExists { .. }))
        ));

        let written = service
            .prepare(root(), &context("Acme"), &PrepareOptions { force: true })
            .unwrap();
        assert_eq!(written, root().join("cookiecutter_context.json"));
    }
}
