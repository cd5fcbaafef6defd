//! Project Transformer - rewrites a freshly generated project in place.
//!
//! Four ordered steps:
//! 1. Replace the placeholder name inside the project descriptors
//! 2. Rename shared schemes and fix their contents
//! 3. Set the bundle identifier
//! 4. Set the deployment target
//!
//! Each step is best effort. A missing file is logged and skipped; an I/O
//! failure is logged and recorded in the [`TransformSummary`]. Neither stops
//! the remaining steps.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{Filesystem, Logger},
    domain::{
        BundleSuffixCase, DomainError, ProjectLayout, Rewrite, bundle_identifier, renamed_scheme,
        replace_references, rewrite_bundle_identifier, rewrite_deployment_target,
    },
};

const TOTAL_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformStep {
    References,
    Schemes,
    BundleIdentifier,
    DeploymentTarget,
}

impl fmt::Display for TransformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::References => "project references",
            Self::Schemes => "schemes",
            Self::BundleIdentifier => "bundle identifier",
            Self::DeploymentTarget => "deployment target",
        })
    }
}

/// A file whose content changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    pub step: TransformStep,
    pub path: PathBuf,
    pub replacements: usize,
}

/// A step that could not complete for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub step: TransformStep,
    pub path: PathBuf,
    pub reason: String,
}

/// What a transform run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    pub updated: Vec<FileUpdate>,
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Expected files that did not exist.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<StepFailure>,
}

impl TransformSummary {
    /// No failures recorded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Anything on disk was modified.
    pub fn changed(&self) -> bool {
        !self.updated.is_empty() || !self.renamed.is_empty()
    }
}

/// The four-step rename and substitution pipeline.
pub struct ProjectTransformer<'a> {
    filesystem: &'a dyn Filesystem,
    logger: &'a dyn Logger,
    layout: ProjectLayout,
    suffix_case: BundleSuffixCase,
}

impl<'a> ProjectTransformer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, logger: &'a dyn Logger) -> Self {
        Self {
            filesystem,
            logger,
            layout: ProjectLayout::default(),
            suffix_case: BundleSuffixCase::default(),
        }
    }

    pub fn with_layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_suffix_case(mut self, suffix_case: BundleSuffixCase) -> Self {
        self.suffix_case = suffix_case;
        self
    }

    /// Bundle identifier this transformer would write.
    pub fn bundle_identifier(&self, organization_identifier: &str, new_name: &str) -> String {
        bundle_identifier(organization_identifier, new_name, self.suffix_case)
    }

    /// Run all four steps.
    #[instrument(
        skip_all,
        fields(
            project = %project_dir.display(),
            from = %old_name,
            to = %new_name
        )
    )]
    pub fn transform(
        &self,
        project_dir: &Path,
        old_name: &str,
        new_name: &str,
        organization_identifier: &str,
        minimum_version: &str,
    ) -> TransformSummary {
        info!("Transforming project");
        let mut summary = TransformSummary::default();

        self.logger.step(
            1,
            TOTAL_STEPS,
            &format!("Renaming project references from '{old_name}' to '{new_name}'"),
        );
        self.rename_references(project_dir, old_name, new_name, &mut summary);

        self.logger.step(2, TOTAL_STEPS, "Renaming shared schemes");
        self.rename_schemes(project_dir, old_name, new_name, &mut summary);

        let bundle_id = self.bundle_identifier(organization_identifier, new_name);
        self.logger.step(
            3,
            TOTAL_STEPS,
            &format!("Setting bundle identifier to {bundle_id}"),
        );
        self.update_bundle_identifier(project_dir, new_name, &bundle_id, &mut summary);

        self.logger.step(
            4,
            TOTAL_STEPS,
            &format!("Setting minimum iOS version to {minimum_version}"),
        );
        self.update_deployment_target(project_dir, new_name, minimum_version, &mut summary);

        info!(
            updated = summary.updated.len(),
            renamed = summary.renamed.len(),
            skipped = summary.skipped.len(),
            failures = summary.failures.len(),
            "Transform finished"
        );
        summary
    }

    /// Step 1: placeholder -> name in the project and workspace descriptors.
    pub fn rename_references(
        &self,
        project_dir: &Path,
        old_name: &str,
        new_name: &str,
        summary: &mut TransformSummary,
    ) {
        if !self.placeholder_usable(project_dir, old_name, TransformStep::References, summary) {
            return;
        }

        for path in self.layout.reference_files(project_dir, new_name) {
            self.rewrite_file(TransformStep::References, &path, summary, |content| {
                replace_references(content, old_name, new_name)
            });
        }
    }

    /// Step 2: `<old>*.xcscheme` -> `<new>*.xcscheme`, then step 1 on each.
    pub fn rename_schemes(
        &self,
        project_dir: &Path,
        old_name: &str,
        new_name: &str,
        summary: &mut TransformSummary,
    ) {
        if !self.placeholder_usable(project_dir, old_name, TransformStep::Schemes, summary) {
            return;
        }

        let schemes_dir = self.layout.schemes_path(project_dir, new_name);
        if !self.filesystem.exists(&schemes_dir) {
            debug!(path = %schemes_dir.display(), "No shared schemes");
            self.logger.info("No shared schemes to rename");
            return;
        }

        let entries = match self.filesystem.list_files(&schemes_dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.record_failure(TransformStep::Schemes, &schemes_dir, e.to_string(), summary);
                return;
            }
        };

        for entry in entries {
            let Some(file_name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(new_file_name) =
                renamed_scheme(file_name, old_name, new_name, &self.layout.scheme_extension)
            else {
                continue;
            };

            let target = schemes_dir.join(&new_file_name);
            if target != entry {
                if self.filesystem.exists(&target) {
                    self.record_failure(
                        TransformStep::Schemes,
                        &entry,
                        format!("{new_file_name} already exists"),
                        summary,
                    );
                    continue;
                }
                if let Err(e) = self.filesystem.rename(&entry, &target) {
                    self.record_failure(TransformStep::Schemes, &entry, e.to_string(), summary);
                    continue;
                }
                self.logger
                    .info(&format!("Renamed scheme: {file_name} -> {new_file_name}"));
                summary.renamed.push((entry.clone(), target.clone()));
            }

            self.rewrite_file(TransformStep::Schemes, &target, summary, |content| {
                replace_references(content, old_name, new_name)
            });
        }
    }

    /// Step 3: every placeholder bundle-identifier assignment in the descriptor.
    pub fn update_bundle_identifier(
        &self,
        project_dir: &Path,
        new_name: &str,
        bundle_id: &str,
        summary: &mut TransformSummary,
    ) {
        let path = self.layout.descriptor_path(project_dir, new_name);
        self.rewrite_file(TransformStep::BundleIdentifier, &path, summary, |content| {
            Ok(rewrite_bundle_identifier(content, bundle_id))
        });
    }

    /// Step 4: every deployment-target assignment in the descriptor.
    pub fn update_deployment_target(
        &self,
        project_dir: &Path,
        new_name: &str,
        minimum_version: &str,
        summary: &mut TransformSummary,
    ) {
        let path = self.layout.descriptor_path(project_dir, new_name);
        self.rewrite_file(TransformStep::DeploymentTarget, &path, summary, |content| {
            Ok(rewrite_deployment_target(content, minimum_version))
        });
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn placeholder_usable(
        &self,
        project_dir: &Path,
        old_name: &str,
        step: TransformStep,
        summary: &mut TransformSummary,
    ) -> bool {
        if old_name.is_empty() {
            self.record_failure(
                step,
                project_dir,
                DomainError::EmptyPlaceholder.to_string(),
                summary,
            );
            return false;
        }
        true
    }

    /// Whole-file read, rewrite, write.
    fn rewrite_file<F>(
        &self,
        step: TransformStep,
        path: &Path,
        summary: &mut TransformSummary,
        rewrite: F,
    ) where
        F: FnOnce(&str) -> Result<Rewrite<'_>, DomainError>,
    {
        if !self.filesystem.exists(path) {
            warn!(path = %path.display(), %step, "File not found, skipping");
            self.logger
                .warning(&format!("{} not found, skipping", path.display()));
            summary.skipped.push(path.to_path_buf());
            return;
        }

        let content = match self.filesystem.read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                self.record_failure(step, path, e.to_string(), summary);
                return;
            }
        };

        let rewritten = match rewrite(&content) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                self.record_failure(step, path, e.to_string(), summary);
                return;
            }
        };

        if !rewritten.changed() {
            debug!(path = %path.display(), %step, "Already up to date");
            return;
        }

        match self.filesystem.write_file(path, &rewritten.content) {
            Ok(()) => {
                self.logger.info(&format!("Updated {}", path.display()));
                summary.updated.push(FileUpdate {
                    step,
                    path: path.to_path_buf(),
                    replacements: rewritten.replacements,
                });
            }
            Err(e) => self.record_failure(step, path, e.to_string(), summary),
        }
    }

    fn record_failure(
        &self,
        step: TransformStep,
        path: &Path,
        reason: String,
        summary: &mut TransformSummary,
    ) {
        warn!(path = %path.display(), %step, %reason, "Step failed");
        self.logger.error(&format!(
            "Error updating {} ({step}): {reason}",
            path.display()
        ));
        summary.failures.push(StepFailure {
            step,
            path: path.to_path_buf(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fakes::{FakeFs, Lines};

    const ROOT: &str = "/work/Acme";

    const PBXPROJ: &str = r#"/* HelloWorldApp.app */
		buildSettings = {
			INFOPLIST_FILE = HelloWorldApp/Info.plist;
			IPHONEOS_DEPLOYMENT_TARGET = 15.0;
			PRODUCT_BUNDLE_IDENTIFIER = "com.example";
			PRODUCT_NAME = HelloWorldApp;
		};
"#;

    const WORKSPACE: &str = r#"<Workspace version = "1.0">
   <FileRef location = "self:HelloWorldApp.xcodeproj"></FileRef>
</Workspace>
"#;

    const SCHEME: &str = r#"<BuildableReference BuildableName = "HelloWorldApp.app" BlueprintName = "HelloWorldApp">"#;

    fn root() -> PathBuf {
        PathBuf::from(ROOT)
    }

    fn bundle() -> PathBuf {
        root().join("Acme.xcodeproj")
    }

    fn generated() -> FakeFs {
        FakeFs::new()
            .with_file(bundle().join("project.pbxproj"), PBXPROJ)
            .with_file(
                bundle().join("project.xcworkspace/contents.xcworkspacedata"),
                WORKSPACE,
            )
            .with_file(
                bundle().join("xcshareddata/xcschemes/HelloWorldApp.xcscheme"),
                SCHEME,
            )
    }

    fn run(fs: &FakeFs, logger: &Lines, org: &str, version: &str) -> TransformSummary {
        ProjectTransformer::new(fs, logger).transform(&root(), "HelloWorldApp", "Acme", org, version)
    }

    #[test]
    fn full_run_rewrites_every_file() {
        let fs = generated();
        let logger = Lines::default();

        let summary = run(&fs, &logger, "com.acme", "16.0");

        assert!(summary.is_clean(), "{:?}", summary.failures);
        let pbx = fs.content(bundle().join("project.pbxproj")).unwrap();
        assert!(!pbx.contains("HelloWorldApp"));
        assert!(pbx.contains(r#"PRODUCT_BUNDLE_IDENTIFIER = "com.acme.Acme";"#));
        assert!(pbx.contains("IPHONEOS_DEPLOYMENT_TARGET = 16.0;"));

        let ws = fs
            .content(bundle().join("project.xcworkspace/contents.xcworkspacedata"))
            .unwrap();
        assert!(ws.contains("self:Acme.xcodeproj"));

        let scheme = bundle().join("xcshareddata/xcschemes/Acme.xcscheme");
        assert!(fs.content(&scheme).unwrap().contains(r#"BlueprintName = "Acme""#));
        assert!(
            fs.content(bundle().join("xcshareddata/xcschemes/HelloWorldApp.xcscheme"))
                .is_none()
        );
        assert_eq!(summary.renamed.len(), 1);
    }

    #[test]
    fn second_run_changes_nothing() {
        let fs = generated();
        let logger = Lines::default();

        run(&fs, &logger, "com.acme", "16.0");
        let after_first = fs.snapshot();
        let second = run(&fs, &logger, "com.acme", "16.0");

        assert_eq!(fs.snapshot(), after_first);
        assert!(!second.changed());
        assert!(second.is_clean());
    }

    #[test]
    fn missing_workspace_descriptor_is_skipped() {
        let fs = FakeFs::new().with_file(bundle().join("project.pbxproj"), PBXPROJ);
        let logger = Lines::default();

        let summary = run(&fs, &logger, "com.acme", "16.0");

        assert!(summary.is_clean());
        assert_eq!(summary.skipped.len(), 1);
        assert!(
            fs.content(bundle().join("project.pbxproj"))
                .unwrap()
                .contains("com.acme.Acme")
        );
        assert!(!logger.with_prefix("warning").is_empty());
    }

    #[test]
    fn write_failure_does_not_stop_other_steps() {
        let ws_path = bundle().join("project.xcworkspace/contents.xcworkspacedata");
        let fs = generated().deny_writes(ws_path.clone());
        let logger = Lines::default();

        let summary = run(&fs, &logger, "com.acme", "16.0");

        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].step, TransformStep::References);
        assert_eq!(summary.failures[0].path, ws_path);
        assert!(
            fs.content(bundle().join("project.pbxproj"))
                .unwrap()
                .contains("IPHONEOS_DEPLOYMENT_TARGET = 16.0;")
        );
        assert_eq!(summary.renamed.len(), 1);
    }

    #[test]
    fn empty_placeholder_leaves_names_untouched() {
        let fs = generated();
        let logger = Lines::default();

        let summary = ProjectTransformer::new(&fs, &logger).transform(
            &root(),
            "",
            "Acme",
            "com.acme",
            "16.0",
        );

        assert_eq!(summary.failures.len(), 2);
        let pbx = fs.content(bundle().join("project.pbxproj")).unwrap();
        assert!(pbx.contains("HelloWorldApp"));
        // steps 3 and 4 still ran
        assert!(pbx.contains("com.acme.Acme"));
    }

    #[test]
    fn existing_scheme_is_not_overwritten() {
        let existing = bundle().join("xcshareddata/xcschemes/Acme.xcscheme");
        let fs = generated().with_file(existing.clone(), "<Scheme>kept</Scheme>");
        let logger = Lines::default();

        let summary = run(&fs, &logger, "com.acme", "16.0");

        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].step, TransformStep::Schemes);
        assert!(summary.failures[0].reason.contains("Acme.xcscheme already exists"));
        assert_eq!(fs.content(&existing).unwrap(), "<Scheme>kept</Scheme>");
        assert!(
            fs.content(bundle().join("xcshareddata/xcschemes/HelloWorldApp.xcscheme"))
                .is_some()
        );
        assert!(summary.renamed.is_empty());
    }

    #[test]
    fn lowercase_suffix_policy_applies() {
        let fs = generated();
        let logger = Lines::default();

        ProjectTransformer::new(&fs, &logger)
            .with_suffix_case(BundleSuffixCase::Lowercase)
            .transform(&root(), "HelloWorldApp", "Acme", "com.acme", "16.0");

        assert!(
            fs.content(bundle().join("project.pbxproj"))
                .unwrap()
                .contains(r#""com.acme.acme";"#)
        );
    }

    #[test]
    fn steps_are_announced_in_order() {
        let fs = generated();
        let logger = Lines::default();

        run(&fs, &logger, "com.acme", "16.0");

        let steps = logger.with_prefix("step");
        assert_eq!(steps.len(), 4);
        assert!(steps[0].starts_with("step: 1/4"));
        assert!(steps[3].contains("16.0"));
    }
}
