//! Integration tests for the `sprout` binary.
//!
//! Every project run passes `--skip-environment` unless it is about the probe
//! itself, so results do not depend on the host having Xcode.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const PBXPROJ: &str = r#"// !$*UTF8*$!
{
	objects = {
		A1 /* HelloWorldApp.app */ = {isa = PBXFileReference; path = HelloWorldApp.app; };
		B1 /* Debug */ = {
			buildSettings = {
				IPHONEOS_DEPLOYMENT_TARGET = 15.0;
				PRODUCT_BUNDLE_IDENTIFIER = "com.example";
			};
		};
	};
}
"#;

const SCHEME: &str = r#"<Scheme>
   <BuildableReference BlueprintName = "HelloWorldApp" ReferencedContainer = "container:HelloWorldApp.xcodeproj">
   </BuildableReference>
</Scheme>
"#;

/// Isolated working directory with its own config home.
struct Sandbox {
    tmp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("sprout");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env("SPROUT_ENVIRONMENT__COMMAND_TIMEOUT_SECS", "2");
        cmd
    }

    /// A generated project named `name` with the template's placeholder inside.
    fn project(&self, name: &str) -> PathBuf {
        let root = self.path().join(name);
        let bundle = root.join(format!("{name}.xcodeproj"));
        fs::create_dir_all(bundle.join("project.xcworkspace")).unwrap();
        fs::create_dir_all(bundle.join("xcshareddata/xcschemes")).unwrap();
        fs::write(bundle.join("project.pbxproj"), PBXPROJ).unwrap();
        fs::write(
            bundle.join("project.xcworkspace/contents.xcworkspacedata"),
            r#"<Workspace><FileRef location = "self:HelloWorldApp.xcodeproj"></FileRef></Workspace>"#,
        )
        .unwrap();
        fs::write(
            bundle.join("xcshareddata/xcschemes/HelloWorldApp.xcscheme"),
            SCHEME,
        )
        .unwrap();
        root
    }
}

fn handoff(root: &Path, name: &str, org: &str) {
    fs::write(
        root.join("cookiecutter_context.json"),
        format!(
            r#"{{"project_name": "{name}", "organization_identifier": "{org}",
                "minimum_platform_version": "16.0", "version_name": "1.0.0",
                "use_data_framework": false}}"#
        ),
    )
    .unwrap();
}

fn pbxproj(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(format!("{name}.xcodeproj/project.pbxproj"))).unwrap()
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("finalize"))
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_color_env_accepts_conventional_values() {
    for value in ["1", "true", "yes", ""] {
        Sandbox::new()
            .cmd()
            .env("NO_COLOR", value)
            .args(["config", "path"])
            .assert()
            .success();
    }
}

#[test]
fn unknown_flag_is_a_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["finalize", "--frobnicate"])
        .assert()
        .code(2);
}

// ── finalize ──────────────────────────────────────────────────────────────────

#[test]
fn finalize_renames_project() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");
    handoff(&root, "Weather", "com.acme");

    sandbox
        .cmd()
        .args(["finalize", "Weather", "--skip-environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.acme.Weather"));

    let descriptor = pbxproj(&root, "Weather");
    assert!(descriptor.contains(r#"PRODUCT_BUNDLE_IDENTIFIER = "com.acme.Weather";"#));
    assert!(descriptor.contains("IPHONEOS_DEPLOYMENT_TARGET = 16.0;"));
    assert!(!descriptor.contains("HelloWorldApp"));
    assert!(
        root.join("Weather.xcodeproj/xcshareddata/xcschemes/Weather.xcscheme")
            .exists()
    );
    assert!(!root.join("cookiecutter_context.json").exists());
    assert!(!root.join("requirements.md").exists());
}

#[test]
fn finalize_json_reports_outcome() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");
    handoff(&root, "Weather", "com.acme");

    let out = sandbox
        .cmd()
        .args([
            "finalize",
            "Weather",
            "--skip-environment",
            "--keep-context",
            "--output-format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["bundle_identifier"], "com.acme.Weather");
    assert_eq!(json["context_removed"], false);
    assert!(root.join("cookiecutter_context.json").exists());
}

#[test]
fn invalid_context_exits_2_without_touching_files() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");
    handoff(&root, "Weather", "Acme Corp");
    let before = pbxproj(&root, "Weather");

    sandbox
        .cmd()
        .args(["finalize", "Weather", "--skip-environment"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Validation failed"))
        .stderr(predicate::str::contains("No project files were modified"));

    assert_eq!(pbxproj(&root, "Weather"), before);
    assert!(root.join("cookiecutter_context.json").exists());
}

#[test]
fn missing_project_dir_exits_3() {
    Sandbox::new()
        .cmd()
        .args(["finalize", "Nowhere", "--skip-environment"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn malformed_handoff_is_blocking() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");
    fs::write(root.join("cookiecutter_context.json"), "[1, 2, 3]").unwrap();

    sandbox
        .cmd()
        .args(["finalize", "Weather", "--skip-environment"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("handoff file"));
}

#[test]
fn fallback_context_uses_directory_name() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Notes");

    sandbox
        .cmd()
        .args(["finalize", "Notes", "--skip-environment", "--suffix-case", "lowercase"])
        .assert()
        .success();

    assert!(pbxproj(&root, "Notes").contains(r#"PRODUCT_BUNDLE_IDENTIFIER = "com.example.notes";"#));
}

#[test]
fn finalize_inside_project_without_handoff() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Notes");

    sandbox
        .cmd()
        .current_dir(&root)
        .args(["finalize", "--skip-environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.Notes"));

    let descriptor = pbxproj(&root, "Notes");
    assert!(!descriptor.contains("HelloWorldApp"));
    assert!(descriptor.contains(r#"PRODUCT_BUNDLE_IDENTIFIER = "com.example.Notes";"#));
    assert!(
        root.join("Notes.xcodeproj/xcshareddata/xcschemes/Notes.xcscheme")
            .exists()
    );
}

// ── validate ──────────────────────────────────────────────────────────────────

#[test]
fn validate_does_not_modify_project() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");
    handoff(&root, "Weather", "com.acme");
    let before = pbxproj(&root, "Weather");

    let out = sandbox
        .cmd()
        .args([
            "validate",
            "Weather",
            "--skip-environment",
            "--output-format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["validation"]["errors"], serde_json::json!([]));
    assert_eq!(pbxproj(&root, "Weather"), before);
    assert!(root.join("cookiecutter_context.json").exists());
}

#[test]
fn presence_mode_accepts_loose_values() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");
    handoff(&root, "Weather", "Acme Corp");

    sandbox
        .cmd()
        .args(["validate", "Weather", "--skip-environment", "--validation", "presence"])
        .assert()
        .success();
}

// ── prepare ───────────────────────────────────────────────────────────────────

#[test]
fn prepare_then_finalize() {
    let sandbox = Sandbox::new();
    let root = sandbox.project("Weather");

    sandbox
        .cmd()
        .args([
            "prepare",
            "Weather",
            "--project-name",
            "Weather",
            "--org",
            "com.acme",
            "--min-version",
            "17.0",
        ])
        .assert()
        .success();
    assert!(root.join("cookiecutter_context.json").exists());

    // a second prepare refuses to overwrite
    sandbox
        .cmd()
        .args(["prepare", "Weather", "--project-name", "Weather"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    sandbox
        .cmd()
        .args(["finalize", "Weather", "--skip-environment"])
        .assert()
        .success();
    assert!(pbxproj(&root, "Weather").contains("IPHONEOS_DEPLOYMENT_TARGET = 17.0;"));
}

#[test]
fn prepare_without_name_off_terminal_fails() {
    Sandbox::new()
        .cmd()
        .args(["prepare", "Weather"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--project-name"));
}

// ── doctor ────────────────────────────────────────────────────────────────────

#[test]
fn doctor_json_lists_every_tool() {
    let sandbox = Sandbox::new();
    let out = sandbox
        .cmd()
        .args(["doctor", "--output-format", "json", "--write", "requirements.md"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(json["checked_at"].is_string());
    assert_eq!(json["tools"].as_object().map(|t| t.len()), Some(6));
    let doc = fs::read_to_string(sandbox.path().join("requirements.md")).unwrap();
    assert!(doc.starts_with("# iOS Development Requirements"));
}

// ── config / init / completions ───────────────────────────────────────────────

#[test]
fn config_get_reads_environment_override() {
    Sandbox::new()
        .cmd()
        .env("SPROUT_TEMPLATE__PLACEHOLDER", "StarterApp")
        .args(["config", "get", "template.placeholder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("StarterApp"));
}

#[test]
fn config_get_unknown_key_exits_4() {
    Sandbox::new()
        .cmd()
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_config_file_exits_4() {
    Sandbox::new()
        .cmd()
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4);
}

#[test]
fn init_local_writes_config_used_by_later_runs() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["init", "--local"]).assert().success();

    let path = sandbox.path().join(".sprout.toml");
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("placeholder = \"HelloWorldApp\""));

    fs::write(&path, text.replace("HelloWorldApp", "StarterApp")).unwrap();
    sandbox
        .cmd()
        .args(["config", "get", "template.placeholder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("StarterApp"));

    // existing file is kept without --force
    sandbox
        .cmd()
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn completions_for_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sprout"));
}
