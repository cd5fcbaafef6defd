//! The template context: user-supplied scaffold parameters.
//!
//! The context is produced by the external template engine (through the
//! handoff file) before any of this crate runs. It is a plain string map;
//! per-field well-formedness is checked by [`super::validation`], not here.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{self, Component, Path};

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Well-known context keys.
pub mod fields {
    pub const PROJECT_NAME: &str = "project_name";
    pub const ORGANIZATION_IDENTIFIER: &str = "organization_identifier";
    pub const MINIMUM_PLATFORM_VERSION: &str = "minimum_platform_version";
    pub const VERSION_NAME: &str = "version_name";
    pub const USE_DATA_FRAMEWORK: &str = "use_data_framework";
    pub const APP_NAME: &str = "app_name";
    pub const AUTHOR_NAME: &str = "author_name";
    pub const AUTHOR_EMAIL: &str = "author_email";
}

/// Keys every context must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    fields::PROJECT_NAME,
    fields::ORGANIZATION_IDENTIFIER,
    fields::MINIMUM_PLATFORM_VERSION,
    fields::VERSION_NAME,
    fields::USE_DATA_FRAMEWORK,
];

/// Keys that may be absent.
pub const OPTIONAL_FIELDS: [&str; 3] = [
    fields::APP_NAME,
    fields::AUTHOR_NAME,
    fields::AUTHOR_EMAIL,
];

// Older templates wrote platform-specific key names.
const LEGACY_ALIASES: [(&str, &str); 2] = [
    ("minimum_ios_version", fields::MINIMUM_PLATFORM_VERSION),
    ("use_swift_data", fields::USE_DATA_FRAMEWORK),
];

/// Map a legacy key to its canonical name; canonical keys pass through.
pub fn canonical_key(key: &str) -> &str {
    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map_or(key, |(_, canonical)| *canonical)
}

/// Mapping of field name to string value.
///
/// Invariant: keys are stored under their canonical name. When both a legacy
/// alias and its canonical key are supplied, the canonical value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from arbitrary key/value pairs, normalising aliases.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        for (key, value) in pairs {
            ctx.insert(key, value);
        }
        ctx
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let canonical = canonical_key(&key);

        if canonical != key {
            // legacy alias: never shadow an explicit canonical value
            if !self.values.contains_key(canonical) {
                self.values.insert(canonical.to_string(), value.into());
            }
            return;
        }

        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Required keys absent from this context, in [`REQUIRED_FIELDS`] order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !self.contains(key))
            .collect()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.get(fields::PROJECT_NAME)
    }

    pub fn organization_identifier(&self) -> Option<&str> {
        self.get(fields::ORGANIZATION_IDENTIFIER)
    }

    pub fn minimum_platform_version(&self) -> Option<&str> {
        self.get(fields::MINIMUM_PLATFORM_VERSION)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Context used when no handoff file exists.
    ///
    /// The project name is the directory's own name, so `.` resolves to the
    /// working directory; every other required field comes from `defaults`.
    pub fn fallback(project_dir: &Path, defaults: &ContextDefaults) -> Result<Self, DomainError> {
        let name = directory_name(project_dir).ok_or_else(|| DomainError::UnnamedProject {
            path: project_dir.display().to_string(),
        })?;

        Ok(Self::new()
            .with(fields::PROJECT_NAME, name)
            .with(
                fields::ORGANIZATION_IDENTIFIER,
                defaults.organization_identifier.as_str(),
            )
            .with(
                fields::MINIMUM_PLATFORM_VERSION,
                defaults.minimum_platform_version.as_str(),
            )
            .with(fields::VERSION_NAME, defaults.version_name.as_str())
            .with(
                fields::USE_DATA_FRAMEWORK,
                defaults.use_data_framework.to_string(),
            ))
    }
}

/// Last normal component of `dir` once made absolute, with `.` and `..`
/// folded lexically.
fn directory_name(dir: &Path) -> Option<String> {
    let absolute = path::absolute(dir).ok()?;
    let mut parts = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }
    parts
        .last()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

impl fmt::Display for TemplateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.project_name().unwrap_or("<unnamed>");
        let org = self.organization_identifier().unwrap_or("<no organization>");
        write!(f, "{name} ({org})")
    }
}

/// Values used to fill a context when the handoff file is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDefaults {
    pub organization_identifier: String,
    pub minimum_platform_version: String,
    pub version_name: String,
    pub use_data_framework: bool,
}

impl Default for ContextDefaults {
    fn default() -> Self {
        Self {
            organization_identifier: "com.example".into(),
            minimum_platform_version: "15.0".into(),
            version_name: "1.0.0".into(),
            use_data_framework: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn legacy_keys_are_canonicalised() {
        let ctx = TemplateContext::from_pairs([
            ("minimum_ios_version", "16.0"),
            ("use_swift_data", "true"),
        ]);

        assert_eq!(ctx.get(fields::MINIMUM_PLATFORM_VERSION), Some("16.0"));
        assert_eq!(ctx.get(fields::USE_DATA_FRAMEWORK), Some("true"));
        assert!(!ctx.contains("minimum_ios_version"));
    }

    #[test]
    fn canonical_key_wins_over_alias_in_any_order() {
        let first = TemplateContext::from_pairs([
            ("minimum_platform_version", "17.0"),
            ("minimum_ios_version", "14.0"),
        ]);
        let second = TemplateContext::from_pairs([
            ("minimum_ios_version", "14.0"),
            ("minimum_platform_version", "17.0"),
        ]);

        assert_eq!(first.minimum_platform_version(), Some("17.0"));
        assert_eq!(second.minimum_platform_version(), Some("17.0"));
    }

    #[test]
    fn missing_required_follows_declaration_order() {
        let ctx = TemplateContext::new().with(fields::ORGANIZATION_IDENTIFIER, "com.example");
        assert_eq!(
            ctx.missing_required(),
            vec![
                fields::PROJECT_NAME,
                fields::MINIMUM_PLATFORM_VERSION,
                fields::VERSION_NAME,
                fields::USE_DATA_FRAMEWORK,
            ]
        );
    }

    #[test]
    fn fallback_uses_directory_name_and_defaults() {
        let ctx = TemplateContext::fallback(
            &PathBuf::from("/tmp/work/Weather"),
            &ContextDefaults::default(),
        )
        .unwrap();

        assert_eq!(ctx.project_name(), Some("Weather"));
        assert_eq!(ctx.organization_identifier(), Some("com.example"));
        assert_eq!(ctx.minimum_platform_version(), Some("15.0"));
        assert_eq!(ctx.get(fields::USE_DATA_FRAMEWORK), Some("false"));
        assert!(ctx.missing_required().is_empty());
    }

    #[test]
    fn fallback_resolves_relative_directories() {
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.file_name().and_then(|n| n.to_str()).unwrap();

        for dir in [".", "./", "src/.."] {
            let ctx = TemplateContext::fallback(Path::new(dir), &ContextDefaults::default())
                .unwrap();
            assert_eq!(ctx.project_name(), Some(expected), "{dir}");
        }

        let ctx = TemplateContext::fallback(Path::new("Notes"), &ContextDefaults::default())
            .unwrap();
        assert_eq!(ctx.project_name(), Some("Notes"));
    }

    #[test]
    fn fallback_rejects_root_directory() {
        let err = TemplateContext::fallback(Path::new("/"), &ContextDefaults::default());
        assert!(matches!(err, Err(DomainError::UnnamedProject { .. })));
    }

    #[test]
    fn display_names_project_and_organization() {
        let ctx = TemplateContext::new()
            .with(fields::PROJECT_NAME, "MyApp")
            .with(fields::ORGANIZATION_IDENTIFIER, "com.acme");
        assert_eq!(ctx.to_string(), "MyApp (com.acme)");
    }
}
