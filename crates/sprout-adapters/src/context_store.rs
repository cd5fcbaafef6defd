//! JSON handoff file between the pre- and post-generation steps.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sprout_core::{
    application::{ApplicationError, ports::{ContextStore, Filesystem}},
    domain::{DomainError, TemplateContext},
    error::{Context, SproutResult},
};
use tracing::{debug, instrument};

/// File name the template engine hooks have always used.
pub const DEFAULT_HANDOFF_FILE: &str = "cookiecutter_context.json";

/// Stores the template context as a flat JSON object at the project root.
#[derive(Debug, Clone)]
pub struct JsonContextStore<F> {
    filesystem: F,
    file_name: String,
}

impl<F: Filesystem> JsonContextStore<F> {
    pub fn new(filesystem: F) -> Self {
        Self::with_file_name(filesystem, DEFAULT_HANDOFF_FILE)
    }

    pub fn with_file_name(filesystem: F, file_name: impl Into<String>) -> Self {
        Self {
            filesystem,
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl<F: Filesystem> ContextStore for JsonContextStore<F> {
    fn location(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.file_name)
    }

    #[instrument(skip_all, fields(project = %project_dir.display()))]
    fn load(&self, project_dir: &Path) -> SproutResult<Option<TemplateContext>> {
        let path = self.location(project_dir);
        if !self.filesystem.exists(&path) {
            debug!(path = %path.display(), "No handoff file");
            return Ok(None);
        }

        let raw = self
            .filesystem
            .read_to_string(&path)
            .map_err(|e| ApplicationError::HandoffUnreadable {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let context = parse_context(&raw).map_err(|e| ApplicationError::HandoffUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), keys = context.len(), "Handoff file parsed");
        Ok(Some(context))
    }

    fn save(&self, project_dir: &Path, context: &TemplateContext) -> SproutResult<PathBuf> {
        let path = self.location(project_dir);
        let json = serde_json::to_string_pretty(context).context("serializing template context")?;
        self.filesystem.write_file(&path, &json)?;
        Ok(path)
    }

    fn discard(&self, project_dir: &Path) -> SproutResult<()> {
        let path = self.location(project_dir);
        if self.filesystem.exists(&path) {
            self.filesystem.remove_file(&path)?;
            debug!(path = %path.display(), "Handoff file removed");
        }
        Ok(())
    }
}

/// Parse a handoff document into a context.
///
/// Scalars become their textual form, `null` becomes an empty string and
/// legacy key names are mapped to their canonical names.
pub fn parse_context(raw: &str) -> Result<TemplateContext, DomainError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DomainError::MalformedContext(e.to_string()))?;

    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(DomainError::MalformedContext(format!(
                "expected a JSON object, found {}",
                kind(&other)
            )));
        }
    };

    Ok(TemplateContext::from_pairs(
        map.into_iter().map(|(key, value)| (key, value_text(value))),
    ))
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFilesystem;
    use sprout_core::domain::fields;
    use sprout_core::error::SproutError;

    fn store_with(content: Option<&str>) -> JsonContextStore<MemoryFilesystem> {
        let mut fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p")).unwrap();
        if let Some(content) = content {
            fs = fs.with_file("/p/cookiecutter_context.json", content);
        }
        JsonContextStore::new(fs)
    }

    #[test]
    fn absent_file_is_none() {
        assert_eq!(store_with(None).load(Path::new("/p")).unwrap(), None);
    }

    #[test]
    fn scalars_are_stringified_and_aliases_mapped() {
        let store = store_with(Some(
            r#"{
                "project_name": "MyApp",
                "minimum_ios_version": 16.0,
                "use_swift_data": true,
                "author_email": null
            }"#,
        ));

        let ctx = store.load(Path::new("/p")).unwrap().unwrap();
        assert_eq!(ctx.project_name(), Some("MyApp"));
        assert_eq!(ctx.get(fields::MINIMUM_PLATFORM_VERSION), Some("16.0"));
        assert_eq!(ctx.get(fields::USE_DATA_FRAMEWORK), Some("true"));
        assert_eq!(ctx.get(fields::AUTHOR_EMAIL), Some(""));
    }

    #[test]
    fn malformed_json_is_a_blocking_error() {
        let err = store_with(Some("{ not json")).load(Path::new("/p")).unwrap_err();
        assert!(matches!(
            err,
            SproutError::Application(ApplicationError::HandoffUnreadable { .. })
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = parse_context("[1, 2]").unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedContext("expected a JSON object, found an array".into())
        );
    }

    #[test]
    fn save_load_discard_cycle() {
        let store = store_with(None);
        let ctx = TemplateContext::new()
            .with(fields::PROJECT_NAME, "Weather")
            .with(fields::USE_DATA_FRAMEWORK, "false");

        let path = store.save(Path::new("/p"), &ctx).unwrap();
        assert_eq!(path, PathBuf::from("/p/cookiecutter_context.json"));
        assert_eq!(store.load(Path::new("/p")).unwrap(), Some(ctx));

        store.discard(Path::new("/p")).unwrap();
        assert_eq!(store.load(Path::new("/p")).unwrap(), None);
        // second discard is a no-op
        store.discard(Path::new("/p")).unwrap();
    }

    #[test]
    fn custom_file_name_is_honoured() {
        let store = JsonContextStore::with_file_name(MemoryFilesystem::new(), "handoff.json");
        assert_eq!(
            store.location(Path::new("/p")),
            PathBuf::from("/p/handoff.json")
        );
    }
}
