use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, StudyError};

/// One parsed participant log.
///
/// Wraps the raw JSON object and provides tolerant accessors over its
/// loosely-typed fields. Field lookups never panic on absence; callers get
/// `Option`s or typed defaults.
#[derive(Debug, Clone)]
pub struct LogPayload {
    value: Value,
}

impl LogPayload {
    /// Parse raw log text into a payload.
    ///
    /// Some exports carry a banner before the JSON body, so parsing starts
    /// at the first `{`. A file with no `{` at all has no JSON object and
    /// fails with [`StudyError::NoJsonObject`].
    pub fn parse(raw: &str, path: &Path) -> Result<Self> {
        let start = raw
            .find('{')
            .ok_or_else(|| StudyError::no_json_object(path))?;
        let value: Value =
            serde_json::from_str(raw[start..].trim()).map_err(|e| StudyError::json(path, e))?;
        Ok(Self { value })
    }

    /// Read and parse a log file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw, path)
    }

    /// Participant ID from the payload's `id` field, falling back to the
    /// file's base name when the field is absent or null.
    pub fn participant_id(&self, path: &Path) -> String {
        match self.value.get("id") {
            Some(Value::Null) | None => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Some(id) => coerce_str(id),
        }
    }

    /// Tolerant field lookup on the top-level object.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }
}

/// Render a loose JSON value as the string a cell or filename should carry.
/// Strings pass through unquoted, null and absent become empty, anything
/// else keeps its compact JSON rendering (so the number 5 becomes "5").
pub fn coerce_str(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Human-readable name of a JSON value's type, for skip notices.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
