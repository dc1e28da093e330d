/// Structured error types for studyctl-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (studyctl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for studyctl-core operations
#[derive(Error, Debug)]
pub enum StudyError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing failed
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// File contains no JSON object at all
    #[error("no JSON object found in {path:?}")]
    NoJsonObject { path: PathBuf },

    /// A payload field exists but has the wrong shape
    #[error("schema error in {path:?}: {reason}")]
    Schema { path: PathBuf, reason: String },

    /// CSV read/write failed
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// Dataset is missing the identifier column
    #[error("column '{column}' not found in {path:?}")]
    MissingColumn { column: String, path: PathBuf },

    /// Invalid option combination
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for studyctl-core operations
pub type Result<T> = std::result::Result<T, StudyError>;

impl StudyError {
    /// Create a JSON error for a given file
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Create a no-JSON-object error
    pub fn no_json_object(path: impl Into<PathBuf>) -> Self {
        Self::NoJsonObject { path: path.into() }
    }

    /// Create a schema error
    pub fn schema(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
