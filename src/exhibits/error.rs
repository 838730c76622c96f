use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or rendering exhibits
#[derive(Debug, Error)]
pub enum ExhibitError {
    /// A literal table failed validation (NaN, negative quantity, length mismatch)
    #[error("Invalid data in {table}: {message}")]
    InvalidData { table: &'static str, message: String },

    /// Requested exhibit id is not in the catalogue
    #[error("Unknown exhibit '{0}'")]
    UnknownExhibit(String),

    /// Drawing backend or chart construction error
    #[error("Render error in exhibit {id}: {message}")]
    Render { id: String, message: String },

    /// Output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (config file, manifest, embedded registries)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (unreadable config file, bad override)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A render worker panicked or was cancelled
    #[error("Render task failed: {0}")]
    Task(String),
}

impl ExhibitError {
    pub fn invalid_data(table: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidData {
            table,
            message: message.into(),
        }
    }

    pub fn render(id: impl Into<String>, message: impl ToString) -> Self {
        Self::Render {
            id: id.into(),
            message: message.to_string(),
        }
    }
}

/// Type alias for Results using ExhibitError
pub type Result<T> = std::result::Result<T, ExhibitError>;
