//! Error types for loading datasets.
//!
//! Aggregation itself never fails; only reading the project collection can.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported dataset file (expected .json or .toml): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Duplicate project id: {0}")]
    DuplicateProject(String),

    #[error("Project {project} has progress {progress}, expected 0-100")]
    InvalidProgress { project: String, progress: u8 },
}

pub type Result<T> = std::result::Result<T, DataError>;
