//! Crate-level error type and `Result` alias for structured error handling.
//! Converts underlying I/O and GDAL errors, and provides semantic variants
//! for CRS parsing and run validation failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("Invalid EPSG identifier: {value} (expected EPSG:<code>)")]
    InvalidEpsg { value: String },

    #[error("{kind} directory not found: {}", .path.display())]
    DirectoryNotFound { kind: &'static str, path: PathBuf },

    #[error("No datasets provided")]
    NoDatasets,

    #[error("Invalid parameters file {}: {source}", .path.display())]
    Params {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to clip {file}: {source}")]
    Clip {
        file: String,
        #[source]
        source: Box<Error>,
    },
}
