use std::path::PathBuf;
use thiserror::Error;

/// The main error type for plantcoco operations.
///
/// Only fatal conditions surface here. Recoverable gaps (a missing image
/// file, a missing per-image CSV, a row with an unknown label) are counted
/// in the split report instead and never abort a run.
#[derive(Debug, Error)]
pub enum PlantCocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Category directory not found: {path}")]
    CategoryNotFound { path: PathBuf },

    #[error("Failed to parse label map {path}: {source}")]
    LabelMapParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid label map {path}: {message}")]
    LabelMapInvalid { path: PathBuf, message: String },

    #[error("Failed to read annotation CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Emitted document for split '{split}' failed its integrity check: {message}")]
    DocumentInvalid { split: String, message: String },

    #[error("{failed} of {total} split(s) failed")]
    SplitsFailed { failed: usize, total: usize },

    #[error("Unsupported name-matching mode: {0}")]
    UnsupportedMatchMode(String),
}
